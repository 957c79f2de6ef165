//! Command-line front end for `fukugyo-core`.
//!
//! [`cli`] defines the arguments, [`commands`] runs them and [`report`]
//! renders the results as text or JSON.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod report;
pub mod utils;
