mod business_type;
mod inputs;
mod rate_tables;
mod tax_bracket;

pub use business_type::BusinessType;
pub use inputs::{
    FinancialProfile, IncorporationInputs, InputError, MAX_GROWTH_RATE, RoiInputs, TaxInputs,
};
pub use rate_tables::{
    BusinessTaxRates, CorporateTaxRates, RateTableError, RateTables, ResidentTaxRates,
    SalaryDeductionBand, SocialInsuranceRates,
};
pub use tax_bracket::TaxBracket;
