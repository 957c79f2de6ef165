//! Fixed strategy metadata and the deductible-expense catalog.
//!
//! Priorities are hand-assigned per strategy kind:
//!
//! | id | Priority | Implementation | Difficulty |
//! |----|----------|----------------|------------|
//! | `expense-optimization` | 90 | immediate | medium |
//! | `furusato-nozei` | 85 | immediate | easy |
//! | `small-business-mutual` | 80 | short-term | easy |
//! | `incorporation` | 75 | long-term | hard |
//! | `tsumitate-nisa` | 70 | immediate | easy |
//! | `ideco` | 65 | short-term | easy |
//! | `life-insurance` | 60 | short-term | easy |

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_yen;

/// How soon a strategy can be put in place.
///
/// Ordered from soonest to latest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Implementation {
    Immediate,
    ShortTerm,
    LongTerm,
}

impl Implementation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::ShortTerm => "short-term",
            Self::LongTerm => "long-term",
        }
    }

    /// One-off cost assumed when simulating the strategy.
    pub fn setup_cost(&self) -> Decimal {
        match self {
            Self::Immediate => dec!(10000),
            Self::ShortTerm => Decimal::ZERO,
            Self::LongTerm => dec!(300000),
        }
    }

    /// Months to allow before the next roadmap step.
    pub fn lead_months(&self) -> u32 {
        match self {
            Self::Immediate => 1,
            Self::ShortTerm => 2,
            Self::LongTerm => 6,
        }
    }
}

impl fmt::Display for Implementation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every strategy the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    ExpenseOptimization,
    FurusatoNozei,
    SmallBusinessMutualAid,
    Incorporation,
    TsumitateNisa,
    IndividualPension,
    LifeInsurance,
}

impl StrategyKind {
    /// Evaluation order. Strategies with equal priority keep this order.
    pub const ALL: [StrategyKind; 7] = [
        Self::FurusatoNozei,
        Self::ExpenseOptimization,
        Self::SmallBusinessMutualAid,
        Self::IndividualPension,
        Self::LifeInsurance,
        Self::Incorporation,
        Self::TsumitateNisa,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::ExpenseOptimization => "expense-optimization",
            Self::FurusatoNozei => "furusato-nozei",
            Self::SmallBusinessMutualAid => "small-business-mutual",
            Self::Incorporation => "incorporation",
            Self::TsumitateNisa => "tsumitate-nisa",
            Self::IndividualPension => "ideco",
            Self::LifeInsurance => "life-insurance",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn priority(&self) -> u8 {
        match self {
            Self::ExpenseOptimization => 90,
            Self::FurusatoNozei => 85,
            Self::SmallBusinessMutualAid => 80,
            Self::Incorporation => 75,
            Self::TsumitateNisa => 70,
            Self::IndividualPension => 65,
            Self::LifeInsurance => 60,
        }
    }

    pub fn implementation(&self) -> Implementation {
        match self {
            Self::ExpenseOptimization | Self::FurusatoNozei | Self::TsumitateNisa => {
                Implementation::Immediate
            }
            Self::SmallBusinessMutualAid | Self::IndividualPension | Self::LifeInsurance => {
                Implementation::ShortTerm
            }
            Self::Incorporation => Implementation::LongTerm,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        match self {
            Self::ExpenseOptimization => Difficulty::Medium,
            Self::Incorporation => Difficulty::Hard,
            _ => Difficulty::Easy,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::ExpenseOptimization => "expense optimization",
            Self::FurusatoNozei => "tax credit",
            Self::SmallBusinessMutualAid | Self::IndividualPension | Self::LifeInsurance => {
                "income deduction"
            }
            Self::Incorporation => "business structure",
            Self::TsumitateNisa => "investment",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::ExpenseOptimization => "Claim more business expenses",
            Self::FurusatoNozei => "Use hometown tax donations (furusato nozei)",
            Self::SmallBusinessMutualAid => "Join the small business mutual aid scheme",
            Self::Incorporation => "Incorporate the business",
            Self::TsumitateNisa => "Use a tsumitate NISA account",
            Self::IndividualPension => "Contribute to iDeCo",
            Self::LifeInsurance => "Use the life insurance deduction",
        }
    }

    pub fn action_steps(&self) -> &'static [&'static str] {
        match self {
            Self::ExpenseOptimization => &[
                "List spending that can be booked as an expense",
                "Set up a system for keeping receipts",
                "Set a reasonable business-use ratio for household costs",
                "Plan purchases of depreciable assets",
            ],
            Self::FurusatoNozei => &[
                "Check the donation limit for your income",
                "Choose municipalities on a furusato nozei site",
                "Submit the one-stop exception application",
                "Confirm the resident tax reduction next year",
            ],
            Self::SmallBusinessMutualAid => &[
                "Confirm eligibility",
                "Apply at a financial institution",
                "Set up automatic payment of contributions",
                "Claim the deduction in your tax return",
            ],
            Self::Incorporation => &[
                "Consult a tax accountant and a judicial scrivener",
                "Prepare the articles of incorporation",
                "Decide the capital and the business plan",
                "Open a corporate bank account and file the notifications",
            ],
            Self::TsumitateNisa => &[
                "Open a NISA account with a broker",
                "Choose investment trusts",
                "Set up automatic monthly purchases",
                "Track the yearly investment allowance",
            ],
            Self::IndividualPension => &[
                "Check your contribution limit",
                "Choose a provider and open an account",
                "Pick the investment products",
                "Submit the contribution certificate with your tax return",
            ],
            Self::LifeInsurance => &[
                "Compare insurers and products",
                "Work out the coverage you need",
                "Combine life, medical and private pension policies",
                "Submit the deduction certificate at year-end adjustment",
            ],
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// How the annual deductible amount of an [`ExpenseItem`] is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseEstimate {
    /// Business-use share of an annual household cost.
    Prorated { baseline: Decimal, ratio: Decimal },
    /// Straight-line depreciation of an asset.
    Depreciated { cost: Decimal, years: u32 },
    Flat(Decimal),
}

impl ExpenseEstimate {
    pub fn annual_amount(&self) -> Decimal {
        match *self {
            Self::Prorated { baseline, ratio } => round_yen(baseline * ratio),
            Self::Depreciated { cost, years } if years > 0 => {
                round_yen(cost / Decimal::from(years))
            }
            Self::Depreciated { .. } => Decimal::ZERO,
            Self::Flat(amount) => amount,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseItem {
    pub name: &'static str,
    pub description: &'static str,
    pub estimate: ExpenseEstimate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseCategory {
    pub name: &'static str,
    pub items: &'static [ExpenseItem],
}

const DEFAULT_ESTIMATE: ExpenseEstimate = ExpenseEstimate::Flat(dec!(50000));

const fn flat(
    name: &'static str,
    description: &'static str,
    amount: Decimal,
) -> ExpenseItem {
    ExpenseItem {
        name,
        description,
        estimate: ExpenseEstimate::Flat(amount),
    }
}

const fn default_item(
    name: &'static str,
    description: &'static str,
) -> ExpenseItem {
    ExpenseItem {
        name,
        description,
        estimate: DEFAULT_ESTIMATE,
    }
}

const fn prorated(
    name: &'static str,
    description: &'static str,
    baseline: Decimal,
    ratio: Decimal,
) -> ExpenseItem {
    ExpenseItem {
        name,
        description,
        estimate: ExpenseEstimate::Prorated { baseline, ratio },
    }
}

const fn depreciated(
    name: &'static str,
    description: &'static str,
    cost: Decimal,
    years: u32,
) -> ExpenseItem {
    ExpenseItem {
        name,
        description,
        estimate: ExpenseEstimate::Depreciated { cost, years },
    }
}

/// Deductible items a side business commonly overlooks.
pub static EXPENSE_CATALOG: &[ExpenseCategory] = &[
    ExpenseCategory {
        name: "home office",
        items: &[
            prorated("rent and utilities", "business share of the living space", dec!(1200000), dec!(0.2)),
            prorated("internet", "business use", dec!(60000), dec!(0.5)),
            prorated("mobile phone", "business calls", dec!(120000), dec!(0.3)),
            default_item("paper and stationery", "business only"),
        ],
    },
    ExpenseCategory {
        name: "equipment",
        items: &[
            depreciated("computer", "business PC, 4-year depreciation", dec!(300000), 4),
            depreciated("printer", "business printer", dec!(50000), 5),
            depreciated("desk and chair", "office furniture", dec!(100000), 8),
            depreciated("monitor", "business display", dec!(80000), 5),
            depreciated("software", "business software", dec!(50000), 3),
        ],
    },
    ExpenseCategory {
        name: "transportation",
        items: &[
            default_item("train and bus fares", "business travel"),
            default_item("taxi fares", "late-night business travel"),
            default_item("fuel", "business use"),
            default_item("parking", "business use"),
            default_item("expressway tolls", "business travel"),
        ],
    },
    ExpenseCategory {
        name: "education",
        items: &[
            flat("technical books", "books related to the business", dec!(100000)),
            flat("online courses", "paid courses and subscriptions", dec!(150000)),
            flat("seminars", "business training", dec!(200000)),
            flat("certifications", "exam fees for business qualifications", dec!(100000)),
            default_item("trade shows", "industry exhibitions"),
        ],
    },
    ExpenseCategory {
        name: "entertainment",
        items: &[
            flat("client entertainment", "keep it under 5,000 yen per person", dec!(150000)),
            default_item("business meetings", "meetings at cafes and restaurants"),
            default_item("seasonal gifts", "mid-year and year-end gifts"),
            default_item("business cards", "printing business cards"),
        ],
    },
    ExpenseCategory {
        name: "advertising",
        items: &[
            flat("website", "building and maintaining the business site", dec!(300000)),
            flat("domain and hosting", "yearly running costs", dec!(30000)),
            flat("social media ads", "paid ads on social platforms and search", dec!(200000)),
            default_item("flyers and brochures", "printing and design"),
            default_item("logo and branding", "branding costs"),
        ],
    },
];

/// Simplified combined income + resident tax rate for `income`.
///
/// | Income | Rate |
/// |--------|------|
/// | ≤ 1,950,000 | 15% |
/// | ≤ 3,300,000 | 20% |
/// | ≤ 6,950,000 | 30% |
/// | ≤ 9,000,000 | 33% |
/// | above | 43% |
pub fn marginal_tax_rate(income: Decimal) -> Decimal {
    if income <= dec!(1950000) {
        dec!(0.15)
    } else if income <= dec!(3300000) {
        dec!(0.20)
    } else if income <= dec!(6950000) {
        dec!(0.30)
    } else if income <= dec!(9000000) {
        dec!(0.33)
    } else {
        dec!(0.43)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ids_round_trip() {
        for kind in StrategyKind::ALL {
            assert_eq!(StrategyKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(StrategyKind::from_id("unknown"), None);
    }

    #[test]
    fn kind_serializes_as_kebab_case() {
        let json = serde_json::to_string(&StrategyKind::SmallBusinessMutualAid).unwrap();

        assert_eq!(json, "\"small-business-mutual-aid\"");
    }

    #[test]
    fn priorities_are_distinct() {
        let mut priorities: Vec<u8> = StrategyKind::ALL.iter().map(|k| k.priority()).collect();
        priorities.sort_unstable();
        priorities.dedup();

        assert_eq!(priorities.len(), StrategyKind::ALL.len());
    }

    #[test]
    fn implementation_orders_by_lead_time() {
        assert!(Implementation::Immediate < Implementation::ShortTerm);
        assert!(Implementation::ShortTerm < Implementation::LongTerm);
    }

    #[test]
    fn implementation_costs() {
        assert_eq!(Implementation::Immediate.setup_cost(), dec!(10000));
        assert_eq!(Implementation::ShortTerm.setup_cost(), dec!(0));
        assert_eq!(Implementation::LongTerm.setup_cost(), dec!(300000));
    }

    #[test]
    fn estimate_annual_amounts() {
        let rent = ExpenseEstimate::Prorated {
            baseline: dec!(1200000),
            ratio: dec!(0.2),
        };
        let software = ExpenseEstimate::Depreciated {
            cost: dec!(50000),
            years: 3,
        };

        assert_eq!(rent.annual_amount(), dec!(240000));
        assert_eq!(software.annual_amount(), dec!(16667));
        assert_eq!(DEFAULT_ESTIMATE.annual_amount(), dec!(50000));
    }

    #[test]
    fn catalog_totals() {
        let totals: Vec<Decimal> = EXPENSE_CATALOG
            .iter()
            .map(|c| c.items.iter().map(|i| i.estimate.annual_amount()).sum())
            .collect();

        assert_eq!(
            totals,
            vec![
                dec!(356000),
                dec!(130167),
                dec!(250000),
                dec!(600000),
                dec!(300000),
                dec!(630000),
            ]
        );
    }

    #[test]
    fn marginal_rate_bands() {
        assert_eq!(marginal_tax_rate(dec!(1950000)), dec!(0.15));
        assert_eq!(marginal_tax_rate(dec!(1950001)), dec!(0.20));
        assert_eq!(marginal_tax_rate(dec!(7000000)), dec!(0.33));
        assert_eq!(marginal_tax_rate(dec!(9000001)), dec!(0.43));
    }
}
