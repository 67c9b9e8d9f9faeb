pub mod config;
mod error;
pub mod portfolio;
pub mod strategy;
pub mod target;

pub use error::Error;
pub use portfolio::{Balances, Holdings, load_balances, parse_currency};
pub use strategy::{Strategy, compute_report, compute_strategy, parse_investment};
pub use target::AllocationPolicy;

pub type Dollar = f64;
/// Stored as a fraction of the total: 0.25 is 25%.
pub type Percent = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Hold,
    Sell(Dollar),
    Buy(Dollar),
}

/// One of the three allocation categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Bonds,
    International,
    National,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Bonds, Bucket::International, Bucket::National];

    pub fn name(&self) -> &'static str {
        match self {
            Bucket::Bonds => "Bonds",
            Bucket::International => "International Index",
            Bucket::National => "National Index",
        }
    }

    pub(crate) fn strategy_label(&self) -> &'static str {
        match self {
            Bucket::Bonds => "Bond",
            Bucket::International => "Intl",
            Bucket::National => "National",
        }
    }
}
