use std::fmt;

use tabled::{Table, Tabled, settings::Style};
use tracing::debug;

use crate::{
    Action, Bucket, Dollar, Error, Percent,
    portfolio::{Balances, Holdings, parse_currency},
    target::{Allocation, AllocationPolicy},
};

/// A bucket is left alone while target / current stays strictly inside this band
/// and no whole dollar of new money is being invested.
pub const HOLD_BAND: (f64, f64) = (0.95, 1.05);

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyLine {
    pub bucket: Bucket,
    pub action: Action,
    pub target_value: Dollar,
}

impl fmt::Display for StrategyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.bucket.name();
        match self.action {
            Action::Hold => write!(f, "Looks good for {name}"),
            Action::Buy(amount) => write!(f, "Buy ${amount:.2} {name}"),
            Action::Sell(amount) => write!(f, "Sell ${amount:.2} {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub balances: Balances,
    pub invest: Dollar,
    pub policy: AllocationPolicy,
    pub allocation: Allocation,
    pub total: Dollar,
    pub lines: [StrategyLine; 3],
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bucket in Bucket::ALL {
            writeln!(
                f,
                "Current Amount In {}: {:.2}",
                bucket.name(),
                self.balances.get(bucket)
            )?;
        }
        for line in &self.lines {
            writeln!(f, "{} Strategy: {line}", line.bucket.strategy_label())?;
        }
        Ok(())
    }
}

fn decide(target: Dollar, current: Dollar, invest: Dollar) -> Action {
    // Nothing to trade when both sides are empty.
    let ratio = if target == 0.0 && current == 0.0 {
        1.0
    } else {
        target / current
    };
    if HOLD_BAND.0 < ratio && ratio < HOLD_BAND.1 && invest.trunc() == 0.0 {
        return Action::Hold;
    }
    match target - current {
        diff if diff > 0.0 => Action::Buy(diff),
        diff => Action::Sell(diff.abs()),
    }
}

pub fn compute_strategy(
    balances: &Balances,
    invest: Dollar,
    policy: AllocationPolicy,
) -> Strategy {
    let allocation = policy.allocation();
    let total = balances.total() + invest;
    let lines = Bucket::ALL.map(|bucket| {
        let current = balances.get(bucket);
        let target_value = total * allocation.get(bucket);
        StrategyLine {
            bucket,
            action: decide(target_value, current, invest),
            target_value,
        }
    });
    debug!(?policy, total, ?lines, "computed strategy");
    Strategy {
        balances: *balances,
        invest,
        policy,
        allocation,
        total,
        lines,
    }
}

/// Renders the strategy report for raw balances, picking the policy from `filename_hint`.
///
/// The hint should be a bare file name: any `"202"` or `"203"` in it counts, so a
/// directory component such as `d2020/` would select a policy too.
pub fn compute_report(
    amounts: &[Dollar],
    invest: Dollar,
    filename_hint: &str,
) -> Result<String, Error> {
    let balances = Balances::try_from(amounts)?;
    let policy = AllocationPolicy::from_filename(filename_hint);
    Ok(compute_strategy(&balances, invest, policy).to_string())
}

/// Amount of new money to invest. Empty input means nothing new.
pub fn parse_investment(text: &str) -> Result<Dollar, Error> {
    if text.trim().is_empty() {
        return Ok(0.0);
    }
    parse_currency(text).map_err(|_| Error::Format(format!("invalid investment amount {text:?}")))
}

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Current Value")]
    current_value: String,
    #[tabled(rename = "Current Allocation")]
    current_allocation: String,
    #[tabled(rename = "Target Value")]
    target_value: String,
    #[tabled(rename = "Target Allocation")]
    target_allocation: String,
}

fn percent(value: Percent) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Per bucket summary of where the account is and where the strategy takes it.
pub fn allocation_table(holdings: &Holdings, strategy: &Strategy) -> Table {
    let held = strategy.balances.total();
    let rows = holdings
        .display
        .iter()
        .zip(&strategy.lines)
        .map(|(display, line)| {
            let current = strategy.balances.get(line.bucket);
            AllocationRow {
                symbol: display.symbol.clone(),
                current_value: display.value.clone(),
                current_allocation: percent(if held > 0.0 { current / held } else { 0.0 }),
                target_value: format!("{:.2}", line.target_value),
                target_allocation: percent(strategy.allocation.get(line.bucket)),
            }
        });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(bonds: Dollar, international: Dollar, national: Dollar) -> Balances {
        Balances {
            bonds,
            international,
            national,
        }
    }

    fn rendered(strategy: &Strategy) -> Vec<String> {
        strategy.lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn rebalances_toward_2020_targets() {
        let strategy = compute_strategy(
            &balances(1000.0, 2000.0, 3000.0),
            0.0,
            AllocationPolicy::Target2020,
        );
        assert_eq!(strategy.total, 6000.0);
        assert_eq!(
            rendered(&strategy),
            [
                "Sell $400.00 Bonds",
                "Sell $200.00 International Index",
                "Buy $600.00 National Index",
            ]
        );
        let targets: Vec<Dollar> = strategy.lines.iter().map(|l| l.target_value).collect();
        assert_eq!(targets, [600.0, 1800.0, 3600.0]);
    }

    #[test]
    fn report_text() {
        let report = compute_report(&[1000.0, 2000.0, 3000.0], 0.0, "positions-2020.csv").unwrap();
        assert_eq!(
            report,
            "Current Amount In Bonds: 1000.00\n\
             Current Amount In International Index: 2000.00\n\
             Current Amount In National Index: 3000.00\n\
             Bond Strategy: Sell $400.00 Bonds\n\
             Intl Strategy: Sell $200.00 International Index\n\
             National Strategy: Buy $600.00 National Index\n"
        );
    }

    #[test]
    fn report_is_repeatable() {
        let amounts = [1234.56, 789.01, 4321.0];
        let first = compute_report(&amounts, 250.0, "positions-2030.csv").unwrap();
        let second = compute_report(&amounts, 250.0, "positions-2030.csv").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn report_needs_three_balances() {
        assert!(matches!(
            compute_report(&[], 0.0, "positions.csv"),
            Err(Error::BalanceCount(0))
        ));
        assert!(matches!(
            compute_report(&[1.0, 2.0], 0.0, "positions.csv"),
            Err(Error::BalanceCount(2))
        ));
    }

    #[test]
    fn empty_buckets_hold_under_all_bonds() {
        let strategy =
            compute_strategy(&balances(1000.0, 0.0, 0.0), 0.0, AllocationPolicy::AllBonds);
        assert!(strategy.lines.iter().all(|l| l.action == Action::Hold));
        assert_eq!(
            rendered(&strategy),
            [
                "Looks good for Bonds",
                "Looks good for International Index",
                "Looks good for National Index",
            ]
        );
    }

    #[test]
    fn holds_inside_band() {
        // 1000 against a 1040 target is a ratio of 1.04.
        let strategy = compute_strategy(
            &balances(1000.0, 3120.0, 6280.0),
            0.0,
            AllocationPolicy::Target2020,
        );
        assert_eq!(strategy.lines[0].action, Action::Hold);

        // Band edges are exclusive.
        assert_eq!(decide(105.0, 100.0, 0.0), Action::Buy(5.0));
        assert_eq!(decide(95.0, 100.0, 0.0), Action::Sell(5.0));
        assert_eq!(decide(104.0, 100.0, 0.0), Action::Hold);

        // Empty on both sides only holds without new money.
        assert_eq!(decide(0.0, 0.0, 0.0), Action::Hold);
        assert_eq!(decide(0.0, 0.0, 100.0), Action::Sell(0.0));
    }

    #[test]
    fn fractional_investment_can_hold() {
        let held = balances(600.0, 1800.0, 3600.0);
        let strategy = compute_strategy(&held, 0.5, AllocationPolicy::Target2020);
        assert!(strategy.lines.iter().all(|l| l.action == Action::Hold));

        let strategy = compute_strategy(&held, 12.9, AllocationPolicy::Target2020);
        assert_eq!(strategy.lines[0].to_string(), "Buy $1.29 Bonds");
        assert_eq!(strategy.lines[1].to_string(), "Buy $3.87 International Index");
        assert_eq!(strategy.lines[2].to_string(), "Buy $7.74 National Index");
    }

    #[test]
    fn empty_account_buys_everything() {
        let strategy = compute_strategy(
            &balances(0.0, 0.0, 0.0),
            1000.0,
            AllocationPolicy::Target2030,
        );
        assert_eq!(
            rendered(&strategy),
            [
                "Buy $300.00 Bonds",
                "Buy $270.00 International Index",
                "Buy $430.00 National Index",
            ]
        );
    }

    #[test]
    fn unwanted_buckets_are_sold() {
        let strategy =
            compute_strategy(&balances(1000.0, 500.0, 0.0), 0.0, AllocationPolicy::AllBonds);
        assert_eq!(
            rendered(&strategy),
            [
                "Buy $500.00 Bonds",
                "Sell $500.00 International Index",
                "Looks good for National Index",
            ]
        );
    }

    #[test]
    fn investment_input() {
        assert_eq!(parse_investment("").unwrap(), 0.0);
        assert_eq!(parse_investment("  ").unwrap(), 0.0);
        assert_eq!(parse_investment("250").unwrap(), 250.0);
        assert_eq!(parse_investment("$19.99").unwrap(), 19.99);
        for text in ["ten", "-5", "1,000"] {
            assert!(matches!(parse_investment(text), Err(Error::Format(_))), "{text}");
        }
    }

    #[test]
    fn table_lists_each_bucket() {
        let holdings = Holdings {
            source: "positions-2020.csv".into(),
            balances: balances(1000.0, 2000.0, 3000.0),
            display: ["FXNAX", "FZILX", "FZROX"]
                .iter()
                .zip(["1000.00", "2000.00", "3000.00"])
                .map(|(symbol, value)| crate::portfolio::DisplayRow {
                    symbol: symbol.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        };
        let strategy = compute_strategy(&holdings.balances, 0.0, AllocationPolicy::Target2020);
        let table = allocation_table(&holdings, &strategy).to_string();
        for expected in [
            "Symbol",
            "Target Allocation",
            "FZILX",
            "16.67%",
            "33.33%",
            "50.00%",
            "1800.00",
            "60.00%",
        ] {
            assert!(table.contains(expected), "missing {expected} in\n{table}");
        }
    }
}
