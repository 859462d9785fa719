//! Labeled numeric readouts for the dashboard table.

use sim_core::{Ledger, RateConfig};
use std::fmt;

/// A per-second rate attached to a readout.
#[derive(Clone, Debug, PartialEq)]
pub enum RateCell {
    /// Whole dollars per second.
    Cash(i64),
    /// Signed net change per second of the row's own quantity.
    Net(f64),
    /// Contribution to another quantity, e.g. "0.03 Users/sec".
    Of(f64, &'static str),
    /// Cost in whole dollars per second.
    Cost(i64),
}

impl fmt::Display for RateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateCell::Cash(v) => write!(f, "${v}/sec"),
            RateCell::Net(v) => write!(f, "{v:+.2}/sec"),
            RateCell::Of(v, unit) => write!(f, "{v:.2} {unit}/sec"),
            RateCell::Cost(v) => write!(f, "{v} $/sec"),
        }
    }
}

/// A present value and zero or more rates.
#[derive(Clone, Debug, PartialEq)]
pub struct Readout {
    pub label: &'static str,
    pub value: i64,
    pub rates: Vec<RateCell>,
}

/// A table row; spacers group related readouts.
#[derive(Clone, Debug, PartialEq)]
pub enum Row {
    Spacer,
    Readout(Readout),
}

fn row(label: &'static str, value: i64, rates: Vec<RateCell>) -> Row {
    Row::Readout(Readout {
        label,
        value,
        rates,
    })
}

/// Dashboard rows for a ledger snapshot.
pub fn readouts(ledger: &Ledger, rates: &RateConfig) -> Vec<Row> {
    let r = &ledger.rates;
    vec![
        row("Company Value", ledger.price_per_share, vec![]),
        row("Cash", ledger.cash, vec![RateCell::Cash(r.cash_per_second)]),
        Row::Spacer,
        row(
            "Users",
            ledger.users,
            vec![RateCell::Net(r.net_users_per_second())],
        ),
        Row::Spacer,
        row(
            "Features",
            ledger.features,
            vec![
                RateCell::Of(r.users_per_second_from_features, "Users"),
                RateCell::Of(r.bugs_per_second_from_features, "Bugs"),
            ],
        ),
        row(
            "Bugs",
            ledger.bugs,
            vec![RateCell::Of(-r.users_lost_per_second, "Users")],
        ),
        Row::Spacer,
        row(
            "Devs",
            ledger.devs,
            vec![
                RateCell::Of(r.features_per_second, "Features"),
                RateCell::Of(r.bugs_per_second_from_devs, "Bugs"),
                RateCell::Cost(ledger.devs.saturating_mul(rates.dev_salary)),
            ],
        ),
        row(
            "QA",
            ledger.qa,
            vec![RateCell::Of(r.bug_fixes_per_second, "Fixes")],
        ),
        row(
            "Marketers",
            ledger.marketers,
            vec![RateCell::Of(r.users_per_second_from_marketers, "Users")],
        ),
    ]
}
