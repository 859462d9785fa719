#![deny(warnings)]

//! Economic models: flow accumulation and valuation helpers for The Startup(TM).
//!
//! This module provides the pure arithmetic of one simulation step:
//! - Drift-free conversion of fractional per-tick rates into whole units
//! - The five ordered resource flows (features, fixes, bugs, users gained, users lost)
//! - Cash income and the linear share price
//! - Logarithmic particle density from cash velocity

use sim_core::{Ledger, RateConfig, SharePriceWeights, SimConfig};

/// Add `rate` to `progress` and split off the whole units.
///
/// Returns `(units, remainder)` with `units = floor(progress + rate)` and the
/// remainder in `[0, 1)`. Negative or non-finite rates count as zero.
///
/// Example:
/// let (units, rest) = accumulate(0.75, 0.5);
/// assert_eq!(units, 1);
/// assert_eq!(rest, 0.25);
pub fn accumulate(progress: f64, rate: f64) -> (i64, f64) {
    let rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
    let progress = if progress.is_finite() {
        progress.max(0.0)
    } else {
        0.0
    };
    let total = progress + rate;
    let units = total.floor();
    (units as i64, total - units)
}

/// Apply the five flows in their fixed order.
///
/// Order matters: bug generation reads `features` after this tick's feature
/// growth, user growth reads it too, and user loss reads `bugs` after both
/// fixes and new bugs. `bugs` and `users` are floored at zero.
pub fn step_flows(ledger: &Ledger, rates: &RateConfig) -> Ledger {
    let mut next = ledger.clone();

    // 1. features
    let features_per_second = next.devs as f64 * rates.features_per_dev;
    let (shipped, p) = accumulate(next.progress.feature, features_per_second);
    next.features = next.features.saturating_add(shipped);
    next.progress.feature = p;

    // 2. bug fixes
    let fixes_per_second = next.qa as f64 * rates.bug_fixes_per_qa;
    let (fixed, p) = accumulate(next.progress.bug_fix, fixes_per_second);
    next.bugs = next.bugs.saturating_sub(fixed).max(0);
    next.progress.bug_fix = p;

    // 3. new bugs
    let from_devs = next.devs as f64 * rates.bugs_per_dev;
    let from_features = next.features as f64 * rates.bugs_per_feature;
    let (introduced, p) = accumulate(next.progress.bug, from_devs + from_features);
    next.bugs = next.bugs.saturating_add(introduced);
    next.progress.bug = p;

    // 4. users gained
    let from_feature_users = next.features as f64 * rates.users_per_feature;
    let from_marketers = next.marketers as f64 * rates.users_per_marketer;
    let (gained, p) = accumulate(next.progress.user, from_feature_users + from_marketers);
    next.users = next.users.saturating_add(gained);
    next.progress.user = p;

    // 5. users lost
    let lost_per_second = next.bugs as f64 * rates.users_lost_per_bug;
    let (lost, p) = accumulate(next.progress.lost_user, lost_per_second);
    next.users = next.users.saturating_sub(lost).max(0);
    next.progress.lost_user = p;

    next.rates.features_per_second = features_per_second;
    next.rates.bug_fixes_per_second = fixes_per_second;
    next.rates.bugs_per_second_from_devs = from_devs;
    next.rates.bugs_per_second_from_features = from_features;
    next.rates.users_per_second_from_features = from_feature_users;
    next.rates.users_per_second_from_marketers = from_marketers;
    next.rates.users_lost_per_second = lost_per_second;
    next
}

/// Cash earned this second: users times features times the per-pair rate.
pub fn cash_per_second(ledger: &Ledger, rates: &RateConfig) -> i64 {
    rates
        .cash_per_user_feature
        .saturating_mul(ledger.users)
        .saturating_mul(ledger.features)
}

/// Linear company valuation. Goes negative once bugs outweigh everything else.
pub fn share_price(ledger: &Ledger, w: &SharePriceWeights) -> i64 {
    [
        (w.feature, ledger.features),
        (w.dev, ledger.devs),
        (w.bug, ledger.bugs),
        (w.user, ledger.users),
        (w.marketer, ledger.marketers),
    ]
    .iter()
    .fold(0i64, |acc, (weight, count)| {
        acc.saturating_add(weight.saturating_mul(*count))
    })
}

/// One full economic step: flows, then income, then valuation.
pub fn advance(ledger: &Ledger, cfg: &SimConfig) -> Ledger {
    let mut next = step_flows(ledger, &cfg.rates);
    let income = cash_per_second(&next, &cfg.rates);
    next.rates.cash_per_second = income;
    next.cash = next.cash.saturating_add(income);
    next.price_per_share = share_price(&next, &cfg.share_price);
    next
}

/// Number of particles to show for a cash rate: `floor(log2(rate))`, clamped
/// to `[0, pool]`. Non-positive rates show none.
pub fn visible_particles(cash_per_second: i64, pool: usize) -> usize {
    if cash_per_second <= 0 {
        return 0;
    }
    (cash_per_second.ilog2() as usize).min(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zero_rates() -> RateConfig {
        RateConfig {
            features_per_dev: 0.0,
            bug_fixes_per_qa: 0.0,
            bugs_per_dev: 0.0,
            bugs_per_feature: 0.0,
            users_per_feature: 0.0,
            users_per_marketer: 0.0,
            users_lost_per_bug: 0.0,
            cash_per_user_feature: 1,
            dev_salary: 1,
        }
    }

    #[test]
    fn accumulate_carries_fraction() {
        assert_eq!(accumulate(0.75, 0.5), (1, 0.25));
        assert_eq!(accumulate(0.0, 0.0), (0, 0.0));
        assert_eq!(accumulate(0.5, 2.0), (2, 0.5));
    }

    #[test]
    fn accumulate_ignores_bad_rates() {
        assert_eq!(accumulate(0.5, -3.0), (0, 0.5));
        assert_eq!(accumulate(0.5, f64::NAN), (0, 0.5));
        assert_eq!(accumulate(0.5, f64::INFINITY), (0, 0.5));
    }

    #[test]
    fn bug_generation_reads_features_shipped_this_tick() {
        let rates = RateConfig {
            features_per_dev: 0.5,
            bugs_per_feature: 1.0,
            ..zero_rates()
        };
        let ledger = Ledger {
            devs: 2,
            ..Ledger::new()
        };
        let next = step_flows(&ledger, &rates);
        assert_eq!(next.features, 1);
        assert_eq!(next.bugs, 1, "new bugs must see the feature shipped this tick");
        assert_eq!(next.rates.bugs_per_second_from_features, 1.0);
    }

    #[test]
    fn user_loss_reads_bugs_after_generation() {
        let rates = RateConfig {
            bugs_per_dev: 1.0,
            users_lost_per_bug: 1.0,
            ..zero_rates()
        };
        let ledger = Ledger {
            devs: 1,
            users: 5,
            ..Ledger::default()
        };
        let next = step_flows(&ledger, &rates);
        assert_eq!(next.bugs, 1);
        assert_eq!(next.users, 4);
    }

    #[test]
    fn bugs_and_users_floor_at_zero() {
        let rates = RateConfig {
            bug_fixes_per_qa: 1.0,
            users_lost_per_bug: 1.0,
            ..zero_rates()
        };
        let ledger = Ledger {
            qa: 5,
            bugs: 2,
            ..Ledger::new()
        };
        let next = step_flows(&ledger, &rates);
        assert_eq!(next.bugs, 0);

        let ledger = Ledger {
            bugs: 10,
            users: 3,
            ..Ledger::default()
        };
        let next = step_flows(&ledger, &rates);
        assert_eq!(next.users, 0);
    }

    #[test]
    fn user_loss_drains_its_own_accumulator() {
        let rates = RateConfig {
            users_lost_per_bug: 0.5,
            ..zero_rates()
        };
        let ledger = Ledger {
            bugs: 3,
            users: 10,
            progress: sim_core::Progress {
                user: 0.25,
                ..Default::default()
            },
            ..Ledger::default()
        };
        let next = step_flows(&ledger, &rates);
        assert_eq!(next.users, 9);
        assert_eq!(next.progress.lost_user, 0.5);
        assert_eq!(next.progress.user, 0.25);
    }

    #[test]
    fn share_price_is_linear_and_can_go_negative() {
        let w = SharePriceWeights::default();
        let ledger = Ledger {
            features: 2,
            users: 3,
            devs: 1,
            marketers: 1,
            bugs: 1,
            ..Ledger::default()
        };
        assert_eq!(share_price(&ledger, &w), 200 + 300 + 1000 + 1000 - 500);

        let buggy = Ledger {
            bugs: 10,
            users: 1,
            ..Ledger::default()
        };
        assert!(share_price(&buggy, &w) < 0);
    }

    #[test]
    fn advance_pays_users_times_features() {
        let cfg = SimConfig::default();
        let ledger = Ledger {
            users: 10,
            features: 4,
            ..Ledger::default()
        };
        let next = advance(&ledger, &cfg);
        assert_eq!(next.rates.cash_per_second, next.users * next.features);
        assert_eq!(next.cash, next.rates.cash_per_second);
    }

    #[test]
    fn particle_density_is_logarithmic() {
        assert_eq!(visible_particles(0, 20), 0);
        assert_eq!(visible_particles(-8, 20), 0);
        assert_eq!(visible_particles(1, 20), 0);
        assert_eq!(visible_particles(2, 20), 1);
        assert_eq!(visible_particles(1023, 20), 9);
        assert_eq!(visible_particles(1024, 20), 10);
        assert_eq!(visible_particles(i64::MAX, 20), 20);
    }

    proptest! {
        #[test]
        fn accumulate_floors_and_stays_fractional(p in 0.0f64..1.0, r in 0.0f64..1000.0) {
            let (units, rest) = accumulate(p, r);
            prop_assert_eq!(units, (p + r).floor() as i64);
            prop_assert!((0.0..1.0).contains(&rest));
        }

        #[test]
        fn accumulate_does_not_drift(r in 0.0f64..5.0, n in 1usize..2000) {
            let mut p = 0.0;
            let mut total = 0i64;
            for _ in 0..n {
                let (units, rest) = accumulate(p, r);
                total += units;
                p = rest;
                prop_assert!((0.0..1.0).contains(&p));
            }
            let expected = r * n as f64;
            prop_assert!((total as f64 - expected).abs() <= 1.0 + 1e-6 * expected);
        }
    }
}
