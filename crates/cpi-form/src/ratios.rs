//! # Derived Financial Metrics
//!
//! Pure recomputation of the five ratios a financial entry carries
//! alongside its inputs. Runs on every field change within a financial
//! row; the outputs are stored as plain numerics next to the inputs
//! they summarize and are never edited directly.
//!
//! ## Significance Rule
//!
//! An input participates only if it parses as a finite number and is
//! non-zero. Blank, non-numeric, and zero are all *absent*: a ratio
//! whose numerator or denominator is absent is left unset (`None`),
//! never emitted as zero, and no division by zero can occur.

use cpi_core::coerce::parse_amount;

use crate::records::FinancialEntry;

/// The five derived ratios of one financial entry, each independently
/// absent when its inputs are.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivedRatios {
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margin: Option<f64>,
}

/// A financial input, under the significance rule.
fn significant(s: &str) -> Option<f64> {
    parse_amount(s).filter(|v| *v != 0.0)
}

/// Round to 2 decimal places, half away from zero.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>, scale: f64) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) => Some(round2(n / d * scale)),
        _ => None,
    }
}

/// Recompute the derived ratios of one entry.
///
/// Side-effect-free and idempotent: the same inputs always produce the
/// same outputs, and fields outside the seven inputs read here never
/// influence the result.
pub fn compute_ratios(entry: &FinancialEntry) -> DerivedRatios {
    let revenue = significant(&entry.total_revenue);
    let net_profit = significant(&entry.net_profit);
    let total_assets = significant(&entry.total_assets);
    let current_assets = significant(&entry.current_assets);
    let total_liabilities = significant(&entry.total_liabilities);
    let current_liabilities = significant(&entry.current_liabilities);
    let equity = significant(&entry.shareholders_equity);

    DerivedRatios {
        debt_to_equity: ratio(total_liabilities, equity, 1.0),
        current_ratio: ratio(current_assets, current_liabilities, 1.0),
        return_on_equity: ratio(net_profit, equity, 100.0),
        return_on_assets: ratio(net_profit, total_assets, 100.0),
        profit_margin: ratio(net_profit, revenue, 100.0),
    }
}

impl FinancialEntry {
    /// Recompute this row's ratios in place.
    pub fn recompute_ratios(&mut self) {
        let ratios = compute_ratios(self);
        self.debt_to_equity = ratios.debt_to_equity;
        self.current_ratio = ratios.current_ratio;
        self.return_on_equity = ratios.return_on_equity;
        self.return_on_assets = ratios.return_on_assets;
        self.profit_margin = ratios.profit_margin;
    }
}
