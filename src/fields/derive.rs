//! Derived-value rules
//!
//! Percentages derived from absolute values and equal weight redistribution.
//! Both run synchronously inside the edit that triggers them, so no caller can
//! observe a half-updated row set.

use crate::answers::{KeyValueRow, WeightedCriterion};

/// Target total for weighted criteria
pub const WEIGHT_TOTAL: f64 = 100.0;

const WEIGHT_EPSILON: f64 = 1e-9;

/// Round half up (towards positive infinity on ties)
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Set every row's percentage to its rounded share of the value total.
///
/// Returns `false` and leaves the rows untouched when the total is zero.
/// Rounding drift across rows is not corrected.
pub fn recompute_percentages(rows: &mut [KeyValueRow]) -> bool {
    let denominator: f64 = rows.iter().map(|r| r.value).sum();
    if denominator == 0.0 || !denominator.is_finite() {
        return false;
    }

    for row in rows.iter_mut() {
        row.percentage = Some(round_half_up(100.0 * row.value / denominator));
    }
    true
}

/// Equal integer split of 100 over `n` rows, remainder on the first row
pub fn equal_weights(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let total = WEIGHT_TOTAL as usize;
    let equal = total / n;
    let remainder = total - equal * n;

    let mut weights = vec![equal as f64; n];
    weights[0] += remainder as f64;
    weights
}

/// Overwrite all weights with the equal split for the current row count
pub fn redistribute_weights(criteria: &mut [WeightedCriterion]) {
    let weights = equal_weights(criteria.len());
    for (criterion, weight) in criteria.iter_mut().zip(weights) {
        criterion.weight = weight;
    }
}

pub fn weight_total(criteria: &[WeightedCriterion]) -> f64 {
    criteria.iter().map(|c| c.weight).sum()
}

/// True when the weights add up to exactly 100
pub fn weights_balanced(criteria: &[WeightedCriterion]) -> bool {
    (weight_total(criteria) - WEIGHT_TOTAL).abs() < WEIGHT_EPSILON
}

/// Split `total` across named shares (which need not add up to 1) into rows
/// whose values are rounded to whole units, then derive their percentages.
pub fn proportional_rows(total: f64, shares: &[(&str, f64)]) -> Vec<KeyValueRow> {
    let share_sum: f64 = shares.iter().map(|(_, s)| s).sum();
    let mut rows: Vec<KeyValueRow> = shares
        .iter()
        .map(|(key, share)| {
            let value = if share_sum > 0.0 {
                round_half_up(total * share / share_sum)
            } else {
                0.0
            };
            KeyValueRow::new(*key, value)
        })
        .collect();
    recompute_percentages(&mut rows);
    rows
}
