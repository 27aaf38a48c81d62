//! Winner selection.
//!
//! A draw reduces a name list, an amount list, and a winner count to an
//! ordered winners-with-amounts list. Selection uses the thread RNG in
//! production; it is not cryptographically secure and no fairness audit is
//! attempted.

use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Prize assigned to every winner when no amounts were supplied.
pub const DEFAULT_AMOUNT: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub name: String,
    pub amount: u32,
}

/// Selects the winners for one draw.
///
/// The name pool is shuffled unbiased and the first `winner_count` entries
/// win, in shuffle order. The amount pool is shuffled independently and
/// cycles across winners, so repeated amounts are expected when there are
/// fewer amounts than winners. Counts above the name count are clamped
/// down; the form parser has already coerced non-numeric or non-positive
/// counts to 1. The only rejected input is an empty name list.
pub fn compute_draw(
    names: &[String],
    amounts: &[u32],
    winner_count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Winner>, AppError> {
    if names.is_empty() {
        return Err(AppError::InvalidInput("name list cannot be empty".into()));
    }

    let winner_count = winner_count.clamp(1, names.len());

    let mut pool = names.to_vec();
    pool.shuffle(rng);

    let mut amount_pool = if amounts.is_empty() {
        vec![DEFAULT_AMOUNT]
    } else {
        amounts.to_vec()
    };
    amount_pool.shuffle(rng);

    Ok(pool
        .into_iter()
        .take(winner_count)
        .enumerate()
        .map(|(i, name)| Winner {
            name,
            amount: amount_pool[i % amount_pool.len()],
        })
        .collect())
}

/// Ticker lines the result page cycles through before showing the table.
/// Purely presentational; the stored result is never recomputed.
pub fn spin_labels(winners: &[Winner]) -> Vec<String> {
    winners
        .iter()
        .map(|w| format!("{} — {}₺", w.name, w.amount))
        .collect()
}
