//! Creation-form parsing and small generators used by the handlers.

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

const DRAW_ID_LEN: usize = 8;

/// One name per line; lines are trimmed and blank lines dropped.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comma-separated amounts. Non-digit characters are stripped per token
/// (so "50₺" reads as 50) and tokens with no parsable digits are dropped.
pub fn parse_amounts(text: &str) -> Vec<u32> {
    text.split(',')
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .filter_map(|digits| digits.parse().ok())
        .collect()
}

/// Non-numeric or non-positive counts coerce to 1; clamping against the
/// name count happens in the draw engine.
pub fn parse_winner_count(text: &str) -> usize {
    match text.trim().parse::<i64>() {
        Ok(n) if n >= 1 => n as usize,
        _ => 1,
    }
}

/// Short random token identifying a draw. Generated fresh per request, so
/// two concurrent creations cannot target the same id.
pub fn new_draw_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DRAW_ID_LEN)
        .map(char::from)
        .collect()
}

pub fn now_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
