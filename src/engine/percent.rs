use serde::{Deserialize, Serialize};

use super::VoteCount;

/// What to report for a question with no votes at all.
///
/// Applied to every stats endpoint alike.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroResponsePolicy {
    /// 0% / 0%.
    #[default]
    Zero,
    /// 50% / 50%.
    EvenSplit,
}

/// `matched / common` as a percentage rounded to one decimal place; zero when
/// nothing is in common.
pub fn match_percentage(matched: usize, common: usize) -> f64 {
    if common == 0 {
        return 0.0;
    }
    (matched as f64 / common as f64 * 1000.0).round() / 10.0
}

/// Whole-number shares of options A and B.
///
/// Each share is rounded on its own, so the two can sum to 99 or 101.
pub fn vote_percentages(counts: VoteCount, policy: ZeroResponsePolicy) -> (u32, u32) {
    let total = counts.total();
    if total == 0 {
        return match policy {
            ZeroResponsePolicy::Zero => (0, 0),
            ZeroResponsePolicy::EvenSplit => (50, 50),
        };
    }
    (
        share(counts.option_a_count, total),
        share(counts.option_b_count, total),
    )
}

fn share(count: u64, total: u64) -> u32 {
    (count as f64 / total as f64 * 100.0).round() as u32
}
