//! Pure tournament logic: pairing and the standings projection. No I/O.

mod pairing;
mod standings;

pub use pairing::{round_robin_len, round_robin_pairs};
pub use standings::{
    assign_final_positions, compare_by_points_then_scored, compare_by_points_then_wins,
    compute_standings, games_played, match_stats, MatchResult, POINTS_FOR_LOSS, POINTS_FOR_TIE,
    POINTS_FOR_WIN,
};
