//! Standings projection: per-player aggregates derived from match rows, and their ranking.
//!
//! Scoring: a completed match gives 3 points for a win, 1 for a tie, 0 for a loss.
//! Pending matches contribute nothing.

use crate::models::{MatchId, PlayerId, PlayerMatchStat, ScoreUpdate, Standing, TournamentError};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_TIE: u32 = 1;
pub const POINTS_FOR_LOSS: u32 = 0;

/// The parts of a match row the projection reads.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MatchResult {
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub score1: Option<u32>,
    pub score2: Option<u32>,
    pub completed: bool,
}

impl MatchResult {
    /// Both scores, if the match counts towards standings.
    fn final_score(&self) -> Option<(u32, u32)> {
        match (self.completed, self.score1, self.score2) {
            (true, Some(s1), Some(s2)) => Some((s1, s2)),
            _ => None,
        }
    }
}

/// Games played in a match: the sum of both scores.
///
/// Fails with [`TournamentError::Validation`] when the sum does not fit a `u32`, so a result
/// is rejected before anything derived from it is stored.
pub fn games_played(score: ScoreUpdate) -> Result<u32, TournamentError> {
    score.score1.checked_add(score.score2).ok_or_else(|| {
        TournamentError::validation(format!(
            "score {}-{} is out of range",
            score.score1, score.score2
        ))
    })
}

/// Derived stats for both sides of a scored match: games played is the sum of both
/// scores, games won is the side's own score.
pub fn match_stats(
    match_id: MatchId,
    player1_id: PlayerId,
    player2_id: PlayerId,
    score: ScoreUpdate,
) -> Result<[PlayerMatchStat; 2], TournamentError> {
    let games_played = games_played(score)?;
    Ok([
        PlayerMatchStat {
            player_id: player1_id,
            match_id,
            games_played,
            games_won: score.score1,
        },
        PlayerMatchStat {
            player_id: player2_id,
            match_id,
            games_played,
            games_won: score.score2,
        },
    ])
}

fn apply_side(standing: &mut Standing, own: u32, other: u32) {
    // Aggregates saturate: rows written before scores were range-checked must not panic.
    standing.matches_played = standing.matches_played.saturating_add(1);
    standing.total_points_scored = standing.total_points_scored.saturating_add(own);
    standing.total_matches = standing
        .total_matches
        .saturating_add(own.saturating_add(other));
    let (counter, points) = match own.cmp(&other) {
        Ordering::Greater => (&mut standing.wins, POINTS_FOR_WIN),
        Ordering::Equal => (&mut standing.ties, POINTS_FOR_TIE),
        Ordering::Less => (&mut standing.losses, POINTS_FOR_LOSS),
    };
    *counter = counter.saturating_add(1);
    standing.points = standing.points.saturating_add(points);
}

/// Recompute standings from scratch for `players` (id, display name), in the given order.
///
/// Every listed player gets a row, even with no completed matches. Sides referring to
/// players not in the list are skipped.
pub fn compute_standings(players: &[(PlayerId, String)], matches: &[MatchResult]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = players
        .iter()
        .map(|(id, name)| Standing::new(*id, name.clone()))
        .collect();
    let index: HashMap<PlayerId, usize> = standings
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id, i))
        .collect();

    for m in matches {
        let Some((s1, s2)) = m.final_score() else {
            continue;
        };
        if let Some(&i) = index.get(&m.player1_id) {
            apply_side(&mut standings[i], s1, s2);
        }
        if let Some(&i) = index.get(&m.player2_id) {
            apply_side(&mut standings[i], s2, s1);
        }
    }
    standings
}

/// Live/archive ranking: points desc, total points scored desc, then player id asc.
pub fn compare_by_points_then_scored(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.total_points_scored.cmp(&a.total_points_scored))
        .then_with(|| a.id.cmp(&b.id))
}

/// Online ranking: points desc, wins desc, then player id asc.
pub fn compare_by_points_then_wins(a: &Standing, b: &Standing) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort by the live ranking and pair each row with its 1-based final position.
///
/// Positions are consecutive and distinct; rows equal on points and points scored are
/// separated by player id.
pub fn assign_final_positions(mut standings: Vec<Standing>) -> Vec<(u32, Standing)> {
    standings.sort_by(compare_by_points_then_scored);
    standings
        .into_iter()
        .enumerate()
        .map(|(i, s)| (i as u32 + 1, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(p1: PlayerId, p2: PlayerId, s1: u32, s2: u32) -> MatchResult {
        MatchResult {
            player1_id: p1,
            player2_id: p2,
            score1: Some(s1),
            score2: Some(s2),
            completed: true,
        }
    }

    fn roster() -> Vec<(PlayerId, String)> {
        vec![(1, "Ana".into()), (2, "Bruno".into()), (3, "Carla".into())]
    }

    #[test]
    fn wins_ties_and_losses_are_scored() {
        let matches = [scored(1, 2, 2, 1), scored(1, 3, 1, 1), scored(2, 3, 0, 2)];
        let s = compute_standings(&roster(), &matches);

        assert_eq!((s[0].wins, s[0].ties, s[0].losses, s[0].points), (1, 1, 0, 4));
        assert_eq!((s[1].wins, s[1].ties, s[1].losses, s[1].points), (0, 0, 2, 0));
        assert_eq!((s[2].wins, s[2].ties, s[2].losses, s[2].points), (1, 1, 0, 4));
        assert_eq!(s[0].total_points_scored, 3);
        assert_eq!(s[0].total_matches, 5);
        assert_eq!(s[1].matches_played, 2);
    }

    #[test]
    fn pending_matches_do_not_count() {
        let pending = MatchResult {
            player1_id: 1,
            player2_id: 2,
            score1: None,
            score2: None,
            completed: false,
        };
        let s = compute_standings(&roster(), &[pending]);
        assert!(s.iter().all(|row| row.matches_played == 0 && row.points == 0));
    }

    #[test]
    fn final_positions_follow_points_then_scored() {
        let mut p1 = Standing::new(1, "P1");
        p1.points = 9;
        p1.total_points_scored = 15;
        let mut p2 = Standing::new(2, "P2");
        p2.points = 9;
        p2.total_points_scored = 12;
        let mut p3 = Standing::new(3, "P3");
        p3.points = 6;
        p3.total_points_scored = 10;

        let ranked = assign_final_positions(vec![p3, p2, p1]);
        let order: Vec<(u32, PlayerId)> = ranked.iter().map(|(pos, s)| (*pos, s.id)).collect();
        assert_eq!(order, vec![(1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn full_ties_are_broken_by_player_id() {
        let a = Standing::new(7, "A");
        let b = Standing::new(4, "B");
        let ranked = assign_final_positions(vec![a, b]);
        assert_eq!(ranked[0].1.id, 4);
        assert_eq!(ranked[1].1.id, 7);
    }

    #[test]
    fn match_stats_sum_both_scores() {
        let [first, second] = match_stats(10, 1, 2, ScoreUpdate { score1: 2, score2: 1 }).unwrap();
        assert_eq!((first.games_played, first.games_won), (3, 2));
        assert_eq!((second.games_played, second.games_won), (3, 1));
    }

    #[test]
    fn overflowing_score_sum_is_rejected() {
        let score = ScoreUpdate {
            score1: u32::MAX,
            score2: 1,
        };
        assert!(matches!(games_played(score), Err(TournamentError::Validation(_))));
        assert!(matches!(
            match_stats(10, 1, 2, score),
            Err(TournamentError::Validation(_))
        ));
        assert_eq!(
            games_played(ScoreUpdate {
                score1: u32::MAX,
                score2: 0
            })
            .unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn huge_stored_scores_saturate_instead_of_wrapping() {
        let s = compute_standings(&roster(), &[scored(1, 2, u32::MAX, 1)]);
        assert_eq!(s[0].total_matches, u32::MAX);
        assert_eq!(s[0].wins, 1);
        assert_eq!(s[1].total_points_scored, 1);
    }
}
