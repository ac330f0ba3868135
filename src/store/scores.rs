//! Score recorder for live matches.

use super::standings::refresh_standings;
use super::Store;
use crate::logic::{games_played, match_stats};
use crate::models::{MatchId, PlayerId, ScoreUpdate, TournamentError};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

impl Store {
    /// Record the result of a live match.
    ///
    /// In one transaction: write both scores and mark the match completed, upsert the
    /// derived stats of both players keyed by (player, match), and refresh standings.
    /// Applying the same or a corrected result again overwrites; nothing accumulates.
    /// Scores whose sum does not fit a `u32` are rejected before anything is written.
    pub fn record_score(
        &self,
        match_id: MatchId,
        score: ScoreUpdate,
    ) -> Result<MatchId, TournamentError> {
        games_played(score)?;
        self.write(|tx| {
            let (player1_id, player2_id): (PlayerId, PlayerId) = tx
                .query_row(
                    "SELECT player1_id, player2_id FROM matches WHERE id = ?1",
                    params![match_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?
                .ok_or_else(|| TournamentError::not_found(format!("match {match_id}")))?;

            let now = Utc::now();
            tx.execute(
                r#"
                UPDATE matches
                SET score1 = ?1, score2 = ?2, completed = 1, updated_at = ?3
                WHERE id = ?4
                "#,
                params![score.score1, score.score2, now, match_id],
            )?;

            let mut upsert = tx.prepare(
                r#"
                INSERT INTO player_match_stats (player_id, match_id, games_played, games_won, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (player_id, match_id)
                DO UPDATE SET games_played = excluded.games_played,
                              games_won = excluded.games_won,
                              updated_at = excluded.updated_at
                "#,
            )?;
            for stat in match_stats(match_id, player1_id, player2_id, score)? {
                upsert.execute(params![
                    stat.player_id,
                    stat.match_id,
                    stat.games_played,
                    stat.games_won,
                    now
                ])?;
            }

            refresh_standings(tx)
        })?;

        log::info!(
            "Recorded score {}-{} for match {}",
            score.score1,
            score.score2,
            match_id
        );
        Ok(match_id)
    }
}
