//! Online tournaments: creation with generated round-robin pairings, results, standings, deletion.

use super::archive::{parse_tournament_row, TOURNAMENT_COLUMNS};
use super::players::roster_player_name;
use super::{Metadata, Store};
use crate::logic::{
    compare_by_points_then_wins, compute_standings, games_played, round_robin_pairs, MatchResult,
};
use crate::models::{
    MatchId, OnlineMatch, OnlineScoreRecorded, OnlineStanding, OnlineTournamentCreated,
    OnlineTournamentRequest, PlayerId, ScoreUpdate, Tournament, TournamentError, TournamentId,
    TournamentType,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

const MATCH_COLUMNS: &str = "id, tournament_id, player1_id, player2_id, player1_name, player2_name, \
     score1, score2, completed, match_date, created_at, updated_at";

fn parse_online_match_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<OnlineMatch> {
    Ok(OnlineMatch {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player1_id: row.get(2)?,
        player2_id: row.get(3)?,
        player1_name: row.get(4)?,
        player2_name: row.get(5)?,
        score1: row.get(6)?,
        score2: row.get(7)?,
        completed: row.get(8)?,
        match_date: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn select_online_tournament(
    conn: &Connection,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    conn.query_row(
        &format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1 AND type = 'ONLINE'"),
        params![id],
        parse_tournament_row,
    )
    .optional()?
    .ok_or_else(|| TournamentError::not_found(format!("online tournament {id}")))
}

fn select_online_matches(
    conn: &Connection,
    id: TournamentId,
    filter: &str,
    order: &str,
) -> Result<Vec<OnlineMatch>, TournamentError> {
    select_online_tournament(conn, id)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {MATCH_COLUMNS} FROM online_tournament_matches WHERE tournament_id = ?1 {filter} ORDER BY {order}"
    ))?;
    let rows = stmt.query_map(params![id], parse_online_match_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Remove the pairings and participants of an online tournament (not the tournament row).
pub(super) fn delete_online_rows(conn: &Connection, id: TournamentId) -> Result<(), TournamentError> {
    conn.execute(
        "DELETE FROM online_tournament_matches WHERE tournament_id = ?1",
        params![id],
    )?;
    conn.execute(
        "DELETE FROM online_tournament_players WHERE tournament_id = ?1",
        params![id],
    )?;
    Ok(())
}

impl Store {
    /// Create an online tournament over master-roster players and generate every pairing.
    ///
    /// Participant names are copied into the tournament so later roster edits do not change
    /// it. Pairings follow [`round_robin_pairs`] over `player_ids` in the given order; all
    /// start incomplete. An id missing from the roster fails with
    /// [`TournamentError::UnknownPlayer`] and nothing is written.
    pub fn create_online_tournament(
        &self,
        request: &OnlineTournamentRequest,
    ) -> Result<OnlineTournamentCreated, TournamentError> {
        let meta = Metadata::validate(
            &request.name,
            &request.month,
            request.year,
            request.start_date,
            request.end_date,
        )?;
        if request.player_ids.len() < 2 {
            return Err(TournamentError::validation("at least 2 players are required"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = request.player_ids.iter().find(|id| !seen.insert(**id)) {
            return Err(TournamentError::validation(format!(
                "player {dup} is listed more than once"
            )));
        }

        let created = self.write(|tx| {
            let mut participants: Vec<(PlayerId, String)> =
                Vec::with_capacity(request.player_ids.len());
            for &id in &request.player_ids {
                let name = roster_player_name(tx, id)?.ok_or_else(|| {
                    TournamentError::UnknownPlayer(format!("roster player {id}"))
                })?;
                participants.push((id, name));
            }

            let now = Utc::now();
            tx.execute(
                r#"
                INSERT INTO tournaments (name, month, year, type, format, start_date, end_date, created_at, archived_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                "#,
                params![
                    meta.name,
                    meta.month,
                    meta.year,
                    TournamentType::Online,
                    request.format,
                    meta.start_date,
                    meta.end_date,
                    now
                ],
            )?;
            let tournament_id = tx.last_insert_rowid();

            let mut insert_player = tx.prepare(
                r#"
                INSERT INTO online_tournament_players (tournament_id, player_id, player_name)
                VALUES (?1, ?2, ?3)
                "#,
            )?;
            for (id, name) in &participants {
                insert_player.execute(params![tournament_id, id, name])?;
            }

            let mut insert_match = tx.prepare(
                r#"
                INSERT INTO online_tournament_matches (
                  tournament_id, player1_id, player2_id, player1_name, player2_name,
                  completed, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
                "#,
            )?;
            let pairs = round_robin_pairs(&participants)?;
            for ((p1, name1), (p2, name2)) in &pairs {
                insert_match.execute(params![tournament_id, p1, p2, name1, name2, now])?;
            }

            Ok(OnlineTournamentCreated {
                tournament_id,
                tournament_name: meta.name.clone(),
                format: request.format,
                players_added: participants.len(),
                matches_generated: pairs.len(),
            })
        })?;

        log::info!(
            "Created online tournament {} with {} players and {} matches",
            created.tournament_id,
            created.players_added,
            created.matches_generated
        );
        Ok(created)
    }

    pub fn get_online_tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read(|conn| select_online_tournament(conn, id))
    }

    /// All pairings: pending first, then by player names.
    pub fn get_online_matches(&self, id: TournamentId) -> Result<Vec<OnlineMatch>, TournamentError> {
        self.read(|conn| {
            select_online_matches(
                conn,
                id,
                "",
                "completed ASC, player1_name ASC, player2_name ASC, id ASC",
            )
        })
    }

    pub fn get_online_pending_matches(
        &self,
        id: TournamentId,
    ) -> Result<Vec<OnlineMatch>, TournamentError> {
        self.read(|conn| {
            select_online_matches(
                conn,
                id,
                "AND completed = 0",
                "player1_name ASC, player2_name ASC, id ASC",
            )
        })
    }

    /// Completed pairings, most recently updated first.
    pub fn get_online_completed_matches(
        &self,
        id: TournamentId,
    ) -> Result<Vec<OnlineMatch>, TournamentError> {
        self.read(|conn| {
            select_online_matches(
                conn,
                id,
                "AND completed = 1",
                "updated_at DESC, player1_name ASC, player2_name ASC, id ASC",
            )
        })
    }

    /// Record (or correct) the result of an online pairing.
    pub fn record_online_score(
        &self,
        match_id: MatchId,
        score: ScoreUpdate,
    ) -> Result<OnlineScoreRecorded, TournamentError> {
        games_played(score)?;
        let recorded = self.write(|tx| {
            let changed = tx.execute(
                r#"
                UPDATE online_tournament_matches
                SET score1 = ?1, score2 = ?2, completed = 1, updated_at = ?3
                WHERE id = ?4
                "#,
                params![score.score1, score.score2, Utc::now(), match_id],
            )?;
            if changed == 0 {
                return Err(TournamentError::not_found(format!("online match {match_id}")));
            }
            let (name1, name2): (String, String) = tx.query_row(
                "SELECT player1_name, player2_name FROM online_tournament_matches WHERE id = ?1",
                params![match_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            Ok(OnlineScoreRecorded {
                match_id,
                score: format!("{name1} {}-{} {name2}", score.score1, score.score2),
            })
        })?;
        log::info!("Recorded online result {} (match {})", recorded.score, match_id);
        Ok(recorded)
    }

    /// Standings computed from the pairings: points, then wins, then player id.
    pub fn get_online_standings(
        &self,
        id: TournamentId,
    ) -> Result<Vec<OnlineStanding>, TournamentError> {
        self.read(|conn| {
            select_online_tournament(conn, id)?;
            let participants: Vec<(PlayerId, String)> = {
                let mut stmt = conn.prepare(
                    "SELECT player_id, player_name FROM online_tournament_players WHERE tournament_id = ?1 ORDER BY id",
                )?;
                let rows = stmt.query_map(params![id], |row| Ok((row.get(0)?, row.get(1)?)))?;
                rows.collect::<Result<_, _>>()?
            };
            let matches: Vec<MatchResult> = {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT player1_id, player2_id, score1, score2, completed
                    FROM online_tournament_matches
                    WHERE tournament_id = ?1
                    "#,
                )?;
                let rows = stmt.query_map(params![id], |row| {
                    Ok(MatchResult {
                        player1_id: row.get(0)?,
                        player2_id: row.get(1)?,
                        score1: row.get(2)?,
                        score2: row.get(3)?,
                        completed: row.get(4)?,
                    })
                })?;
                rows.collect::<Result<_, _>>()?
            };

            let mut standings = compute_standings(&participants, &matches);
            standings.sort_by(compare_by_points_then_wins);
            Ok(standings
                .into_iter()
                .map(|s| OnlineStanding {
                    tournament_id: id,
                    player_id: s.id,
                    player_name: s.name,
                    matches_played: s.matches_played,
                    wins: s.wins,
                    ties: s.ties,
                    losses: s.losses,
                    points: s.points,
                })
                .collect())
        })
    }

    /// Delete an online tournament: its pairings, its participants, then the tournament row.
    ///
    /// Fails with `NotFound` (and deletes nothing) unless `id` is a tournament tagged ONLINE.
    pub fn delete_online_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        self.write(|tx| {
            delete_online_rows(tx, id)?;
            let deleted = tx.execute(
                "DELETE FROM tournaments WHERE id = ?1 AND type = 'ONLINE'",
                params![id],
            )?;
            if deleted == 0 {
                return Err(TournamentError::not_found(format!("online tournament {id}")));
            }
            Ok(())
        })?;
        log::info!("Deleted online tournament {id}");
        Ok(())
    }
}
