//! Archive manager: freezes the live tournament into write-once tables, and reads and
//! deletes the result.

use super::fixture::select_rounds;
use super::online::delete_online_rows;
use super::standings::{refresh_standings, select_standings};
use super::{ensure_tournament, month_number, Metadata, Store, UNKNOWN_PLAYER_NAME};
use crate::logic::assign_final_positions;
use crate::models::{
    ArchiveCreated, ArchiveRequest, ArchivedMatch, ArchivedPlayer, ArchivedRound, ArchivedRounds,
    ArchivedStanding, PlayerId, PlayerRace, PlayerRaceUpdate, RoundFormat, Tournament,
    TournamentError, TournamentId, TournamentType,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub(super) fn parse_tournament_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        month: row.get(2)?,
        year: row.get(3)?,
        tournament_type: row.get(4)?,
        format: row.get(5)?,
        start_date: row.get(6)?,
        end_date: row.get(7)?,
        created_at: row.get(8)?,
        archived_at: row.get(9)?,
    })
}

pub(super) const TOURNAMENT_COLUMNS: &str =
    "id, name, month, year, type, format, start_date, end_date, created_at, archived_at";

fn parse_race_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlayerRace> {
    Ok(PlayerRace {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player_id: row.get(2)?,
        player_name: row.get(3)?,
        race_pb: row.get(4)?,
        race_bf: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn select_race(
    conn: &Connection,
    tournament_id: TournamentId,
    player_id: PlayerId,
) -> Result<Option<PlayerRace>, TournamentError> {
    Ok(conn
        .query_row(
            r#"
            SELECT id, tournament_id, player_id, player_name, race_pb, race_bf, notes,
                   created_at, updated_at
            FROM tournament_player_races
            WHERE tournament_id = ?1 AND player_id = ?2
            "#,
            params![tournament_id, player_id],
            parse_race_row,
        )
        .optional()?)
}

/// Newest first: year descending, then calendar month descending. Unknown month names sort last
/// within their year.
pub(super) fn sort_by_period(tournaments: &mut [Tournament]) {
    tournaments.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| month_number(&b.month).cmp(&month_number(&a.month)))
            .then_with(|| b.id.cmp(&a.id))
    });
}

impl Store {
    /// Freeze the live tournament into a new archived tournament.
    ///
    /// One transaction: insert the tournament row, copy the standings with their final
    /// positions, then copy every round (by number) and its matches with player names
    /// resolved. Any failure discards the whole archive.
    pub fn archive_tournament(
        &self,
        request: &ArchiveRequest,
    ) -> Result<ArchiveCreated, TournamentError> {
        let meta = Metadata::validate(
            &request.name,
            &request.month,
            request.year,
            request.start_date,
            request.end_date,
        )?;

        let (tournament_id, standings, rounds) = self.write(|tx| {
            let now = Utc::now();
            tx.execute(
                r#"
                INSERT INTO tournaments (name, month, year, type, format, start_date, end_date, created_at, archived_at)
                VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7, ?7)
                "#,
                params![
                    meta.name,
                    meta.month,
                    meta.year,
                    TournamentType::InPerson,
                    meta.start_date,
                    meta.end_date,
                    now
                ],
            )?;
            let tournament_id = tx.last_insert_rowid();

            refresh_standings(tx)?;
            let ranked = assign_final_positions(select_standings(tx)?);
            let mut insert_standing = tx.prepare(
                r#"
                INSERT INTO tournament_standings (
                  tournament_id, player_id, player_name, matches_played, wins, ties, losses,
                  points, total_points_scored, total_matches, final_position
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for (position, s) in &ranked {
                insert_standing.execute(params![
                    tournament_id,
                    s.id,
                    s.name,
                    s.matches_played,
                    s.wins,
                    s.ties,
                    s.losses,
                    s.points,
                    s.total_points_scored,
                    s.total_matches,
                    position
                ])?;
            }

            let rounds = select_rounds(tx)?;
            let mut insert_round = tx.prepare(
                r#"
                INSERT INTO tournament_rounds (tournament_id, round_number, format, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            let mut copy_matches = tx.prepare(
                r#"
                INSERT INTO tournament_matches (
                  tournament_round_id, player1_id, player2_id, player1_name, player2_name,
                  score1, score2, completed, created_at
                )
                SELECT ?1, m.player1_id, m.player2_id,
                       COALESCE(p1.name, ?3), COALESCE(p2.name, ?3),
                       m.score1, m.score2, m.completed, ?4
                FROM matches m
                LEFT JOIN players p1 ON p1.id = m.player1_id
                LEFT JOIN players p2 ON p2.id = m.player2_id
                WHERE m.round_id = ?2
                ORDER BY m.id
                "#,
            )?;
            for round in &rounds {
                insert_round.execute(params![tournament_id, round.round_number, round.format, now])?;
                let archived_round_id = tx.last_insert_rowid();
                copy_matches.execute(params![archived_round_id, round.id, UNKNOWN_PLAYER_NAME, now])?;
            }

            Ok((tournament_id, ranked.len(), rounds.len()))
        })?;

        log::info!(
            "Archived tournament {tournament_id} ({standings} standings, {rounds} rounds)"
        );
        Ok(ArchiveCreated { tournament_id })
    }

    /// Archived (in-person) tournaments, most recent period first.
    pub fn list_archived_tournaments(&self) -> Result<Vec<Tournament>, TournamentError> {
        let mut tournaments = self.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE type = 'IN_PERSON'"
            ))?;
            let rows = stmt.query_map([], parse_tournament_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })?;
        sort_by_period(&mut tournaments);
        Ok(tournaments)
    }

    /// Every tournament of either type, newest first.
    pub fn list_tournaments(&self) -> Result<Vec<Tournament>, TournamentError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TOURNAMENT_COLUMNS} FROM tournaments ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], parse_tournament_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn get_tournament(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        self.read(|conn| {
            conn.query_row(
                &format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1"),
                params![id],
                parse_tournament_row,
            )
            .optional()?
            .ok_or_else(|| TournamentError::not_found(format!("tournament {id}")))
        })
    }

    /// Archived standings by final position, with each player's race annotations.
    pub fn get_archived_standings(
        &self,
        id: TournamentId,
    ) -> Result<Vec<ArchivedStanding>, TournamentError> {
        self.read(|conn| {
            ensure_tournament(conn, id)?;
            let mut stmt = conn.prepare(
                r#"
                SELECT ts.id, ts.tournament_id, ts.player_id, ts.player_name, ts.matches_played,
                       ts.wins, ts.ties, ts.losses, ts.points, ts.total_points_scored,
                       ts.total_matches, ts.final_position, tpr.race_pb, tpr.race_bf
                FROM tournament_standings ts
                LEFT JOIN tournament_player_races tpr
                  ON tpr.tournament_id = ts.tournament_id AND tpr.player_id = ts.player_id
                WHERE ts.tournament_id = ?1
                ORDER BY ts.final_position ASC
                "#,
            )?;
            let rows = stmt.query_map(params![id], |row| {
                Ok(ArchivedStanding {
                    id: row.get(0)?,
                    tournament_id: row.get(1)?,
                    player_id: row.get(2)?,
                    player_name: row.get(3)?,
                    matches_played: row.get(4)?,
                    wins: row.get(5)?,
                    ties: row.get(6)?,
                    losses: row.get(7)?,
                    points: row.get(8)?,
                    total_points_scored: row.get(9)?,
                    total_matches: row.get(10)?,
                    final_position: row.get(11)?,
                    race_pb: row.get(12)?,
                    race_bf: row.get(13)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Archived rounds (by number) with their matches (by id).
    pub fn get_archived_rounds(&self, id: TournamentId) -> Result<ArchivedRounds, TournamentError> {
        self.read(|conn| {
            let tournament_name: String = conn
                .query_row(
                    "SELECT name FROM tournaments WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| TournamentError::not_found(format!("tournament {id}")))?;

            let mut round_stmt = conn.prepare(
                r#"
                SELECT id, round_number, format
                FROM tournament_rounds
                WHERE tournament_id = ?1
                ORDER BY round_number, id
                "#,
            )?;
            let round_rows = round_stmt.query_map(params![id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?))
            })?;
            let round_keys: Vec<(i64, u32, RoundFormat)> = round_rows.collect::<Result<_, _>>()?;

            let mut match_stmt = conn.prepare(
                r#"
                SELECT id, player1_id, player2_id, player1_name, player2_name,
                       score1, score2, completed
                FROM tournament_matches
                WHERE tournament_round_id = ?1
                ORDER BY id
                "#,
            )?;
            let mut rounds = Vec::with_capacity(round_keys.len());
            for (round_id, number, format) in round_keys {
                let match_rows = match_stmt.query_map(params![round_id], |row| {
                    Ok(ArchivedMatch {
                        id: row.get(0)?,
                        player1_id: row.get(1)?,
                        player2_id: row.get(2)?,
                        player1_name: row.get(3)?,
                        player2_name: row.get(4)?,
                        score1: row.get(5)?,
                        score2: row.get(6)?,
                        completed: row.get(7)?,
                    })
                })?;
                let matches = match_rows.collect::<Result<Vec<_>, _>>()?;
                rounds.push(ArchivedRound {
                    number,
                    format,
                    matches,
                });
            }

            Ok(ArchivedRounds {
                tournament_name,
                rounds,
            })
        })
    }

    /// Participants of an archived tournament with their totals, by name.
    pub fn list_archived_players(
        &self,
        id: TournamentId,
    ) -> Result<Vec<ArchivedPlayer>, TournamentError> {
        self.read(|conn| {
            ensure_tournament(conn, id)?;
            let mut stmt = conn.prepare(
                r#"
                SELECT player_id, player_name, total_matches, wins, ties, total_points_scored
                FROM tournament_standings
                WHERE tournament_id = ?1
                ORDER BY player_name, player_id
                "#,
            )?;
            let rows = stmt.query_map(params![id], |row| {
                Ok(ArchivedPlayer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    total_matches: row.get(2)?,
                    total_wins: row.get(3)?,
                    total_ties: row.get(4)?,
                    total_points_scored: row.get(5)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn list_player_races(&self, id: TournamentId) -> Result<Vec<PlayerRace>, TournamentError> {
        self.read(|conn| {
            ensure_tournament(conn, id)?;
            let mut stmt = conn.prepare(
                r#"
                SELECT id, tournament_id, player_id, player_name, race_pb, race_bf, notes,
                       created_at, updated_at
                FROM tournament_player_races
                WHERE tournament_id = ?1
                ORDER BY player_name, player_id
                "#,
            )?;
            let rows = stmt.query_map(params![id], parse_race_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Set a player's race annotations on an archived tournament (insert or overwrite).
    pub fn update_player_race(
        &self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        update: &PlayerRaceUpdate,
    ) -> Result<PlayerRace, TournamentError> {
        let race = self.write(|tx| {
            ensure_tournament(tx, tournament_id)?;
            let player_name: String = tx
                .query_row(
                    "SELECT player_name FROM tournament_standings WHERE tournament_id = ?1 AND player_id = ?2",
                    params![tournament_id, player_id],
                    |row| row.get(0),
                )
                .optional()?
                .unwrap_or_else(|| UNKNOWN_PLAYER_NAME.to_string());

            let now = Utc::now();
            tx.execute(
                r#"
                INSERT INTO tournament_player_races (
                  tournament_id, player_id, player_name, race_pb, race_bf, notes, created_at, updated_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                ON CONFLICT (tournament_id, player_id)
                DO UPDATE SET race_pb = excluded.race_pb,
                              race_bf = excluded.race_bf,
                              notes = excluded.notes,
                              updated_at = excluded.updated_at
                "#,
                params![
                    tournament_id,
                    player_id,
                    player_name,
                    update.race_pb,
                    update.race_bf,
                    update.notes,
                    now
                ],
            )?;
            select_race(tx, tournament_id, player_id)?.ok_or_else(|| {
                TournamentError::not_found(format!(
                    "race of player {player_id} in tournament {tournament_id}"
                ))
            })
        })?;
        log::info!(
            "Updated races of {} in tournament {}",
            race.player_name,
            tournament_id
        );
        Ok(race)
    }

    /// Delete a tournament and everything archived under it.
    ///
    /// Rounds, matches, standings and race annotations go with it through cascading
    /// foreign keys. Online rows have no such keys and are removed explicitly.
    pub fn delete_tournament(&self, id: TournamentId) -> Result<(), TournamentError> {
        let kind = self.write(|tx| {
            let kind = ensure_tournament(tx, id)?;
            if kind == TournamentType::Online {
                delete_online_rows(tx, id)?;
            }
            tx.execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
            Ok(kind)
        })?;
        log::info!("Deleted tournament {id} ({})", kind.as_str());
        Ok(())
    }
}
