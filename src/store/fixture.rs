//! Fixture builder: atomic replacement of the live players, rounds and matches.

use super::players::insert_live_player;
use super::standings::refresh_standings;
use super::{required, Store};
use crate::models::{
    Fixture, FixturePlan, FixtureRound, FixtureSummary, Match, MatchDetail, PlayerId,
    PlayerMatchStat, Round, RoundId, TournamentError,
};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::{HashMap, HashSet};

/// Reject payloads that could never produce a valid fixture, before touching the database.
fn validate_plan(plan: &FixturePlan) -> Result<(), TournamentError> {
    if plan.players.is_empty() {
        return Err(TournamentError::validation("players are required"));
    }
    let mut names = HashSet::new();
    for p in &plan.players {
        let name = required(&p.name, "player name")?;
        if !names.insert(name.clone()) {
            return Err(TournamentError::validation(format!(
                "player {name:?} is listed more than once"
            )));
        }
    }

    let mut numbers = HashSet::new();
    for round in &plan.rounds {
        if round.round_number < 1 {
            return Err(TournamentError::validation("round_number must be at least 1"));
        }
        if !numbers.insert(round.round_number) {
            return Err(TournamentError::validation(format!(
                "round {} is listed more than once",
                round.round_number
            )));
        }
        for m in &round.matches {
            let p1 = required(&m.player1_name, "player1_name")?;
            let p2 = required(&m.player2_name, "player2_name")?;
            if p1 == p2 {
                return Err(TournamentError::validation(format!(
                    "round {}: {p1:?} cannot play against themselves",
                    round.round_number
                )));
            }
        }
    }
    Ok(())
}

fn resolve(players: &HashMap<String, PlayerId>, name: &str) -> Result<PlayerId, TournamentError> {
    players
        .get(name.trim())
        .copied()
        .ok_or_else(|| TournamentError::UnknownPlayer(name.trim().to_string()))
}

/// Delete the live structure in dependency order: stats, matches, rounds, then players.
fn clear_structure(conn: &Connection, clear_players: bool) -> Result<(), TournamentError> {
    conn.execute("DELETE FROM player_match_stats", [])?;
    conn.execute("DELETE FROM matches", [])?;
    conn.execute("DELETE FROM rounds", [])?;
    if clear_players {
        conn.execute("DELETE FROM players", [])?;
    }
    Ok(())
}

fn parse_round_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        round_number: row.get(1)?,
        format: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn parse_match_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        round_id: row.get(1)?,
        player1_id: row.get(2)?,
        player2_id: row.get(3)?,
        score1: row.get(4)?,
        score2: row.get(5)?,
        completed: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl Store {
    /// Replace the whole live fixture with `plan`.
    ///
    /// Existing matches, rounds and players are deleted, then players, rounds and matches
    /// are inserted from the payload, resolving each matchup by player name. An unknown
    /// name fails with [`TournamentError::UnknownPlayer`] and the previous fixture is left
    /// exactly as it was.
    pub fn build_fixture(&self, plan: &FixturePlan) -> Result<FixtureSummary, TournamentError> {
        validate_plan(plan)?;

        let summary = self.write(|tx| {
            clear_structure(tx, true)?;

            let mut by_name: HashMap<String, PlayerId> = HashMap::new();
            for p in &plan.players {
                let id = insert_live_player(tx, p)?;
                by_name.insert(p.name.trim().to_string(), id);
            }

            let now = Utc::now();
            let mut matches_created = 0;
            let mut insert_round = tx.prepare(
                "INSERT INTO rounds (round_number, format, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            )?;
            let mut insert_match = tx.prepare(
                r#"
                INSERT INTO matches (round_id, player1_id, player2_id, completed, created_at, updated_at)
                VALUES (?1, ?2, ?3, 0, ?4, ?4)
                "#,
            )?;
            for round in &plan.rounds {
                insert_round.execute(params![round.round_number, round.format, now])?;
                let round_id: RoundId = tx.last_insert_rowid();
                for m in &round.matches {
                    let player1_id = resolve(&by_name, &m.player1_name)?;
                    let player2_id = resolve(&by_name, &m.player2_name)?;
                    insert_match.execute(params![round_id, player1_id, player2_id, now])?;
                    matches_created += 1;
                }
            }

            refresh_standings(tx)?;
            Ok(FixtureSummary {
                players_created: plan.players.len(),
                rounds_created: plan.rounds.len(),
                matches_created,
            })
        })?;

        log::info!(
            "Fixture rebuilt: {} players, {} rounds, {} matches",
            summary.players_created,
            summary.rounds_created,
            summary.matches_created
        );
        Ok(summary)
    }

    /// Delete the live matches and rounds (and players, if asked) for the next cycle.
    pub fn clear_live(&self, clear_players: bool) -> Result<(), TournamentError> {
        self.write(|tx| {
            clear_structure(tx, clear_players)?;
            refresh_standings(tx)
        })?;
        log::info!(
            "Live tournament cleared ({})",
            if clear_players {
                "matches, rounds and players"
            } else {
                "matches and rounds"
            }
        );
        Ok(())
    }

    /// Live rounds with their matches, rounds in number order and matches in id order.
    pub fn get_fixture(&self) -> Result<Fixture, TournamentError> {
        self.read(|conn| {
            let rounds = select_rounds(conn)?;

            let mut stmt = conn.prepare(
                r#"
                SELECT m.round_id, m.id, r.round_number, r.format, p1.name, p2.name,
                       m.score1, m.score2, m.completed, m.updated_at
                FROM matches m
                JOIN rounds r ON r.id = m.round_id
                JOIN players p1 ON p1.id = m.player1_id
                JOIN players p2 ON p2.id = m.player2_id
                ORDER BY m.id
                "#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, RoundId>(0)?,
                    MatchDetail {
                        id: row.get(1)?,
                        round_number: row.get(2)?,
                        format: row.get(3)?,
                        player1_name: row.get(4)?,
                        player2_name: row.get(5)?,
                        score1: row.get(6)?,
                        score2: row.get(7)?,
                        completed: row.get(8)?,
                        updated_at: row.get(9)?,
                    },
                ))
            })?;
            let mut by_round: HashMap<RoundId, Vec<MatchDetail>> = HashMap::new();
            for row in rows {
                let (round_id, detail) = row?;
                by_round.entry(round_id).or_default().push(detail);
            }

            let rounds = rounds
                .into_iter()
                .map(|r| FixtureRound {
                    number: r.round_number,
                    format: r.format,
                    matches: by_round.remove(&r.id).unwrap_or_default(),
                })
                .collect();
            Ok(Fixture { rounds })
        })
    }

    /// Live rounds ordered by round number.
    pub fn list_rounds(&self) -> Result<Vec<Round>, TournamentError> {
        self.read(select_rounds)
    }

    /// Live matches ordered by id.
    pub fn list_matches(&self) -> Result<Vec<Match>, TournamentError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, round_id, player1_id, player2_id, score1, score2, completed,
                       created_at, updated_at
                FROM matches
                ORDER BY id
                "#,
            )?;
            let rows = stmt.query_map([], parse_match_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Derived per-player, per-match stats ordered by match then player.
    pub fn list_player_match_stats(&self) -> Result<Vec<PlayerMatchStat>, TournamentError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT player_id, match_id, games_played, games_won
                FROM player_match_stats
                ORDER BY match_id, player_id
                "#,
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(PlayerMatchStat {
                    player_id: row.get(0)?,
                    match_id: row.get(1)?,
                    games_played: row.get(2)?,
                    games_won: row.get(3)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}

pub(super) fn select_rounds(conn: &Connection) -> Result<Vec<Round>, TournamentError> {
    let mut stmt = conn.prepare(
        "SELECT id, round_number, format, created_at, updated_at FROM rounds ORDER BY round_number, id",
    )?;
    let rows = stmt.query_map([], parse_round_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
