//! SQLite persistence: live fixture, standings projection, archives and online tournaments.
//!
//! Every operation that writes more than one row runs inside a single immediate
//! transaction that is committed before the call returns. Returning early with an error
//! drops the transaction, which rolls it back.

mod archive;
mod fixture;
mod history;
mod online;
mod players;
mod scores;
mod standings;

use crate::models::{RoundFormat, TournamentError, TournamentId, TournamentType};
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Shown in archives when a match refers to a player that no longer exists.
pub const UNKNOWN_PLAYER_NAME: &str = "Unknown";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  confirmed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS rounds (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  round_number INTEGER NOT NULL CHECK (round_number >= 1),
  format TEXT NOT NULL CHECK (format IN ('PB', 'BF')),
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS matches (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  round_id INTEGER NOT NULL REFERENCES rounds(id),
  player1_id INTEGER NOT NULL REFERENCES players(id),
  player2_id INTEGER NOT NULL REFERENCES players(id),
  score1 INTEGER CHECK (score1 >= 0),
  score2 INTEGER CHECK (score2 >= 0),
  completed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL,
  CHECK (player1_id <> player2_id)
);

CREATE TABLE IF NOT EXISTS player_match_stats (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
  match_id INTEGER NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
  games_played INTEGER NOT NULL,
  games_won INTEGER NOT NULL,
  updated_at TEXT NOT NULL,
  UNIQUE (player_id, match_id)
);

CREATE TABLE IF NOT EXISTS standings (
  player_id INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  matches_played INTEGER NOT NULL,
  wins INTEGER NOT NULL,
  ties INTEGER NOT NULL,
  losses INTEGER NOT NULL,
  points INTEGER NOT NULL,
  total_points_scored INTEGER NOT NULL,
  total_matches INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS roster_players (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL UNIQUE,
  confirmed INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tournaments (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT NOT NULL,
  month TEXT NOT NULL,
  year INTEGER NOT NULL,
  type TEXT NOT NULL DEFAULT 'IN_PERSON' CHECK (type IN ('IN_PERSON', 'ONLINE')),
  format TEXT CHECK (format IN ('PB', 'BF')),
  start_date TEXT,
  end_date TEXT,
  created_at TEXT NOT NULL,
  archived_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_standings (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
  player_id INTEGER NOT NULL,
  player_name TEXT NOT NULL,
  matches_played INTEGER NOT NULL,
  wins INTEGER NOT NULL,
  ties INTEGER NOT NULL,
  losses INTEGER NOT NULL,
  points INTEGER NOT NULL,
  total_points_scored INTEGER NOT NULL,
  total_matches INTEGER NOT NULL,
  final_position INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_rounds (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
  round_number INTEGER NOT NULL,
  format TEXT NOT NULL,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_matches (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_round_id INTEGER NOT NULL REFERENCES tournament_rounds(id) ON DELETE CASCADE,
  player1_id INTEGER NOT NULL,
  player2_id INTEGER NOT NULL,
  player1_name TEXT NOT NULL,
  player2_name TEXT NOT NULL,
  score1 INTEGER,
  score2 INTEGER,
  completed INTEGER NOT NULL,
  created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tournament_player_races (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_id INTEGER NOT NULL REFERENCES tournaments(id) ON DELETE CASCADE,
  player_id INTEGER NOT NULL,
  player_name TEXT NOT NULL,
  race_pb TEXT,
  race_bf TEXT,
  notes TEXT,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL,
  UNIQUE (tournament_id, player_id)
);

CREATE TABLE IF NOT EXISTS online_tournament_players (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_id INTEGER NOT NULL,
  player_id INTEGER NOT NULL,
  player_name TEXT NOT NULL,
  UNIQUE (tournament_id, player_id)
);

CREATE TABLE IF NOT EXISTS online_tournament_matches (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  tournament_id INTEGER NOT NULL,
  player1_id INTEGER NOT NULL,
  player2_id INTEGER NOT NULL,
  player1_name TEXT NOT NULL,
  player2_name TEXT NOT NULL,
  score1 INTEGER CHECK (score1 >= 0),
  score2 INTEGER CHECK (score2 >= 0),
  completed INTEGER NOT NULL DEFAULT 0,
  match_date TEXT,
  created_at TEXT NOT NULL,
  updated_at TEXT NOT NULL,
  CHECK (player1_id <> player2_id)
);

CREATE INDEX IF NOT EXISTS idx_matches_round ON matches(round_id);
CREATE INDEX IF NOT EXISTS idx_tournament_standings_tournament ON tournament_standings(tournament_id);
CREATE INDEX IF NOT EXISTS idx_tournament_rounds_tournament ON tournament_rounds(tournament_id);
CREATE INDEX IF NOT EXISTS idx_tournament_matches_round ON tournament_matches(tournament_round_id);
CREATE INDEX IF NOT EXISTS idx_online_matches_tournament ON online_tournament_matches(tournament_id);
"#;

/// Handle on the tournament database.
///
/// There is exactly one live tournament: the `players`, `rounds` and `matches` tables hold
/// it, and the fixture and score operations act on it. Archived and online tournaments
/// are separate rows keyed by tournament id.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database file at `path` and install the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TournamentError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    /// A private in-memory database; used by tests.
    pub fn open_in_memory() -> Result<Self, TournamentError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, TournamentError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave a transaction open: dropping it rolls back.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` inside one immediate transaction; commit only if it returns `Ok`.
    fn write<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    fn read<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let conn = self.lock();
        f(&conn)
    }
}

impl ToSql for RoundFormat {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RoundFormat {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        RoundFormat::try_from(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TournamentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TournamentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "IN_PERSON" => Ok(TournamentType::InPerson),
            "ONLINE" => Ok(TournamentType::Online),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Trimmed, non-empty value of a required text field.
fn required(value: &str, field: &str) -> Result<String, TournamentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TournamentError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Validated tournament metadata shared by the archive and online-creation paths.
struct Metadata {
    name: String,
    month: String,
    year: i32,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl Metadata {
    fn validate(
        name: &str,
        month: &str,
        year: i32,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, TournamentError> {
        let name = required(name, "name")?;
        let month = required(month, "month")?;
        if year < 1 {
            return Err(TournamentError::validation(format!(
                "year must be positive (got {year})"
            )));
        }
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(TournamentError::validation(format!(
                    "end_date {end} is before start_date {start}"
                )));
            }
        }
        Ok(Self {
            name,
            month,
            year,
            start_date,
            end_date,
        })
    }
}

/// Type of the tournament row `id`, if it exists.
fn tournament_type(
    conn: &Connection,
    id: TournamentId,
) -> Result<Option<TournamentType>, TournamentError> {
    Ok(conn
        .query_row(
            "SELECT type FROM tournaments WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?)
}

/// Fail with `NotFound` unless tournament `id` exists.
fn ensure_tournament(conn: &Connection, id: TournamentId) -> Result<TournamentType, TournamentError> {
    tournament_type(conn, id)?.ok_or_else(|| TournamentError::not_found(format!("tournament {id}")))
}

/// Calendar position of a month name (Spanish or English, any case); `None` if unrecognised.
pub fn month_number(month: &str) -> Option<u32> {
    let n = match month.trim().to_lowercase().as_str() {
        "enero" | "january" => 1,
        "febrero" | "february" => 2,
        "marzo" | "march" => 3,
        "abril" | "april" => 4,
        "mayo" | "may" => 5,
        "junio" | "june" => 6,
        "julio" | "july" => 7,
        "agosto" | "august" => 8,
        "septiembre" | "setiembre" | "september" => 9,
        "octubre" | "october" => 10,
        "noviembre" | "november" => 11,
        "diciembre" | "december" => 12,
        _ => return None,
    };
    Some(n)
}
