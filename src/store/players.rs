//! Player directory: the live roster and the master roster online tournaments draw from.

use super::{required, standings::refresh_standings, Store};
use crate::models::{NewPlayer, Player, PlayerId, TournamentError};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

/// Which player table an operation targets.
#[derive(Clone, Copy, Debug)]
enum Roster {
    Live,
    Master,
}

impl Roster {
    fn table(self) -> &'static str {
        match self {
            Roster::Live => "players",
            Roster::Master => "roster_players",
        }
    }
}

fn parse_player_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        confirmed: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn select_players(
    conn: &Connection,
    roster: Roster,
    confirmed_only: bool,
) -> Result<Vec<Player>, TournamentError> {
    let filter = if confirmed_only { "WHERE confirmed = 1" } else { "" };
    let sql = format!(
        "SELECT id, name, confirmed, created_at, updated_at FROM {} {filter} ORDER BY name, id",
        roster.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], parse_player_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn select_player(
    conn: &Connection,
    roster: Roster,
    id: PlayerId,
) -> Result<Option<Player>, TournamentError> {
    let sql = format!(
        "SELECT id, name, confirmed, created_at, updated_at FROM {} WHERE id = ?1",
        roster.table()
    );
    Ok(conn.query_row(&sql, params![id], parse_player_row).optional()?)
}

/// Insert one player, rejecting blank and duplicate names. Returns the new row id.
fn insert_player(
    conn: &Connection,
    roster: Roster,
    player: &NewPlayer,
) -> Result<PlayerId, TournamentError> {
    let name = required(&player.name, "player name")?;
    let taken = conn
        .query_row(
            &format!("SELECT 1 FROM {} WHERE name = ?1", roster.table()),
            params![name],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if taken {
        return Err(TournamentError::validation(format!(
            "a player named {name:?} already exists"
        )));
    }
    let now = Utc::now();
    conn.execute(
        &format!(
            "INSERT INTO {} (name, confirmed, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            roster.table()
        ),
        params![name, player.confirmed, now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn insert_live_player(
    conn: &Connection,
    player: &NewPlayer,
) -> Result<PlayerId, TournamentError> {
    insert_player(conn, Roster::Live, player)
}

/// Display name of a master-roster player.
pub(super) fn roster_player_name(
    conn: &Connection,
    id: PlayerId,
) -> Result<Option<String>, TournamentError> {
    Ok(conn
        .query_row(
            "SELECT name FROM roster_players WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?)
}

impl Store {
    /// Live roster, ordered by name.
    pub fn list_players(&self) -> Result<Vec<Player>, TournamentError> {
        self.read(|conn| select_players(conn, Roster::Live, false))
    }

    pub fn list_confirmed_players(&self) -> Result<Vec<Player>, TournamentError> {
        self.read(|conn| select_players(conn, Roster::Live, true))
    }

    /// Add a player to the live roster. They get an (empty) standings row immediately.
    pub fn create_player(&self, player: &NewPlayer) -> Result<Player, TournamentError> {
        let created = self.write(|tx| {
            let id = insert_live_player(tx, player)?;
            refresh_standings(tx)?;
            select_player(tx, Roster::Live, id)?
                .ok_or_else(|| TournamentError::not_found(format!("player {id}")))
        })?;
        log::info!("Created player {} ({})", created.name, created.id);
        Ok(created)
    }

    /// Flip a live player's confirmation flag.
    pub fn toggle_player_confirmed(&self, id: PlayerId) -> Result<Player, TournamentError> {
        self.write(|tx| {
            let changed = tx.execute(
                "UPDATE players SET confirmed = NOT confirmed, updated_at = ?1 WHERE id = ?2",
                params![Utc::now(), id],
            )?;
            if changed == 0 {
                return Err(TournamentError::not_found(format!("player {id}")));
            }
            select_player(tx, Roster::Live, id)?
                .ok_or_else(|| TournamentError::not_found(format!("player {id}")))
        })
    }

    /// Master roster, ordered by name.
    pub fn list_roster_players(&self) -> Result<Vec<Player>, TournamentError> {
        self.read(|conn| select_players(conn, Roster::Master, false))
    }

    pub fn create_roster_player(&self, player: &NewPlayer) -> Result<Player, TournamentError> {
        let created = self.write(|tx| {
            let id = insert_player(tx, Roster::Master, player)?;
            select_player(tx, Roster::Master, id)?
                .ok_or_else(|| TournamentError::not_found(format!("roster player {id}")))
        })?;
        log::info!("Added {} ({}) to the master roster", created.name, created.id);
        Ok(created)
    }
}
