//! Live standings table, kept in step with the match rows it is derived from.

use super::Store;
use crate::logic::{compute_standings, MatchResult};
use crate::models::{PlayerId, Standing, TournamentError};
use rusqlite::{params, Connection};

fn parse_standing_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Standing> {
    Ok(Standing {
        id: row.get(0)?,
        name: row.get(1)?,
        matches_played: row.get(2)?,
        wins: row.get(3)?,
        ties: row.get(4)?,
        losses: row.get(5)?,
        points: row.get(6)?,
        total_points_scored: row.get(7)?,
        total_matches: row.get(8)?,
    })
}

/// Recompute the `standings` table from the live players and matches.
///
/// Must be called inside the transaction of every write that touches players or matches,
/// so the projection never disagrees with the committed match rows.
pub(super) fn refresh_standings(conn: &Connection) -> Result<(), TournamentError> {
    let players: Vec<(PlayerId, String)> = {
        let mut stmt = conn.prepare("SELECT id, name FROM players ORDER BY id")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<_, _>>()?
    };
    let matches: Vec<MatchResult> = {
        let mut stmt = conn
            .prepare("SELECT player1_id, player2_id, score1, score2, completed FROM matches")?;
        let rows = stmt.query_map([], |row| {
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

    conn.execute("DELETE FROM standings", [])?;
    let mut insert = conn.prepare(
        r#"
        INSERT INTO standings (
          player_id, name, matches_played, wins, ties, losses,
          points, total_points_scored, total_matches
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )?;
    for s in compute_standings(&players, &matches) {
        insert.execute(params![
            s.id,
            s.name,
            s.matches_played,
            s.wins,
            s.ties,
            s.losses,
            s.points,
            s.total_points_scored,
            s.total_matches
        ])?;
    }
    Ok(())
}

/// Current standings in ranking order: points, then points scored, then player id.
pub(super) fn select_standings(conn: &Connection) -> Result<Vec<Standing>, TournamentError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT player_id, name, matches_played, wins, ties, losses,
               points, total_points_scored, total_matches
        FROM standings
        ORDER BY points DESC, total_points_scored DESC, player_id ASC
        "#,
    )?;
    let rows = stmt.query_map([], parse_standing_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

impl Store {
    /// Live standings, best first.
    pub fn get_standings(&self) -> Result<Vec<Standing>, TournamentError> {
        self.read(select_standings)
    }
}
