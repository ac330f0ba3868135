//! A player's record across archived tournaments.

use super::{month_number, required, Store};
use crate::models::{
    FormatRecord, PlayerId, PlayerTournamentHistory, RoundFormat, TournamentError, TournamentId,
};
use rusqlite::{params, Connection};
use std::cmp::Ordering;

/// Per-format wins, ties and completed matches of `player_id` in one archived tournament.
fn format_records(
    conn: &Connection,
    tournament_id: TournamentId,
    player_id: PlayerId,
) -> Result<(FormatRecord, FormatRecord), TournamentError> {
    let mut stmt = conn.prepare(
        r#"
        SELECT tr.format, tm.player1_id, tm.score1, tm.score2
        FROM tournament_matches tm
        JOIN tournament_rounds tr ON tr.id = tm.tournament_round_id
        WHERE tr.tournament_id = ?1
          AND tm.completed = 1
          AND (tm.player1_id = ?2 OR tm.player2_id = ?2)
        "#,
    )?;
    let rows = stmt.query_map(params![tournament_id, player_id], |row| {
        Ok((
            row.get::<_, RoundFormat>(0)?,
            row.get::<_, PlayerId>(1)?,
            row.get::<_, Option<u32>>(2)?,
            row.get::<_, Option<u32>>(3)?,
        ))
    })?;

    let mut pb = FormatRecord::default();
    let mut bf = FormatRecord::default();
    for row in rows {
        let (format, player1_id, score1, score2) = row?;
        let (Some(s1), Some(s2)) = (score1, score2) else {
            continue;
        };
        let (own, other) = if player1_id == player_id { (s1, s2) } else { (s2, s1) };
        let record = match format {
            RoundFormat::Pb => &mut pb,
            RoundFormat::Bf => &mut bf,
        };
        record.matches += 1;
        match own.cmp(&other) {
            Ordering::Greater => record.wins += 1,
            Ordering::Equal => record.ties += 1,
            Ordering::Less => {}
        }
    }
    Ok((pb, bf))
}

impl Store {
    /// Every archived tournament `name` took part in, most recent period first.
    ///
    /// Matched by the archived display name, since archived player ids may no longer
    /// exist on the live roster.
    pub fn player_history(
        &self,
        name: &str,
    ) -> Result<Vec<PlayerTournamentHistory>, TournamentError> {
        let name = required(name, "player name")?;
        let mut history = self.read(|conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT t.id, t.name, t.month, t.year, ts.player_id, ts.final_position,
                       ts.matches_played, ts.wins, ts.ties, ts.losses, ts.points,
                       ts.total_points_scored, tpr.race_pb, tpr.race_bf
                FROM tournaments t
                JOIN tournament_standings ts ON ts.tournament_id = t.id AND ts.player_name = ?1
                LEFT JOIN tournament_player_races tpr
                  ON tpr.tournament_id = t.id AND tpr.player_id = ts.player_id
                ORDER BY t.id
                "#,
            )?;
            let rows = stmt.query_map(params![name], |row| {
                let player_id: PlayerId = row.get(4)?;
                Ok((
                    player_id,
                    PlayerTournamentHistory {
                        tournament_id: row.get(0)?,
                        tournament_name: row.get(1)?,
                        month: row.get(2)?,
                        year: row.get(3)?,
                        final_position: row.get(5)?,
                        matches_played: row.get(6)?,
                        wins: row.get(7)?,
                        ties: row.get(8)?,
                        losses: row.get(9)?,
                        points: row.get(10)?,
                        total_points_scored: row.get(11)?,
                        race_pb: row.get(12)?,
                        race_bf: row.get(13)?,
                        pb: FormatRecord::default(),
                        bf: FormatRecord::default(),
                    },
                ))
            })?;
            let entries = rows.collect::<Result<Vec<_>, _>>()?;

            let mut history = Vec::with_capacity(entries.len());
            for (player_id, mut entry) in entries {
                let (pb, bf) = format_records(conn, entry.tournament_id, player_id)?;
                entry.pb = pb;
                entry.bf = bf;
                history.push(entry);
            }
            Ok(history)
        })?;

        history.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| month_number(&b.month).cmp(&month_number(&a.month)))
                .then_with(|| b.tournament_id.cmp(&a.tournament_id))
        });
        Ok(history)
    }
}
