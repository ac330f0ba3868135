//! Tournament fixtures web app: library with models, pure logic, the SQLite store and the HTTP API.

pub mod api;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use logic::{assign_final_positions, compute_standings, round_robin_len, round_robin_pairs};
pub use models::{
    ArchiveCreated, ArchiveRequest, ArchivedMatch, ArchivedPlayer, ArchivedRound, ArchivedRounds,
    ArchivedStanding, Fixture, FixturePlan, FixtureRound, FixtureSummary, FormatRecord, Match,
    MatchDetail, MatchId, Matchup, NewPlayer, OnlineMatch, OnlineScoreRecorded, OnlineStanding,
    OnlineTournamentCreated, OnlineTournamentRequest, Player, PlayerId, PlayerMatchStat,
    PlayerRace, PlayerRaceUpdate, PlayerTournamentHistory, Round, RoundFormat, RoundId, RoundPlan,
    ScoreUpdate, Standing, Tournament, TournamentError, TournamentId, TournamentType,
};
pub use store::{Store, UNKNOWN_PLAYER_NAME};
