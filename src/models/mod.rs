//! Data structures: players, fixture, standings, tournaments and archives.

mod error;
mod fixture;
mod online;
mod player;
mod standing;
mod tournament;

pub use error::TournamentError;
pub use fixture::{
    Fixture, FixturePlan, FixtureRound, FixtureSummary, Match, MatchDetail, MatchId, Matchup,
    PlayerMatchStat, Round, RoundFormat, RoundId, RoundPlan, ScoreUpdate,
};
pub use online::{
    OnlineMatch, OnlineScoreRecorded, OnlineStanding, OnlineTournamentCreated,
    OnlineTournamentRequest,
};
pub use player::{NewPlayer, Player, PlayerId};
pub use standing::Standing;
pub use tournament::{
    ArchiveCreated, ArchiveRequest, ArchivedMatch, ArchivedPlayer, ArchivedRound, ArchivedRounds,
    ArchivedStanding, FormatRecord, PlayerRace, PlayerRaceUpdate, PlayerTournamentHistory,
    Tournament, TournamentId, TournamentType,
};
