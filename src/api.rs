//! REST API over the store. Mounted by the `web` binary; see [`configure`].

use crate::models::{
    ArchiveRequest, FixturePlan, MatchId, NewPlayer, OnlineTournamentRequest, PlayerId,
    PlayerRaceUpdate, ScoreUpdate, TournamentError, TournamentId,
};
use crate::store::Store;
use actix_web::{
    delete,
    error::{BlockingError, InternalError},
    get, patch, post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, HttpResponseBuilder, Responder,
};
use serde::{Deserialize, Serialize};

/// Shared application state: the one database handle.
pub type AppState = Data<Store>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and player id (e.g. /api/tournaments/{id}/races/{player_id})
#[derive(Deserialize)]
struct TournamentPlayerPath {
    id: TournamentId,
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

#[derive(Deserialize)]
struct ClearQuery {
    #[serde(default)]
    clear_players: bool,
}

#[derive(Deserialize)]
struct HistoryQuery {
    name: String,
}

/// Map an operation error to a JSON `{"error": ...}` response with a matching status.
fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::Validation(_)
        | TournamentError::InvalidInput(_)
        | TournamentError::UnknownPlayer(_) => {
            log::warn!("Rejected request: {e}");
            HttpResponse::BadRequest().json(body)
        }
        TournamentError::NotFound(_) => HttpResponse::NotFound().json(body),
        TournamentError::Transaction(_) => {
            log::error!("Store failure: {e}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Result of a store call run on the blocking pool.
type Outcome<T> = Result<Result<T, TournamentError>, BlockingError>;

/// Run `f` against the store on actix's blocking thread pool, off the async worker.
async fn on_store<T, F>(state: &AppState, f: F) -> Outcome<T>
where
    F: FnOnce(&Store) -> Result<T, TournamentError> + Send + 'static,
    T: Send + 'static,
{
    let store = state.clone();
    web::block(move || f(store.get_ref())).await
}

fn respond_with<T: Serialize>(
    outcome: Outcome<T>,
    ok: fn() -> HttpResponseBuilder,
) -> HttpResponse {
    match outcome {
        Ok(Ok(value)) => ok().json(value),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            log::error!("Store call did not complete: {e}");
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": e.to_string() }))
        }
    }
}

fn respond<T: Serialize>(outcome: Outcome<T>) -> HttpResponse {
    respond_with(outcome, HttpResponse::Ok)
}

fn respond_created<T: Serialize>(outcome: Outcome<T>) -> HttpResponse {
    respond_with(outcome, HttpResponse::Created)
}

fn respond_message(outcome: Outcome<()>, message: &str) -> HttpResponse {
    respond(outcome.map(|result| result.map(|()| serde_json::json!({ "message": message }))))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-fixtures",
    })
}

// Players

#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.list_players()).await)
}

#[get("/api/players/confirmed")]
async fn api_list_confirmed_players(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.list_confirmed_players()).await)
}

#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let player = body.into_inner();
    respond_created(on_store(&state, move |store| store.create_player(&player)).await)
}

#[patch("/api/players/{id}/confirm")]
async fn api_toggle_player_confirmed(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.toggle_player_confirmed(id)).await)
}

/// All archived tournaments a player (by display name) took part in.
#[get("/api/players/history")]
async fn api_player_history(state: AppState, query: Query<HistoryQuery>) -> HttpResponse {
    let name = query.into_inner().name;
    respond(on_store(&state, move |store| store.player_history(&name)).await)
}

#[get("/api/roster")]
async fn api_list_roster(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.list_roster_players()).await)
}

#[post("/api/roster")]
async fn api_create_roster_player(state: AppState, body: Json<NewPlayer>) -> HttpResponse {
    let player = body.into_inner();
    respond_created(on_store(&state, move |store| store.create_roster_player(&player)).await)
}

// Live fixture

#[get("/api/fixture")]
async fn api_get_fixture(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.get_fixture()).await)
}

/// Replace the entire live fixture (players, rounds, matches).
#[post("/api/fixture")]
async fn api_build_fixture(state: AppState, body: Json<FixturePlan>) -> HttpResponse {
    let plan = body.into_inner();
    respond_created(on_store(&state, move |store| store.build_fixture(&plan)).await)
}

/// Clear the live matches and rounds; `?clear_players=true` also removes players.
#[delete("/api/fixture")]
async fn api_clear_fixture(state: AppState, query: Query<ClearQuery>) -> HttpResponse {
    let clear_players = query.clear_players;
    let message = if clear_players {
        "Tournament cleared: matches, rounds, and players deleted"
    } else {
        "Tournament cleared: matches and rounds deleted"
    };
    respond_message(
        on_store(&state, move |store| store.clear_live(clear_players)).await,
        message,
    )
}

#[get("/api/standings")]
async fn api_get_standings(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.get_standings()).await)
}

#[patch("/api/matches/{match_id}/score")]
async fn api_record_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScoreUpdate>,
) -> HttpResponse {
    let (match_id, score) = (path.match_id, *body);
    respond(
        on_store(&state, move |store| {
            store
                .record_score(match_id, score)
                .map(|match_id| serde_json::json!({ "match_id": match_id }))
        })
        .await,
    )
}

// Tournaments and archives

#[post("/api/tournaments/archive")]
async fn api_archive_tournament(state: AppState, body: Json<ArchiveRequest>) -> HttpResponse {
    let request = body.into_inner();
    respond_created(on_store(&state, move |store| store.archive_tournament(&request)).await)
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.list_tournaments()).await)
}

#[get("/api/tournaments/archived")]
async fn api_list_archived_tournaments(state: AppState) -> HttpResponse {
    respond(on_store(&state, |store| store.list_archived_tournaments()).await)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_tournament(id)).await)
}

#[get("/api/tournaments/{id}/standings")]
async fn api_archived_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_archived_standings(id)).await)
}

#[get("/api/tournaments/{id}/rounds")]
async fn api_archived_rounds(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_archived_rounds(id)).await)
}

#[get("/api/tournaments/{id}/players")]
async fn api_archived_players(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.list_archived_players(id)).await)
}

#[get("/api/tournaments/{id}/races")]
async fn api_player_races(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.list_player_races(id)).await)
}

#[put("/api/tournaments/{id}/races/{player_id}")]
async fn api_update_player_race(
    state: AppState,
    path: Path<TournamentPlayerPath>,
    body: Json<PlayerRaceUpdate>,
) -> HttpResponse {
    let TournamentPlayerPath { id, player_id } = path.into_inner();
    let update = body.into_inner();
    respond(on_store(&state, move |store| store.update_player_race(id, player_id, &update)).await)
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond_message(
        on_store(&state, move |store| store.delete_tournament(id)).await,
        "Tournament deleted successfully",
    )
}

// Online tournaments

#[post("/api/online-tournaments")]
async fn api_create_online_tournament(
    state: AppState,
    body: Json<OnlineTournamentRequest>,
) -> HttpResponse {
    let request = body.into_inner();
    respond_created(on_store(&state, move |store| store.create_online_tournament(&request)).await)
}

#[get("/api/online-tournaments/{id}")]
async fn api_get_online_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_online_tournament(id)).await)
}

#[get("/api/online-tournaments/{id}/matches")]
async fn api_online_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_online_matches(id)).await)
}

#[get("/api/online-tournaments/{id}/matches/pending")]
async fn api_online_pending_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_online_pending_matches(id)).await)
}

#[get("/api/online-tournaments/{id}/matches/completed")]
async fn api_online_completed_matches(
    state: AppState,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_online_completed_matches(id)).await)
}

#[get("/api/online-tournaments/{id}/standings")]
async fn api_online_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let id = path.id;
    respond(on_store(&state, move |store| store.get_online_standings(id)).await)
}

#[patch("/api/online-tournaments/matches/{match_id}/score")]
async fn api_record_online_score(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<ScoreUpdate>,
) -> HttpResponse {
    let (match_id, score) = (path.match_id, *body);
    respond(on_store(&state, move |store| store.record_online_score(match_id, score)).await)
}

#[delete("/api/online-tournaments/{id}")]
async fn api_delete_online_tournament(
    state: AppState,
    path: Path<TournamentPath>,
) -> HttpResponse {
    let id = path.id;
    respond_message(
        on_store(&state, move |store| store.delete_online_tournament(id)).await,
        "Online tournament deleted successfully",
    )
}

/// Register every route, plus a JSON extractor config that reports malformed bodies as
/// `{"error": ...}` like every other failure.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "error": err.to_string() });
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    });

    cfg.app_data(json_config)
        .service(api_health)
        .service(api_list_players)
        .service(api_list_confirmed_players)
        .service(api_player_history)
        .service(api_create_player)
        .service(api_toggle_player_confirmed)
        .service(api_list_roster)
        .service(api_create_roster_player)
        .service(api_get_fixture)
        .service(api_build_fixture)
        .service(api_clear_fixture)
        .service(api_get_standings)
        .service(api_record_score)
        .service(api_archive_tournament)
        .service(api_list_tournaments)
        .service(api_list_archived_tournaments)
        .service(api_get_tournament)
        .service(api_archived_standings)
        .service(api_archived_rounds)
        .service(api_archived_players)
        .service(api_player_races)
        .service(api_update_player_race)
        .service(api_delete_tournament)
        .service(api_create_online_tournament)
        .service(api_get_online_tournament)
        .service(api_online_matches)
        .service(api_online_pending_matches)
        .service(api_online_completed_matches)
        .service(api_online_standings)
        .service(api_record_online_score)
        .service(api_delete_online_tournament);
}
