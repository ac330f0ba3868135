//! HTTP-level tests: routes, status codes and the `{"error": ...}` body.

use actix_web::{http::StatusCode, test, web::Data, App};
use serde_json::{json, Value};
use tournament_fixtures::{api, Store};

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(Data::new(Store::open_in_memory().unwrap()))
                .configure(api::configure),
        )
        .await
    };
}

fn fixture_body() -> Value {
    json!({
        "players": [{"name": "Ana"}, {"name": "Bruno"}],
        "rounds": [{
            "round_number": 1,
            "format": "PB",
            "matches": [{"player1_name": "Ana", "player2_name": "Bruno"}]
        }]
    })
}

#[actix_web::test]
async fn health_reports_ok() {
    let app = app!();
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ok"], true);
}

#[actix_web::test]
async fn build_score_and_archive_round_trip() {
    let app = app!();

    let req = test::TestRequest::post()
        .uri("/api/fixture")
        .set_json(fixture_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary["matches_created"], 1);

    let req = test::TestRequest::get().uri("/api/fixture").to_request();
    let fixture: Value = test::call_and_read_body_json(&app, req).await;
    let match_id = fixture["rounds"][0]["matches"][0]["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/matches/{match_id}/score"))
        .set_json(json!({"score1": 2, "score2": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/standings").to_request();
    let standings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(standings[0]["name"], "Ana");
    assert_eq!(standings[0]["points"], 3);

    let req = test::TestRequest::post()
        .uri("/api/tournaments/archive")
        .set_json(json!({"name": "Copa", "month": "Marzo", "year": 2024}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["tournament_id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri("/api/tournaments/archived").to_request();
    let archived: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(archived[0]["type"], "IN_PERSON");

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{id}/standings"))
        .to_request();
    let standings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(standings[0]["final_position"], 1);
    assert_eq!(standings[1]["player_name"], "Bruno");
}

#[actix_web::test]
async fn unknown_player_is_a_bad_request() {
    let app = app!();
    let mut body = fixture_body();
    body["rounds"][0]["matches"][0]["player2_name"] = json!("Ghost");

    let req = test::TestRequest::post()
        .uri("/api/fixture")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].as_str().unwrap().contains("Ghost"));
}

#[actix_web::test]
async fn missing_rows_are_not_found() {
    let app = app!();

    let req = test::TestRequest::patch()
        .uri("/api/matches/42/score")
        .set_json(json!({"score1": 1, "score2": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/api/tournaments/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].is_string());
}

#[actix_web::test]
async fn malformed_json_uses_the_error_body() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/fixture")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].is_string());
}

#[actix_web::test]
async fn online_tournament_over_http() {
    let app = app!();
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let req = test::TestRequest::post()
            .uri("/api/roster")
            .set_json(json!({"name": name}))
            .to_request();
        let player: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(player["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::post()
        .uri("/api/online-tournaments")
        .set_json(json!({
            "name": "Liga", "month": "Abril", "year": 2024, "format": "PB", "player_ids": ids
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["matches_generated"], 3);
    let id = created["tournament_id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/online-tournaments/{id}/matches/pending"))
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    let match_id = pending[0]["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/online-tournaments/matches/{match_id}/score"))
        .set_json(json!({"score1": 2, "score2": 1}))
        .to_request();
    let recorded: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(recorded["score"], "A 2-1 B");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/online-tournaments/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn out_of_range_score_is_a_bad_request() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/api/fixture")
        .set_json(fixture_body())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/fixture").to_request();
    let fixture: Value = test::call_and_read_body_json(&app, req).await;
    let match_id = fixture["rounds"][0]["matches"][0]["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/matches/{match_id}/score"))
        .set_json(json!({"score1": u32::MAX, "score2": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert!(err["error"].as_str().unwrap().contains("out of range"));

    let req = test::TestRequest::get().uri("/api/standings").to_request();
    let standings: Value = test::call_and_read_body_json(&app, req).await;
    assert!(standings
        .as_array()
        .unwrap()
        .iter()
        .all(|row| row["matches_played"] == 0));
}
