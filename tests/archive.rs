//! Integration tests for archiving the live tournament and reading or deleting archives.

use chrono::NaiveDate;
use tournament_fixtures::{
    ArchiveRequest, FixturePlan, Matchup, NewPlayer, PlayerRaceUpdate, RoundFormat, RoundPlan,
    ScoreUpdate, Store, TournamentError, TournamentType,
};

fn request(name: &str, month: &str, year: i32) -> ArchiveRequest {
    ArchiveRequest {
        name: name.to_string(),
        month: month.to_string(),
        year,
        start_date: None,
        end_date: None,
    }
}

/// Ana ends on 9 points (15 scored), Bruno on 9 (12 scored), Carla on 6 (10 scored), Diego on 0.
fn play_ranked_tournament(store: &Store) {
    let repeat = |a: &str, b: &str, n: usize| -> Vec<Matchup> {
        (0..n).map(|_| Matchup::new(a, b)).collect()
    };
    let mut first = repeat("Ana", "Diego", 3);
    first.extend(repeat("Carla", "Diego", 2));
    store
        .build_fixture(&FixturePlan {
            players: ["Ana", "Bruno", "Carla", "Diego"]
                .into_iter()
                .map(NewPlayer::new)
                .collect(),
            rounds: vec![
                RoundPlan {
                    round_number: 1,
                    format: RoundFormat::Pb,
                    matches: first,
                },
                RoundPlan {
                    round_number: 2,
                    format: RoundFormat::Bf,
                    matches: repeat("Bruno", "Diego", 3),
                },
            ],
        })
        .unwrap();

    for m in store.list_matches().unwrap() {
        let players = store.list_players().unwrap();
        let name = &players.iter().find(|p| p.id == m.player1_id).unwrap().name;
        let score1 = match name.as_str() {
            "Ana" | "Carla" => 5,
            _ => 4,
        };
        store
            .record_score(m.id, ScoreUpdate { score1, score2: 0 })
            .unwrap();
    }
}

fn table_counts(store: &Store, id: i64) -> (usize, usize, usize) {
    let standings = store.get_archived_standings(id).map(|s| s.len()).unwrap_or(0);
    let rounds = store.get_archived_rounds(id).map(|r| r.rounds.len()).unwrap_or(0);
    let races = store.list_player_races(id).map(|r| r.len()).unwrap_or(0);
    (standings, rounds, races)
}

#[test]
fn archive_assigns_positions_by_points_then_points_scored() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);

    let created = store.archive_tournament(&request("Copa", "Marzo", 2024)).unwrap();
    let standings = store.get_archived_standings(created.tournament_id).unwrap();

    let ranked: Vec<(u32, &str, u32, u32)> = standings
        .iter()
        .map(|s| (s.final_position, s.player_name.as_str(), s.points, s.total_points_scored))
        .collect();
    assert_eq!(
        ranked,
        vec![
            (1, "Ana", 9, 15),
            (2, "Bruno", 9, 12),
            (3, "Carla", 6, 10),
            (4, "Diego", 0, 0),
        ]
    );
}

#[test]
fn archive_copies_rounds_with_player_names() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;

    let archived = store.get_archived_rounds(id).unwrap();
    assert_eq!(archived.tournament_name, "Copa");
    assert_eq!(archived.rounds.len(), 2);
    assert_eq!(archived.rounds[0].number, 1);
    assert_eq!(archived.rounds[0].format, RoundFormat::Pb);
    assert_eq!(archived.rounds[0].matches.len(), 5);
    assert_eq!(archived.rounds[1].format, RoundFormat::Bf);

    let m = &archived.rounds[1].matches[0];
    assert_eq!(m.player1_name, "Bruno");
    assert_eq!(m.player2_name, "Diego");
    assert_eq!((m.score1, m.score2), (Some(4), Some(0)));
    assert!(m.completed);

    let tournament = store.get_tournament(id).unwrap();
    assert_eq!(tournament.tournament_type, TournamentType::InPerson);
    assert_eq!(tournament.format, None);
}

#[test]
fn archive_survives_clearing_the_live_tournament() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;

    store.clear_live(true).unwrap();
    assert_eq!(store.get_archived_standings(id).unwrap().len(), 4);
    assert_eq!(store.get_archived_rounds(id).unwrap().rounds[0].matches.len(), 5);
}

#[test]
fn invalid_metadata_is_rejected() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);

    assert!(matches!(
        store.archive_tournament(&request(" ", "Marzo", 2024)),
        Err(TournamentError::Validation(_))
    ));
    let mut backwards = request("Copa", "Marzo", 2024);
    backwards.start_date = NaiveDate::from_ymd_opt(2024, 3, 10);
    backwards.end_date = NaiveDate::from_ymd_opt(2024, 3, 1);
    assert!(matches!(
        store.archive_tournament(&backwards),
        Err(TournamentError::Validation(_))
    ));
    assert!(store.list_archived_tournaments().unwrap().is_empty());
}

#[test]
fn archived_list_is_newest_period_first() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    store.archive_tournament(&request("Enero", "Enero", 2024)).unwrap();
    store.archive_tournament(&request("Viejo", "Diciembre", 2023)).unwrap();
    store.archive_tournament(&request("Marzo", "Marzo", 2024)).unwrap();

    let names: Vec<String> = store
        .list_archived_tournaments()
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Marzo", "Enero", "Viejo"]);
}

#[test]
fn deleting_a_missing_tournament_is_not_found_and_changes_nothing() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;
    let before = table_counts(&store, id);

    let err = store.delete_tournament(id + 100).unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(_)));
    assert_eq!(table_counts(&store, id), before);
    assert_eq!(store.list_tournaments().unwrap().len(), 1);
}

#[test]
fn deleting_a_tournament_removes_everything_under_it() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;
    let ana = store.get_archived_standings(id).unwrap()[0].player_id;
    store
        .update_player_race(id, ana, &PlayerRaceUpdate::default())
        .unwrap();

    store.delete_tournament(id).unwrap();

    assert!(matches!(
        store.get_tournament(id),
        Err(TournamentError::NotFound(_))
    ));
    assert!(matches!(
        store.get_archived_standings(id),
        Err(TournamentError::NotFound(_))
    ));
    assert!(matches!(
        store.get_archived_rounds(id),
        Err(TournamentError::NotFound(_))
    ));
    assert!(store.player_history("Ana").unwrap().is_empty());
}

#[test]
fn race_annotations_upsert_and_show_in_standings() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;
    let ana = store.get_archived_standings(id).unwrap()[0].player_id;

    let first = store
        .update_player_race(
            id,
            ana,
            &PlayerRaceUpdate {
                race_pb: Some("5".into()),
                race_bf: None,
                notes: None,
            },
        )
        .unwrap();
    assert_eq!(first.player_name, "Ana");

    let second = store
        .update_player_race(
            id,
            ana,
            &PlayerRaceUpdate {
                race_pb: Some("7".into()),
                race_bf: Some("4".into()),
                notes: Some("moved up".into()),
            },
        )
        .unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(store.list_player_races(id).unwrap().len(), 1);

    let top = &store.get_archived_standings(id).unwrap()[0];
    assert_eq!(top.race_pb.as_deref(), Some("7"));
    assert_eq!(top.race_bf.as_deref(), Some("4"));

    let stranger = store
        .update_player_race(id, 424242, &PlayerRaceUpdate::default())
        .unwrap();
    assert_eq!(stranger.player_name, "Unknown");

    assert!(matches!(
        store.update_player_race(id + 1, ana, &PlayerRaceUpdate::default()),
        Err(TournamentError::NotFound(_))
    ));
}

#[test]
fn archived_players_report_their_totals() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let id = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;

    let players = store.list_archived_players(id).unwrap();
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bruno", "Carla", "Diego"]);
    let diego = &players[3];
    assert_eq!(diego.total_wins, 0);
    assert_eq!(diego.total_matches, 15 + 12 + 10);
}

#[test]
fn player_history_splits_records_by_format() {
    let store = Store::open_in_memory().unwrap();
    play_ranked_tournament(&store);
    let march = store
        .archive_tournament(&request("Copa", "Marzo", 2024))
        .unwrap()
        .tournament_id;
    let may = store
        .archive_tournament(&request("Copa II", "Mayo", 2024))
        .unwrap()
        .tournament_id;

    let history = store.player_history("Diego").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].tournament_id, may);
    assert_eq!(history[1].tournament_id, march);

    let entry = &history[0];
    assert_eq!(entry.final_position, 4);
    assert_eq!(entry.losses, 8);
    assert_eq!((entry.pb.matches, entry.pb.wins), (5, 0));
    assert_eq!((entry.bf.matches, entry.bf.wins), (3, 0));

    let ana = store.player_history("Ana").unwrap();
    assert_eq!((ana[0].pb.wins, ana[0].pb.matches), (3, 3));
    assert_eq!(ana[0].bf.matches, 0);

    assert!(store.player_history("Nobody").unwrap().is_empty());
    assert!(matches!(
        store.player_history("  "),
        Err(TournamentError::Validation(_))
    ));
}
