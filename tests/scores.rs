//! Integration tests for recording live results and the standings they drive.

use tournament_fixtures::{
    FixturePlan, Matchup, NewPlayer, RoundFormat, RoundPlan, ScoreUpdate, Store, TournamentError,
};

fn two_round_store() -> Store {
    let store = Store::open_in_memory().unwrap();
    store
        .build_fixture(&FixturePlan {
            players: vec![NewPlayer::new("Ana"), NewPlayer::new("Bruno"), NewPlayer::new("Carla")],
            rounds: vec![
                RoundPlan {
                    round_number: 1,
                    format: RoundFormat::Pb,
                    matches: vec![Matchup::new("Ana", "Bruno")],
                },
                RoundPlan {
                    round_number: 2,
                    format: RoundFormat::Bf,
                    matches: vec![Matchup::new("Ana", "Carla"), Matchup::new("Bruno", "Carla")],
                },
            ],
        })
        .unwrap();
    store
}

fn score(score1: u32, score2: u32) -> ScoreUpdate {
    ScoreUpdate { score1, score2 }
}

#[test]
fn recording_completes_the_match_and_derives_stats() {
    let store = two_round_store();
    let first = store.list_matches().unwrap()[0].clone();

    assert_eq!(store.record_score(first.id, score(2, 1)).unwrap(), first.id);

    let updated = store.list_matches().unwrap()[0].clone();
    assert!(updated.completed);
    assert_eq!(updated.score1, Some(2));
    assert_eq!(updated.score2, Some(1));

    let stats = store.list_player_match_stats().unwrap();
    assert_eq!(stats.len(), 2);
    let own = stats.iter().find(|s| s.player_id == first.player1_id).unwrap();
    let other = stats.iter().find(|s| s.player_id == first.player2_id).unwrap();
    assert_eq!((own.games_played, own.games_won), (3, 2));
    assert_eq!((other.games_played, other.games_won), (3, 1));
}

#[test]
fn recording_the_same_result_twice_changes_nothing() {
    let store = two_round_store();
    let match_id = store.list_matches().unwrap()[0].id;

    store.record_score(match_id, score(2, 1)).unwrap();
    let stats_once = store.list_player_match_stats().unwrap();
    let standings_once = store.get_standings().unwrap();

    store.record_score(match_id, score(2, 1)).unwrap();
    let stats_twice = store.list_player_match_stats().unwrap();
    assert_eq!(stats_twice.len(), 2);
    assert_eq!(
        stats_twice
            .iter()
            .map(|s| (s.player_id, s.games_played, s.games_won))
            .collect::<Vec<_>>(),
        stats_once
            .iter()
            .map(|s| (s.player_id, s.games_played, s.games_won))
            .collect::<Vec<_>>()
    );
    assert_eq!(store.get_standings().unwrap(), standings_once);
}

#[test]
fn correcting_a_result_overwrites_it() {
    let store = two_round_store();
    let match_id = store.list_matches().unwrap()[0].id;

    store.record_score(match_id, score(2, 1)).unwrap();
    store.record_score(match_id, score(0, 2)).unwrap();

    let standings = store.get_standings().unwrap();
    let ana = standings.iter().find(|s| s.name == "Ana").unwrap();
    let bruno = standings.iter().find(|s| s.name == "Bruno").unwrap();
    assert_eq!((ana.wins, ana.losses, ana.points), (0, 1, 0));
    assert_eq!((bruno.wins, bruno.losses, bruno.points), (1, 0, 3));
    assert_eq!(store.list_player_match_stats().unwrap().len(), 2);
}

#[test]
fn unknown_match_is_not_found_and_writes_nothing() {
    let store = two_round_store();
    let err = store.record_score(9999, score(1, 0)).unwrap_err();
    assert!(matches!(err, TournamentError::NotFound(_)));
    assert!(store.list_player_match_stats().unwrap().is_empty());
    assert!(store.list_matches().unwrap().iter().all(|m| !m.completed));
}

#[test]
fn standings_rank_by_points_then_points_scored() {
    let store = two_round_store();
    let matches = store.list_matches().unwrap();

    store.record_score(matches[0].id, score(1, 1)).unwrap(); // Ana - Bruno tie
    store.record_score(matches[1].id, score(3, 0)).unwrap(); // Ana beats Carla
    store.record_score(matches[2].id, score(2, 1)).unwrap(); // Bruno beats Carla

    let standings = store.get_standings().unwrap();
    let order: Vec<&str> = standings.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(order, vec!["Ana", "Bruno", "Carla"]);

    let ana = &standings[0];
    assert_eq!(ana.matches_played, 2);
    assert_eq!((ana.wins, ana.ties, ana.losses), (1, 1, 0));
    assert_eq!(ana.points, 4);
    assert_eq!(ana.total_points_scored, 4);
    assert_eq!(ana.total_matches, 5);

    let bruno = &standings[1];
    assert_eq!(bruno.points, 4);
    assert_eq!(bruno.total_points_scored, 3);

    let carla = &standings[2];
    assert_eq!((carla.losses, carla.points, carla.total_points_scored), (2, 0, 1));
}

#[test]
fn out_of_range_score_is_rejected_before_any_write() {
    let store = two_round_store();
    let match_id = store.list_matches().unwrap()[0].id;
    let standings_before = store.get_standings().unwrap();

    let err = store.record_score(match_id, score(u32::MAX, 1)).unwrap_err();
    assert!(matches!(err, TournamentError::Validation(_)));

    let m = store.list_matches().unwrap()[0].clone();
    assert_eq!((m.score1, m.completed), (None, false));
    assert!(store.list_player_match_stats().unwrap().is_empty());
    assert_eq!(store.get_standings().unwrap(), standings_before);

    // The largest sum that still fits is accepted and kept exact.
    store.record_score(match_id, score(u32::MAX - 1, 1)).unwrap();
    let stats = store.list_player_match_stats().unwrap();
    assert!(stats.iter().all(|s| s.games_played == u32::MAX));
}
