//! Match monitor lifecycle tests
//!
//! Time is paused in every test, so the 30 second poll interval and the
//! 20 minute timeout run instantly and deterministically.

mod fixtures;

use async_trait::async_trait;
use fixtures::{create_stored_match, create_test_monitor, create_test_store, live_game_with, PendingLiveGameClient};
use game_night::riot::{ActiveGame, LiveGameClient, LiveGameError};
use game_night::storage::{ChampionPickStore, MatchStore};
use game_night::{MonitorOutcome, MonitorState};
use mockall::mock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

mock! {
    pub LiveGame {}

    #[async_trait]
    impl LiveGameClient for LiveGame {
        async fn get_active_game(&self, account_id: &str) -> Result<ActiveGame, LiveGameError>;
    }
}

/// Client that never finds a game and records every account it was asked about
fn recording_client(queried: Arc<Mutex<Vec<String>>>) -> MockLiveGame {
    let mut client = MockLiveGame::new();
    client.expect_get_active_game().returning(move |account| {
        queried.lock().unwrap().push(account.to_string());
        Err(LiveGameError::NotFound)
    });
    client
}

fn only_accounts(queried: &[String], accounts: &[&str]) -> bool {
    queried.iter().all(|a| accounts.contains(&a.as_str()))
}

#[tokio::test(start_paused = true)]
async fn test_new_start_replaces_running_monitor() {
    let store = create_test_store(4);
    let first = create_stored_match(&store, vec![1], vec![2]);
    let second = create_stored_match(&store, vec![3], vec![4]);

    let queried = Arc::new(Mutex::new(Vec::new()));
    let monitor = create_test_monitor(store.clone(), Arc::new(recording_client(queried.clone())));

    monitor.start(first.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(65)).await;

    monitor.start(second.id).await.unwrap();
    let switched_at = queried.lock().unwrap().len();
    assert_eq!(
        monitor.state().await,
        MonitorState::Monitoring { match_id: second.id }
    );

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(monitor.stop().await, Some(MonitorOutcome::Cancelled));

    let queried = queried.lock().unwrap().clone();
    assert_eq!(switched_at, 3);
    assert!(only_accounts(&queried[..switched_at], &["acc-1", "acc-2"]));
    assert!(queried.len() > switched_at);
    assert!(only_accounts(&queried[switched_at..], &["acc-3", "acc-4"]));
}

#[tokio::test(start_paused = true)]
async fn test_start_while_another_caller_waits() {
    let store = create_test_store(4);
    let first = create_stored_match(&store, vec![1], vec![2]);
    let second = create_stored_match(&store, vec![3], vec![4]);

    let queried = Arc::new(Mutex::new(Vec::new()));
    let monitor = Arc::new(create_test_monitor(
        store.clone(),
        Arc::new(recording_client(queried.clone())),
    ));

    monitor.start(first.id).await.unwrap();
    let waiter = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.wait().await })
    };
    tokio::time::sleep(Duration::from_secs(45)).await;
    assert!(!waiter.is_finished());

    monitor.start(second.id).await.unwrap();
    let switched_at = queried.lock().unwrap().len();

    // The waiter sees the first loop end because the second start cancelled it
    assert_eq!(waiter.await.unwrap(), Some(MonitorOutcome::Cancelled));
    assert_eq!(
        monitor.state().await,
        MonitorState::Monitoring { match_id: second.id }
    );

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(monitor.stop().await, Some(MonitorOutcome::Cancelled));

    let queried = queried.lock().unwrap().clone();
    assert_eq!(switched_at, 2);
    assert!(queried.len() > switched_at);
    assert!(only_accounts(&queried[switched_at..], &["acc-3", "acc-4"]));
}

#[tokio::test(start_paused = true)]
async fn test_stop_racing_start_leaves_one_loop() {
    let store = create_test_store(4);
    let first = create_stored_match(&store, vec![1], vec![2]);
    let second = create_stored_match(&store, vec![3], vec![4]);

    let queried = Arc::new(Mutex::new(Vec::new()));
    let monitor = create_test_monitor(store.clone(), Arc::new(recording_client(queried.clone())));

    monitor.start(first.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let (stopped, started) = tokio::join!(monitor.stop(), monitor.start(second.id));
    started.unwrap();
    assert_eq!(stopped, Some(MonitorOutcome::Cancelled));
    let switched_at = queried.lock().unwrap().len();

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(
        monitor.state().await,
        MonitorState::Monitoring { match_id: second.id }
    );
    assert_eq!(monitor.stop().await, Some(MonitorOutcome::Cancelled));

    let queried = queried.lock().unwrap().clone();
    assert!(queried.len() > switched_at);
    assert!(only_accounts(&queried[switched_at..], &["acc-3", "acc-4"]));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_never_registers_champions() {
    let store = create_test_store(2);
    let game = create_stored_match(&store, vec![1], vec![2]);

    let mut client = MockLiveGame::new();
    client
        .expect_get_active_game()
        .times(40)
        .returning(|_| Err(LiveGameError::Http { status: 503 }));
    let monitor = create_test_monitor(store.clone(), Arc::new(client));

    monitor.start(game.id).await.unwrap();
    assert_eq!(monitor.wait().await, Some(MonitorOutcome::TimedOut));

    assert!(store.picks_for_match(game.id).unwrap().is_empty());
    assert!(!store.get_match(game.id).unwrap().unwrap().champions_registered);
}

#[tokio::test(start_paused = true)]
async fn test_partial_roster_keeps_polling() {
    let store = create_test_store(4);
    let game = create_stored_match(&store, vec![1, 2], vec![3, 4]);

    let mut client = MockLiveGame::new();
    let mut calls = 0;
    client.expect_get_active_game().returning(move |_| {
        calls += 1;
        if calls < 3 {
            // Player 4 has not joined yet
            Ok(live_game_with(1, &[1, 2, 3]))
        } else {
            Ok(live_game_with(2, &[1, 2, 3, 4]))
        }
    });
    let monitor = create_test_monitor(store.clone(), Arc::new(client));

    monitor.start(game.id).await.unwrap();
    assert_eq!(
        monitor.wait().await,
        Some(MonitorOutcome::MatchFound { game_id: 2 })
    );
    assert_eq!(store.picks_for_match(game.id).unwrap().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_registration_is_idempotent_across_monitors() {
    let store = create_test_store(2);
    let game = create_stored_match(&store, vec![1], vec![2]);

    let mut client = MockLiveGame::new();
    client
        .expect_get_active_game()
        .times(2)
        .returning(|_| Ok(live_game_with(9, &[1, 2])));
    let monitor = create_test_monitor(store.clone(), Arc::new(client));

    monitor.start(game.id).await.unwrap();
    assert_eq!(monitor.wait().await, Some(MonitorOutcome::MatchFound { game_id: 9 }));

    monitor.start(game.id).await.unwrap();
    assert_eq!(monitor.wait().await, Some(MonitorOutcome::MatchFound { game_id: 9 }));

    assert_eq!(store.picks_for_match(game.id).unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_interrupts_query_in_flight() {
    let store = create_test_store(2);
    let game = create_stored_match(&store, vec![1], vec![2]);
    let client = Arc::new(PendingLiveGameClient::new());
    let monitor = create_test_monitor(store.clone(), client.clone());

    monitor.start(game.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(client.started(), 1);

    assert_eq!(monitor.stop().await, Some(MonitorOutcome::Cancelled));
    assert_eq!(monitor.state().await, MonitorState::Idle);
    assert!(store.picks_for_match(game.id).unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_stops_terminate_once() {
    let store = create_test_store(2);
    let game = create_stored_match(&store, vec![1], vec![2]);

    let mut client = MockLiveGame::new();
    client
        .expect_get_active_game()
        .returning(|_| Err(LiveGameError::NotFound));
    let monitor = create_test_monitor(store, Arc::new(client));

    monitor.start(game.id).await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    let outcomes = futures::future::join_all((0..4).map(|_| monitor.stop())).await;
    assert_eq!(outcomes.iter().filter(|o| o.is_some()).count(), 1);
    assert!(outcomes.contains(&Some(MonitorOutcome::Cancelled)));
}
