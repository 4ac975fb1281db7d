//! Integration tests for lobby commands against the in-memory store.
//!
//! Every client in these tests shares one `MemoryStore`, which is how
//! separate devices share one hosted document in production.

use std::sync::Arc;

use imposter_protocol::{LobbyStatus, PlayerId, Role, RoomCode};
use imposter_room::{FixedPicker, GameConfig, Invalid, LobbySession, RoomError};
use imposter_store::{LobbyStore, MemoryStore, StoreError};
use imposter_tick::ManualClock;

// =========================================================================
// Helpers
// =========================================================================

const T0: u64 = 1_700_000_000_000;

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

fn session(store: &Arc<MemoryStore>) -> LobbySession<MemoryStore> {
    LobbySession::new(Arc::clone(store), GameConfig::default())
}

fn scripted(store: &Arc<MemoryStore>, script: &[usize]) -> LobbySession<MemoryStore> {
    session(store)
        .with_picker(FixedPicker::new(script))
        .with_clock(ManualClock::at(T0))
}

/// A lobby with Ana hosting and Ben and Cem joined.
async fn three_player_room(s: &LobbySession<MemoryStore>) -> RoomCode {
    let code = RoomCode::parse("K7P2").unwrap();
    s.create_room_with_code(&pid("u1"), "Ana", code.clone())
        .await
        .unwrap();
    s.join_room(&pid("u2"), "k7p2", "Ben").await.unwrap();
    s.join_room(&pid("u3"), " K7P2 ", "Cem").await.unwrap();
    code
}

// =========================================================================
// Create and join
// =========================================================================

#[tokio::test]
async fn test_create_room_makes_caller_host_and_only_player() {
    let store = Arc::new(MemoryStore::new());
    let lobby = session(&store).create_room(&pid("u1"), "  Ana ").await.unwrap();

    assert_eq!(lobby.code.as_str().len(), 4);
    assert!(lobby.code.as_str().chars().all(|c| RoomCode::ALPHABET.contains(c)));
    assert_eq!(lobby.host_id, pid("u1"));
    assert_eq!(lobby.status, LobbyStatus::Lobby);
    assert_eq!(lobby.category, "Tiere");
    assert_eq!(lobby.players.len(), 1);
    assert_eq!(lobby.players[0].name, "Ana");
    assert_eq!(lobby.players[0].score, 0);

    let stored = store.read(&lobby.code).await.unwrap();
    assert_eq!(stored, Some(lobby));
}

#[tokio::test]
async fn test_create_with_empty_name_never_touches_store() {
    let store = Arc::new(MemoryStore::new());
    let err = session(&store).create_room(&pid("u1"), "   ").await.unwrap_err();
    assert!(matches!(err, RoomError::Validation(Invalid::EmptyName)));
    assert_eq!(store.op_count(), 0);
}

#[tokio::test]
async fn test_join_is_idempotent_per_player_id() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;

    let again = s.join_room(&pid("u2"), "K7P2", "Benny").await.unwrap();
    assert_eq!(again.players.len(), 3);
    assert_eq!(again.player(&pid("u2")).unwrap().name, "Ben");

    let stored = store.read(&code).await.unwrap().unwrap();
    let names: Vec<_> = stored.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Ben", "Cem"]);
}

#[tokio::test]
async fn test_join_with_short_code_is_rejected_before_any_store_call() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    three_player_room(&s).await;
    let ops = store.op_count();

    let err = s.join_room(&pid("u4"), "AB", "Dora").await.unwrap_err();
    assert_eq!(err.to_string(), r#"invalid input: malformed room code "AB""#);
    assert!(matches!(err, RoomError::Validation(Invalid::RoomCode(_))));
    assert_eq!(store.op_count(), ops);
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let store = Arc::new(MemoryStore::new());
    let err = session(&store)
        .join_room(&pid("u4"), "ZZZZ", "Dora")
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::NotFound(code) if code.as_str() == "ZZZZ"));
}

#[tokio::test]
async fn test_join_running_round_is_refused() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    s.start_game(&pid("u1"), &code).await.unwrap();

    let err = s.join_room(&pid("u4"), "K7P2", "Dora").await.unwrap_err();
    assert!(matches!(
        err,
        RoomError::StateConflict { status: LobbyStatus::Playing, .. }
    ));
    assert_eq!(store.read(&code).await.unwrap().unwrap().players.len(), 3);
}

// =========================================================================
// Rounds
// =========================================================================

#[tokio::test]
async fn test_full_round_with_scripted_draws() {
    let store = Arc::new(MemoryStore::new());
    let s = scripted(&store, &[0, 1]);
    let code = three_player_room(&s).await;

    let playing = s.start_game(&pid("u1"), &code).await.unwrap();
    assert_eq!(playing.status, LobbyStatus::Playing);
    assert_eq!(playing.secret_word, "Löwe");
    assert_eq!(playing.imposter_id, Some(pid("u2")));
    assert_eq!(playing.start_time, Some(T0));
    assert_eq!(store.read(&code).await.unwrap(), Some(playing.clone()));

    assert_eq!(playing.role_of(&pid("u2")), Some(Role::Imposter));
    for id in ["u1", "u3"] {
        assert_eq!(
            playing.role_of(&pid(id)),
            Some(Role::Word {
                word: "Löwe".into(),
                category: "Tiere".into(),
            })
        );
    }

    let revealed = s.reveal(&pid("u1"), &code).await.unwrap();
    assert_eq!(revealed.status, LobbyStatus::Revealed);
    assert_eq!(revealed.imposter().map(|p| p.name.as_str()), Some("Ben"));
    assert_eq!(revealed.secret_word, "Löwe");

    let reset = s.reset_game(&pid("u1"), &code).await.unwrap();
    assert_eq!(reset.status, LobbyStatus::Lobby);
    assert_eq!(reset.secret_word, "");
    assert_eq!(reset.imposter_id, None);
    assert_eq!(reset.start_time, None);
    assert_eq!(reset.players, playing.players);
    assert_eq!(reset.category, "Tiere");
}

#[tokio::test]
async fn test_start_needs_three_players() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = RoomCode::parse("ABCD").unwrap();
    s.create_room_with_code(&pid("u1"), "Ana", code.clone())
        .await
        .unwrap();
    s.join_room(&pid("u2"), "ABCD", "Ben").await.unwrap();

    let err = s.start_game(&pid("u1"), &code).await.unwrap_err();
    assert!(matches!(err, RoomError::NotEnoughPlayers { have: 2, need: 3 }));
    assert_eq!(
        store.read(&code).await.unwrap().unwrap().status,
        LobbyStatus::Lobby
    );
}

#[tokio::test]
async fn test_start_on_emptied_player_list_is_refused_even_with_lowered_minimum() {
    let store = Arc::new(MemoryStore::new());
    let mut config = GameConfig::default();
    config.min_players = 0;
    let s = LobbySession::new(Arc::clone(&store), config);
    let code = RoomCode::parse("ABCD").unwrap();
    s.create_room_with_code(&pid("u1"), "Ana", code.clone())
        .await
        .unwrap();

    // Another client may write any document, including one with no players.
    let mut doc = store.read(&code).await.unwrap().unwrap();
    doc.players.clear();
    store.create(&code, &doc).await.unwrap();

    let err = s.start_game(&pid("u1"), &code).await.unwrap_err();
    assert!(matches!(err, RoomError::NotEnoughPlayers { have: 0, need: 3 }));
    assert_eq!(store.read(&code).await.unwrap(), Some(doc));
}

#[tokio::test]
async fn test_random_rounds_keep_invariants() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    s.change_category(&pid("u1"), &code, "Technik").await.unwrap();
    let words = s.config().catalog.words("Technik").unwrap().to_vec();

    for _ in 0..25 {
        let lobby = s.start_game(&pid("u1"), &code).await.unwrap();
        lobby.check_invariants().unwrap();
        assert!(words.contains(&lobby.secret_word));

        let imposters = lobby
            .players
            .iter()
            .filter(|p| lobby.role_of(&p.id).is_some_and(|r| r.is_imposter()))
            .count();
        assert_eq!(imposters, 1);

        s.reveal(&pid("u1"), &code).await.unwrap();
    }
}

#[tokio::test]
async fn test_start_again_from_revealed_draws_new_round() {
    let store = Arc::new(MemoryStore::new());
    let s = scripted(&store, &[0, 0, 2, 2]);
    let code = three_player_room(&s).await;

    s.start_game(&pid("u1"), &code).await.unwrap();
    s.reveal(&pid("u1"), &code).await.unwrap();
    let next = s.start_game(&pid("u1"), &code).await.unwrap();

    assert_eq!(next.status, LobbyStatus::Playing);
    assert_eq!(next.secret_word, "Giraffe");
    assert_eq!(next.imposter_id, Some(pid("u3")));
}

#[tokio::test]
async fn test_change_category_outside_lobby_is_conflict() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    s.start_game(&pid("u1"), &code).await.unwrap();

    let err = s.change_category(&pid("u1"), &code, "Essen").await.unwrap_err();
    assert!(matches!(err, RoomError::StateConflict { .. }));
}

#[tokio::test]
async fn test_unknown_category_is_rejected_locally() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    let ops = store.op_count();

    let err = s.change_category(&pid("u1"), &code, "Sport").await.unwrap_err();
    assert!(matches!(err, RoomError::Validation(Invalid::UnknownCategory(c)) if c == "Sport"));
    assert_eq!(store.op_count(), ops);
}

// =========================================================================
// Authority and failures
// =========================================================================

#[tokio::test]
async fn test_guests_cannot_drive_the_round() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;

    assert!(matches!(
        s.start_game(&pid("u2"), &code).await,
        Err(RoomError::NotHost(id)) if id == pid("u2")
    ));
    assert!(matches!(
        s.change_category(&pid("u3"), &code, "Orte").await,
        Err(RoomError::NotHost(_))
    ));

    s.start_game(&pid("u1"), &code).await.unwrap();
    assert!(matches!(
        s.reveal(&pid("u3"), &code).await,
        Err(RoomError::NotHost(_))
    ));
}

#[tokio::test]
async fn test_store_outage_during_start_leaves_document_unchanged() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    let before = store.read(&code).await.unwrap();

    store.set_offline(true);
    let err = s.start_game(&pid("u1"), &code).await.unwrap_err();
    assert!(matches!(err, RoomError::Store(StoreError::Unavailable(_))));

    store.set_offline(false);
    assert_eq!(store.read(&code).await.unwrap(), before);
}

#[tokio::test]
async fn test_commands_on_deleted_room_report_closed() {
    let store = Arc::new(MemoryStore::new());
    let s = session(&store);
    let code = three_player_room(&s).await;
    assert!(store.delete(&code).await);

    let err = s.start_game(&pid("u1"), &code).await.unwrap_err();
    assert!(matches!(err, RoomError::RoomClosed(c) if c == code));
}

#[tokio::test]
async fn test_clients_see_each_others_writes() {
    let store = Arc::new(MemoryStore::new());
    let host = session(&store);
    let guest = session(&store);
    let code = RoomCode::parse("WXYZ").unwrap();

    host.create_room_with_code(&pid("u1"), "Ana", code.clone())
        .await
        .unwrap();
    let mut feed = store.subscribe(&code).await.unwrap();
    guest.join_room(&pid("u2"), "wxyz", "Ben").await.unwrap();

    let mut last = None;
    while let Some(Ok(snapshot)) = feed.try_next() {
        last = Some(snapshot);
    }
    match last {
        Some(imposter_store::Snapshot::Present(lobby)) => assert_eq!(lobby.players.len(), 2),
        other => panic!("expected the joined document, got {other:?}"),
    }
}
