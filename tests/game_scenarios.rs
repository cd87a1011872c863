//! End-to-end scenario tests against the application layer, driving the
//! same use cases a transport adapter would (spec.md §8).

use std::sync::Arc;

use yaniv_core::application::game::{CallYaniv, CallYanivError, CallYanivInput, CompleteTurn, CompleteTurnInput};
use yaniv_core::application::party::{CreateRoom, CreateRoomInput, JoinRoom, JoinRoomInput, LeaveRoom, LeaveRoomInput, LeaveRoomOutcome};
use yaniv_core::domain::entities::{Card, PlayerStatus, PlayerStatusEntry, Suit};
use yaniv_core::domain::repositories::RoomRepository;
use yaniv_core::domain::services::turn_engine::{TurnAction, TurnChoice};
use yaniv_core::domain::value_objects::{GameState, RoomConfig};
use yaniv_core::infrastructure::repositories::InMemoryRoomRepository;

fn c(suit: Suit, rank: u8) -> Card {
    Card::new(suit, rank)
}

fn stats(name: &str) -> PlayerStatusEntry {
    PlayerStatusEntry {
        status: PlayerStatus::Active,
        score: 0,
        player_name: name.to_string(),
        avatar_index: 0,
    }
}

/// Seed a two-player game state directly, bypassing the deal so each test
/// can fix the exact hands a scenario names.
async fn seed_game(repo: &InMemoryRoomRepository, room_id: &str, config: RoomConfig) -> GameState {
    let mut game = GameState::new(vec!["p1".to_string(), "p2".to_string()], config, 0);
    game.round = 1;
    for p in ["p1", "p2"] {
        game.players_stats.insert(p.to_string(), stats(p));
    }
    repo.save_game_state(&room_id.to_string(), game.clone()).await.unwrap();
    game
}

// S1 - Trivial Yaniv: a 9-point hand is above the default 7-point threshold.
#[tokio::test]
async fn s1_yaniv_rejected_above_threshold() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut game = seed_game(&repo, "R1", RoomConfig::default()).await;
    game.player_hands.insert(
        "p1".to_string(),
        vec![c(Suit::Spades, 1), c(Suit::Spades, 2), c(Suit::Hearts, 1), c(Suit::Hearts, 2), c(Suit::Clubs, 3)],
    );
    game.player_hands.insert("p2".to_string(), vec![c(Suit::Diamonds, 10)]);
    game.pickup_cards = vec![c(Suit::Diamonds, 13)];
    game.current_player_index = 0;
    repo.save_game_state(&"R1".to_string(), game).await.unwrap();

    let call_yaniv = CallYaniv::new(repo.clone());
    let err = call_yaniv
        .execute(CallYanivInput { player_id: "p1".to_string(), room_id: "R1".to_string() })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Cannot call Yaniv with 9 points. Maximum is 7.");
    match err {
        CallYanivError::HandTooHigh { value, max } => {
            assert_eq!(value, 9);
            assert_eq!(max, 7);
        }
        other => panic!("expected HandTooHigh, got {other:?}"),
    }
}

// S3 - Joker run with a gap: {3D,5D,Joker} is a valid set and normalizes to
// [3D, Joker, 5D], discarding it as a three-card run picks up nothing back.
#[tokio::test]
async fn s3_joker_run_with_gap_completes_turn() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut game = seed_game(&repo, "R3", RoomConfig::default()).await;
    let joker = Card::joker(Suit::Diamonds);
    game.player_hands.insert(
        "p1".to_string(),
        vec![c(Suit::Diamonds, 3), c(Suit::Diamonds, 5), joker, c(Suit::Clubs, 2), c(Suit::Clubs, 4)],
    );
    game.player_hands.insert("p2".to_string(), vec![]);
    game.pickup_cards = vec![c(Suit::Hearts, 6)];
    game.deck = vec![c(Suit::Spades, 9)];
    game.current_player_index = 0;
    repo.save_game_state(&"R3".to_string(), game).await.unwrap();

    let complete_turn = CompleteTurn::new(repo.clone());
    let result = complete_turn
        .execute(CompleteTurnInput {
            player_id: "p1".to_string(),
            room_id: "R3".to_string(),
            action: TurnAction {
                selected_cards: vec![c(Suit::Diamonds, 3), c(Suit::Diamonds, 5), joker],
                choice: TurnChoice::Deck,
            },
        })
        .await
        .unwrap();

    assert_eq!(result.new_pickup_cards, vec![c(Suit::Diamonds, 3), joker, c(Suit::Diamonds, 5)]);
    let game = repo.find_game_state(&"R3".to_string()).await.unwrap().unwrap();
    assert_eq!(game.graveyard, vec![c(Suit::Hearts, 6)]);
}

// S4 - Slap-down right: a run {5C,6C,7C} is on the pile; drawing 8C arms a
// right-side slap window for the drawer.
#[tokio::test]
async fn s4_slap_down_arms_on_run_extension() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let config = RoomConfig { slap_down: true, ..RoomConfig::default() };
    let mut game = seed_game(&repo, "R4", config).await;
    game.player_hands.insert(
        "p1".to_string(),
        vec![c(Suit::Clubs, 5), c(Suit::Clubs, 6), c(Suit::Clubs, 7)],
    );
    game.player_hands.insert("p2".to_string(), vec![]);
    game.pickup_cards = vec![c(Suit::Hearts, 9)];
    game.deck = vec![c(Suit::Clubs, 8)];
    game.current_player_index = 0;
    repo.save_game_state(&"R4".to_string(), game).await.unwrap();

    let complete_turn = CompleteTurn::new(repo.clone());
    let result = complete_turn
        .execute(CompleteTurnInput {
            player_id: "p1".to_string(),
            room_id: "R4".to_string(),
            action: TurnAction {
                selected_cards: vec![c(Suit::Clubs, 5), c(Suit::Clubs, 6), c(Suit::Clubs, 7)],
                choice: TurnChoice::Deck,
            },
        })
        .await
        .unwrap();

    assert_eq!(result.drawn_card, Some(c(Suit::Clubs, 8)));
    assert_eq!(result.slap_down_active_for.as_deref(), Some("p1"));
    let game = repo.find_game_state(&"R4".to_string()).await.unwrap().unwrap();
    assert!(game.slap_down_window.is_some());
}

// S5 - Bonus reduction: a round score landing on a multiple of 50 is
// reduced by 50 instead of applied outright.
#[tokio::test]
async fn s5_bonus_reduction_on_round_score() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut game = seed_game(&repo, "R5", RoomConfig::default()).await;
    game.player_hands.insert("p1".to_string(), vec![c(Suit::Clubs, 7)]);
    game.player_hands.insert(
        "p2".to_string(),
        vec![c(Suit::Diamonds, 10), c(Suit::Spades, 10), c(Suit::Hearts, 10), c(Suit::Clubs, 10), c(Suit::Diamonds, 13)],
    );
    if let Some(p2) = game.players_stats.get_mut("p2") {
        p2.score = 0;
    }
    game.current_player_index = 0;
    repo.save_game_state(&"R5".to_string(), game).await.unwrap();

    let call_yaniv = CallYaniv::new(repo.clone());
    let out = call_yaniv
        .execute(CallYanivInput { player_id: "p1".to_string(), room_id: "R5".to_string() })
        .await
        .unwrap();

    let p2_delta = out.deltas.iter().find(|d| d.player_id == "p2").unwrap();
    assert_eq!(p2_delta.new_score, 0);
    assert!(p2_delta.bonus_reduction_applied);
}

// Conservation across a sequence of turns (spec.md §8.1): deck, hands,
// pickup pile and graveyard always partition the full 54-card deck.
#[tokio::test]
async fn conservation_holds_across_a_turn_sequence() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut rng = rand::thread_rng();
    let (mut deck, pickup_cards) = yaniv_core::domain::services::shuffle_new_deck(&mut rng);
    let players = vec!["p1".to_string(), "p2".to_string()];
    let hands = yaniv_core::domain::services::deal_hands(&mut deck, &players);

    let mut game = GameState::new(players.clone(), RoomConfig::default(), 0);
    game.round = 1;
    for p in ["p1", "p2"] {
        game.players_stats.insert(p.to_string(), stats(p));
    }
    game.deck = deck;
    game.pickup_cards = pickup_cards;
    game.player_hands = hands;
    game.current_player_index = 0;
    repo.save_game_state(&"RC".to_string(), game).await.unwrap();

    let assert_conserved = |game: &GameState| {
        let hand_total: usize = game.player_hands.values().map(|h| h.len()).sum();
        let total = game.deck.len() + hand_total + game.pickup_cards.len() + game.graveyard.len();
        assert_eq!(total, 54, "card total drifted from 54: {game:?}");
    };

    let complete_turn = CompleteTurn::new(repo.clone());
    for turn in 0..6 {
        let room_game = repo.find_game_state(&"RC".to_string()).await.unwrap().unwrap();
        let current = room_game.current_player_id().clone();
        let hand = room_game.hand_of(&current).to_vec();
        let lowest = *hand.iter().min_by_key(|c| c.rank).unwrap();
        let choice = if turn % 2 == 0 { TurnChoice::Deck } else { TurnChoice::Pickup { pickup_index: 0 } };
        complete_turn
            .execute(CompleteTurnInput {
                player_id: current,
                room_id: "RC".to_string(),
                action: TurnAction { selected_cards: vec![lowest], choice },
            })
            .await
            .unwrap();
        let updated = repo.find_game_state(&"RC".to_string()).await.unwrap().unwrap();
        assert_conserved(&updated);
    }
}

// S2 - Run pickup: picking up {3H,4H,5H} from the pile leaves the drawn
// card out of the hand (pickup adds the taken card, discards the run).
#[tokio::test]
async fn s2_run_pickup_updates_hand_and_pile() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut game = seed_game(&repo, "R2", RoomConfig::default()).await;
    game.player_hands.insert(
        "p1".to_string(),
        vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5), c(Suit::Clubs, 7), c(Suit::Diamonds, 9)],
    );
    game.player_hands.insert("p2".to_string(), vec![]);
    game.pickup_cards = vec![c(Suit::Hearts, 6)];
    game.current_player_index = 0;
    repo.save_game_state(&"R2".to_string(), game).await.unwrap();

    let complete_turn = CompleteTurn::new(repo.clone());
    let result = complete_turn
        .execute(CompleteTurnInput {
            player_id: "p1".to_string(),
            room_id: "R2".to_string(),
            action: TurnAction {
                selected_cards: vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5)],
                choice: TurnChoice::Pickup { pickup_index: 0 },
            },
        })
        .await
        .unwrap();

    assert_eq!(result.new_pickup_cards, vec![c(Suit::Hearts, 3), c(Suit::Hearts, 4), c(Suit::Hearts, 5)]);
    let game = repo.find_game_state(&"R2".to_string()).await.unwrap().unwrap();
    let hand = &game.player_hands["p1"];
    assert_eq!(hand.len(), 3);
    assert!(hand.contains(&c(Suit::Hearts, 6)));
    assert!(hand.contains(&c(Suit::Clubs, 7)));
    assert!(hand.contains(&c(Suit::Diamonds, 9)));
    assert_eq!(game.current_player_id(), "p2");
}

// S6 - Assaf: P1 calls Yaniv at 7, P2 is lower at 5; P2 wins and P1 eats
// the 30-point penalty plus their own hand value.
#[tokio::test]
async fn s6_assaf_penalizes_caller() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let mut game = seed_game(&repo, "R6", RoomConfig::default()).await;
    game.player_hands.insert("p1".to_string(), vec![c(Suit::Clubs, 7)]);
    game.player_hands.insert("p2".to_string(), vec![c(Suit::Diamonds, 5)]);
    game.current_player_index = 0;
    repo.save_game_state(&"R6".to_string(), game).await.unwrap();

    let call_yaniv = CallYaniv::new(repo.clone());
    let out = call_yaniv
        .execute(CallYanivInput { player_id: "p1".to_string(), room_id: "R6".to_string() })
        .await
        .unwrap();

    assert_eq!(out.outcome.winner, "p2");
    assert_eq!(out.outcome.assaf_caller.as_deref(), Some("p1"));
    let p1_delta = out.deltas.iter().find(|d| d.player_id == "p1").unwrap();
    assert_eq!(p1_delta.added, 37);
    let p2_delta = out.deltas.iter().find(|d| d.player_id == "p2").unwrap();
    assert_eq!(p2_delta.added, 0);
}

// S7 - Match end via elimination: a low maxMatchPoints eliminates every
// other active player in the same round, leaving the caller the winner.
#[tokio::test]
async fn s7_match_ends_when_one_active_player_remains() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let config = RoomConfig { max_match_points: 25, ..RoomConfig::default() };
    let mut game = GameState::new(vec!["p1".to_string(), "p2".to_string(), "p3".to_string()], config, 0);
    game.round = 1;
    for p in ["p1", "p2", "p3"] {
        let mut entry = stats(p);
        entry.score = 20;
        game.players_stats.insert(p.to_string(), entry);
    }
    game.player_hands.insert("p1".to_string(), vec![c(Suit::Clubs, 2)]);
    game.player_hands.insert("p2".to_string(), vec![c(Suit::Diamonds, 10), c(Suit::Hearts, 9)]);
    game.player_hands.insert("p3".to_string(), vec![c(Suit::Spades, 8), c(Suit::Clubs, 9)]);
    game.current_player_index = 0;
    repo.save_game_state(&"R7".to_string(), game).await.unwrap();

    let call_yaniv = CallYaniv::new(repo.clone());
    let out = call_yaniv
        .execute(CallYanivInput { player_id: "p1".to_string(), room_id: "R7".to_string() })
        .await
        .unwrap();

    assert_eq!(out.match_winner.as_deref(), Some("p1"));
    assert_eq!(out.game.players_loser_order.len(), 2);
    assert!(out.game.game_ended);
}

#[tokio::test]
async fn create_then_join_then_leave_destroys_empty_room() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let create = CreateRoom::new(repo.clone());
    let created = create
        .execute(CreateRoomInput {
            player_id: "host".to_string(),
            nick_name: "Host".to_string(),
            avatar_index: 0,
            config: RoomConfig::default(),
        })
        .await
        .unwrap();

    let join = JoinRoom::new(repo.clone());
    let joined = join
        .execute(JoinRoomInput {
            player_id: "guest".to_string(),
            room_id: created.room.id.clone(),
            nick_name: "Guest".to_string(),
            avatar_index: 1,
        })
        .await
        .unwrap();
    assert_eq!(joined.room.players.len(), 2);

    let leave = LeaveRoom::new(repo.clone());
    let outcome = leave
        .execute(LeaveRoomInput { player_id: "guest".to_string(), is_admin: false })
        .await
        .unwrap();
    match outcome {
        LeaveRoomOutcome::RoomUpdated { room, .. } => assert_eq!(room.players.len(), 1),
        LeaveRoomOutcome::RoomDestroyed { .. } => panic!("expected the room to survive one player leaving"),
    }

    let leave_host = leave
        .execute(LeaveRoomInput { player_id: "host".to_string(), is_admin: true })
        .await
        .unwrap();
    assert!(matches!(leave_host, LeaveRoomOutcome::RoomDestroyed { .. }));
    assert!(repo.find_room(&created.room.id).await.unwrap().is_none());
}
