//! Exercises the room actor/manager wiring end to end: a lobby command
//! spawns a room's actor, later commands route to it by `room_id` or by
//! the player's last-known room, and the room is torn down once empty
//! (spec.md §5 Concurrency & resource model).

use std::sync::Arc;
use std::time::Duration;

use yaniv_core::api::{InboundCommand, OutboundEvent};
use yaniv_core::infrastructure::repositories::InMemoryRoomRepository;
use yaniv_core::infrastructure::RoomManager;

#[tokio::test]
async fn commands_route_through_the_spawned_room_actor() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let (broadcaster, _receiver) = async_broadcast::broadcast(1000);
    let manager = RoomManager::new(repo, broadcaster);

    let created = manager
        .dispatch(
            "host".to_string(),
            InboundCommand::CreateRoom {
                nick_name: "Host".to_string(),
                avatar_index: 0,
                config: Default::default(),
            },
        )
        .await
        .unwrap();
    let room_id = match &created[0].event {
        OutboundEvent::RoomCreated { room } => room.id.clone(),
        other => panic!("expected room_created, got {other:?}"),
    };

    let joined = manager
        .dispatch(
            "guest".to_string(),
            InboundCommand::JoinRoom { room_id: room_id.clone(), nick_name: "Guest".to_string(), avatar_index: 1 },
        )
        .await
        .unwrap();
    match &joined[0].event {
        OutboundEvent::PlayerJoined { room } => assert_eq!(room.players.len(), 2),
        other => panic!("expected player_joined, got {other:?}"),
    }

    // `leave_room` carries no room_id — routed via the player_rooms map.
    let left = manager.dispatch("guest".to_string(), InboundCommand::LeaveRoom { is_admin: false }).await.unwrap();
    match &left[0].event {
        OutboundEvent::PlayerLeft { room: Some(room), .. } => assert_eq!(room.players.len(), 1),
        other => panic!("expected player_left with a surviving room, got {other:?}"),
    }

    let host_left =
        manager.dispatch("host".to_string(), InboundCommand::LeaveRoom { is_admin: true }).await.unwrap();
    assert!(matches!(host_left[0].event, OutboundEvent::PlayerLeft { room: None, .. }));

    // Room actor has torn down; routing against it now fails instead of
    // silently reusing a stale mapping.
    let err = manager
        .dispatch("host".to_string(), InboundCommand::GetRoomState { room_id: room_id.clone() })
        .await
        .unwrap_err();
    assert!(err.contains("room"));
}

#[tokio::test]
async fn events_fan_out_to_every_subscriber() {
    let repo = Arc::new(InMemoryRoomRepository::new());
    let (broadcaster, _receiver) = async_broadcast::broadcast(1000);
    let manager = RoomManager::new(repo, broadcaster);
    let mut subscriber = manager.subscribe();

    manager
        .dispatch(
            "host".to_string(),
            InboundCommand::CreateRoom {
                nick_name: "Host".to_string(),
                avatar_index: 0,
                config: Default::default(),
            },
        )
        .await
        .unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), subscriber.recv())
        .await
        .expect("event should arrive before the timeout")
        .expect("broadcast channel should still be open");
    assert!(matches!(event.event, OutboundEvent::RoomCreated { .. }));
}
