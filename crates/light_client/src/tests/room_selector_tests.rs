use super::*;
use shared::domain::{default_rooms, ModeId};

fn mode(room: Option<u32>) -> Mode {
    Mode {
        id: ModeId("sleep".into()),
        name: "Uyku".into(),
        color: "rgb(100, 100, 255)".into(),
        room: room.map(RoomId),
        brightness: 1.0,
    }
}

#[test]
fn bound_mode_resolves_without_prompting() {
    let mut selector = RoomSelector::new(default_rooms());
    let request = selector
        .request_room(PendingAction::ApplyMode(mode(Some(3))))
        .expect("request");

    match request {
        RoomRequest::Resolved { room, action } => {
            assert_eq!(room.id, RoomId(3));
            assert_eq!(action, PendingAction::ApplyMode(mode(Some(3))));
        }
        RoomRequest::Awaiting => panic!("bound mode should not prompt"),
    }
    assert_eq!(selector.state(), &SelectorState::Idle);
}

#[test]
fn unbound_action_waits_for_choice() {
    let mut selector = RoomSelector::new(default_rooms());
    let request = selector
        .request_room(PendingAction::Toggle { on: true })
        .expect("request");
    assert_eq!(request, RoomRequest::Awaiting);
    assert_eq!(
        selector.pending_action(),
        Some(&PendingAction::Toggle { on: true })
    );

    let (room, action) = selector.choose_room(RoomId(2)).expect("choose");
    assert_eq!(room.name, "Oda 2");
    assert_eq!(action, PendingAction::Toggle { on: true });
    assert!(!selector.is_awaiting());
}

#[test]
fn cancel_discards_pending_action() {
    let mut selector = RoomSelector::new(default_rooms());
    selector
        .request_room(PendingAction::ApplyMode(mode(None)))
        .expect("request");

    assert_eq!(
        selector.cancel(),
        Some(PendingAction::ApplyMode(mode(None)))
    );
    assert_eq!(selector.cancel(), None);
    assert_eq!(
        selector.choose_room(RoomId(1)),
        Err(ValidationError::NoPendingRoomChoice)
    );
}

#[test]
fn latest_request_replaces_pending_one() {
    let mut selector = RoomSelector::new(default_rooms());
    selector
        .request_room(PendingAction::Toggle { on: false })
        .expect("toggle");
    selector
        .request_room(PendingAction::CreateMode {
            name: "Evening".into(),
        })
        .expect("create");

    let (_, action) = selector.choose_room(RoomId(4)).expect("choose");
    assert_eq!(
        action,
        PendingAction::CreateMode {
            name: "Evening".into()
        }
    );
}

#[test]
fn unknown_room_keeps_request_pending() {
    let mut selector = RoomSelector::new(default_rooms());
    selector
        .request_room(PendingAction::Toggle { on: true })
        .expect("request");

    assert_eq!(
        selector.choose_room(RoomId(9)),
        Err(ValidationError::UnknownRoom(RoomId(9)))
    );
    assert!(selector.is_awaiting());
}

#[test]
fn mode_bound_to_unknown_room_is_rejected() {
    let mut selector = RoomSelector::new(default_rooms());
    assert_eq!(
        selector.request_room(PendingAction::ApplyMode(mode(Some(7)))),
        Err(ValidationError::UnknownRoom(RoomId(7)))
    );
}
