use super::*;

#[test]
fn builtin_modes_are_listed_first_in_order() {
    let registry = ModeRegistry::with_builtin_modes(RoomPolicy::Required);
    let ids: Vec<&str> = registry
        .list_modes()
        .iter()
        .map(|mode| mode.id.as_str())
        .collect();
    assert_eq!(ids, ["meal", "sleep", "study"]);
    assert!(registry.list_modes().iter().all(|mode| mode.room.is_none()));
}

#[test]
fn created_mode_is_appended_last_with_derived_id() {
    let mut registry = ModeRegistry::new(RoomPolicy::Required);
    registry.append_mode(builtin_modes().remove(1));

    let mode = registry
        .create_mode("Yemek", Some(RoomId(1)), RgbColor::new(255, 200, 100), 0.8)
        .expect("create mode");
    registry.append_mode(mode);

    let last = registry.list_modes().last().expect("non-empty");
    assert_eq!(last.id.as_str(), "yemek");
    assert_eq!(last.name, "Yemek");
    assert_eq!(last.color, "rgb(255, 200, 100)");
    assert_eq!(last.room, Some(RoomId(1)));
    assert_eq!(last.brightness, 0.8);
}

#[test]
fn create_rejects_blank_names() {
    let registry = ModeRegistry::new(RoomPolicy::Required);
    for name in ["", "   ", "\t\n"] {
        assert_eq!(
            registry.create_mode(name, Some(RoomId(1)), RgbColor::default(), 1.0),
            Err(ValidationError::EmptyModeName)
        );
    }
}

#[test]
fn room_policy_decides_whether_unbound_modes_are_allowed() {
    let required = ModeRegistry::new(RoomPolicy::Required);
    assert_eq!(
        required.create_mode("Study", None, RgbColor::default(), 1.0),
        Err(ValidationError::RoomRequired)
    );

    let optional = ModeRegistry::new(RoomPolicy::Optional);
    let mode = optional
        .create_mode("Study", None, RgbColor::default(), 1.0)
        .expect("unbound mode");
    assert_eq!(mode.room, None);
}

#[test]
fn create_rejects_ids_that_normalize_to_an_existing_one() {
    let mut registry = ModeRegistry::new(RoomPolicy::Required);
    let first = registry
        .create_mode("Movie Night", Some(RoomId(3)), RgbColor::default(), 1.0)
        .expect("first");
    registry.append_mode(first);

    assert_eq!(
        registry.create_mode("movie   NIGHT", Some(RoomId(3)), RgbColor::default(), 1.0),
        Err(ValidationError::DuplicateModeId("movie_night".into()))
    );
}

#[test]
fn append_does_not_deduplicate() {
    let mut registry = ModeRegistry::with_builtin_modes(RoomPolicy::Required);
    let meal = registry.list_modes()[0].clone();
    registry.append_mode(meal);
    assert_eq!(registry.list_modes().len(), 4);
    assert_eq!(registry.find_by_key("yemek").map(|m| m.id.as_str()), Some("meal"));
}
