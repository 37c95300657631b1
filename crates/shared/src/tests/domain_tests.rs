use super::*;
use crate::protocol::{LightCommand, LightState};

#[test]
fn mode_id_lowercases_and_collapses_whitespace() {
    assert_eq!(ModeId::from_name("Yemek").as_str(), "yemek");
    assert_eq!(ModeId::from_name("Movie  Night\tTime").as_str(), "movie_night_time");
}

#[test]
fn unit_channels_round_to_wire_bytes() {
    let color = RgbColor::from_unit(1.0, 0.5, 0.0);
    assert_eq!(color, RgbColor::new(255, 128, 0));

    let clamped = RgbColor::from_unit(1.7, -0.2, f64::NAN);
    assert_eq!(clamped, RgbColor::new(255, 0, 0));
}

#[test]
fn decoded_color_reencodes_within_one_step() {
    for (r, g, b) in [(0.1, 0.2, 0.3), (0.999, 0.001, 0.5), (0.33, 0.66, 0.99)] {
        let wire = RgbColor::from_unit(r, g, b);
        let decoded: RgbColor = wire.to_string().parse().expect("parse");
        assert_eq!(decoded, wire);

        let (ur, ug, ub) = decoded.to_unit();
        for (original, roundtrip) in [(r, ur), (g, ug), (b, ub)] {
            assert!((original - roundtrip).abs() <= 1.0 / 255.0);
        }
        assert_eq!(RgbColor::from_unit(ur, ug, ub), wire);
    }
}

#[test]
fn color_string_formats_like_css_rgb() {
    assert_eq!(RgbColor::new(255, 200, 100).to_string(), "rgb(255, 200, 100)");
}

#[test]
fn color_parse_rejects_short_and_out_of_range_input() {
    assert_eq!(
        "rgb(10, 20)".parse::<RgbColor>(),
        Err(ColorParseError::MissingComponents("rgb(10, 20)".into()))
    );
    assert!(matches!(
        "rgb(10, 20, 300)".parse::<RgbColor>(),
        Err(ColorParseError::ComponentOutOfRange { value: 300, .. })
    ));
    assert_eq!("10,20,30".parse::<RgbColor>(), Ok(RgbColor::new(10, 20, 30)));
}

#[test]
fn command_serializes_to_endpoint_shape() {
    let command = LightCommand::new(
        LightState::On,
        RgbColor::new(255, 0, 0),
        0.5,
        RoomId(2),
    );
    let value = serde_json::to_value(&command).expect("serialize");
    assert_eq!(
        value,
        serde_json::json!({
            "state": "on",
            "red": 255,
            "green": 0,
            "blue": 0,
            "brightness": 0.5,
            "room": 2
        })
    );
}

#[test]
fn mode_without_brightness_defaults_to_full() {
    let mode: Mode = serde_json::from_str(
        r#"{"id":"sleep","name":"Uyku","color":"rgb(100, 100, 255)"}"#,
    )
    .expect("deserialize");
    assert_eq!(mode.room, None);
    assert_eq!(mode.brightness, 1.0);
    assert_eq!(mode.decode_color(), Ok(RgbColor::new(100, 100, 255)));
}

#[test]
fn default_rooms_are_oda_one_through_four() {
    let rooms = default_rooms();
    let names: Vec<&str> = rooms.iter().map(|room| room.name.as_str()).collect();
    assert_eq!(names, ["Oda 1", "Oda 2", "Oda 3", "Oda 4"]);
    assert_eq!(rooms[3].id, RoomId(4));
}
