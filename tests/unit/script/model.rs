use super::*;

const SMALL: &str = r#"{
  "config": { "quality": "low" },
  "nodes": [
    { "name": "title", "type": "text", "content": "Hello", "scale": 0.8 },
    { "name": "box", "type": "rectangle", "width": 2, "height": 3,
      "style": { "stroke_color": "blue", "stroke_width": 2 } },
    { "name": "both", "type": "group", "children": ["title", "box"] }
  ],
  "layout": [
    { "op": "to_edge", "node": "title", "direction": "up", "buffer": 0.5 },
    { "op": "next_to", "node": "box", "reference": "title", "direction": "down" },
    { "op": "move_to", "node": "both", "to": [1, -1] }
  ],
  "timeline": [
    { "op": "appear", "target": "title", "run_time": 1, "mode": "write" },
    { "op": "parallel", "lag_ratio": 0.5, "steps": [
      { "op": "move", "target": "box", "to": { "node": "title", "anchor": "down" }, "run_time": 1 },
      { "op": "wait", "run_time": 1 }
    ] }
  ]
}"#;

#[test]
fn parses_nodes_layout_and_timeline() {
    let s = SceneScript::from_json_str(SMALL).unwrap();
    assert_eq!(s.config.unwrap().quality, crate::config::Quality::Low);
    assert_eq!(s.nodes.len(), 3);
    assert_eq!(s.nodes[0].scale, Some(0.8));
    assert!(matches!(s.nodes[1].shape, ShapeDef::Rectangle { .. }));
    assert_eq!(s.nodes[1].style.stroke_width, Some(2.0));
    assert!(matches!(
        &s.layout[2],
        LayoutStep::MoveTo {
            to: PositionDef::Coord([1.0, -1.0]),
            ..
        }
    ));
    let StepDef::Parallel { steps, lag_ratio } = &s.timeline[1] else {
        panic!("expected parallel step");
    };
    assert_eq!(*lag_ratio, 0.5);
    assert!(matches!(
        &steps[0],
        StepDef::Move {
            to: PositionDef::Anchor {
                anchor: Direction::Down,
                ..
            },
            from: None,
            ..
        }
    ));
}

#[test]
fn serialization_round_trips() {
    let s = SceneScript::from_json_str(SMALL).unwrap();
    let text = s.to_json_pretty().unwrap();
    assert_eq!(SceneScript::from_json_str(&text).unwrap(), s);
}

#[test]
fn unknown_fields_and_ops_are_rejected() {
    let err = SceneScript::from_json_str(r#"{ "nodez": [] }"#).unwrap_err();
    assert!(matches!(err, KineError::Serde(_)));
    assert!(
        SceneScript::from_json_str(r#"{ "timeline": [ { "op": "explode", "run_time": 1 } ] }"#)
            .is_err()
    );
    assert!(
        SceneScript::from_json_str(
            r#"{ "layout": [ { "op": "shift", "node": "a", "by": [1, 0], "extra": 1 } ] }"#
        )
        .is_err()
    );
}

#[test]
fn anchor_defaults_to_center() {
    let p: PositionDef = serde_json::from_str(r#"{ "node": "box" }"#).unwrap();
    assert_eq!(
        p,
        PositionDef::Anchor {
            node: "box".to_string(),
            anchor: Direction::Center
        }
    );
}

#[test]
fn missing_file_is_a_resource_error() {
    let err = SceneScript::from_json_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, KineError::ResourceLoad(_)));
}
