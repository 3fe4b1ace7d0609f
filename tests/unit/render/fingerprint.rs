use super::*;
use crate::foundation::core::FrameIndex;
use crate::scene::{graph::SceneGraph, node::SceneNode};

fn frame_with(emphasis: f64) -> Frame {
    let mut g = SceneGraph::new();
    let a = g.insert(SceneNode::new(Shape::Circle { radius: 1.0 }, Style::SHAPE));
    g.show(a).unwrap();
    g.set_emphasis(a, emphasis, RevealMode::Fade).unwrap();
    Frame::capture(&g, FrameIndex(3), 0.1).unwrap()
}

#[test]
fn equal_frames_fingerprint_equal() {
    assert_eq!(
        fingerprint_frame(&frame_with(0.5)),
        fingerprint_frame(&frame_with(0.5))
    );
}

#[test]
fn any_value_change_changes_fingerprint() {
    let base = fingerprint_frame(&frame_with(0.5));
    assert_ne!(base, fingerprint_frame(&frame_with(0.5000001)));

    let mut moved = frame_with(0.5);
    moved.nodes[0].center.x += 1e-12;
    assert_ne!(base, fingerprint_frame(&moved));

    let mut later = frame_with(0.5);
    later.index = FrameIndex(4);
    assert_ne!(base, fingerprint_frame(&later));
}

#[test]
fn halves_are_independent_streams() {
    let fp = fingerprint_frame(&frame_with(1.0));
    assert_ne!(fp.hi, fp.lo);
    assert_eq!(fp.to_string().len(), 32);
}
