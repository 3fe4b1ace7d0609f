use super::*;
use crate::{
    config::Quality,
    encode::sink::InMemorySink,
    foundation::core::Point,
    scene::node::{RevealMode, SceneNode, Shape, Style},
};

fn medium() -> RenderConfig {
    RenderConfig {
        quality: Quality::Medium,
        ..RenderConfig::default()
    }
}

fn dot(scene: &mut Scene<InMemorySink>) -> crate::scene::node::NodeId {
    scene
        .graph_mut()
        .insert(SceneNode::new(Shape::Circle { radius: 0.1 }, Style::SHAPE))
}

#[test]
fn play_emits_rounded_frame_count_and_advances_clock() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    let r1 = scene
        .play(&Directive::appear(a, 1.0, RevealMode::Fade).unwrap())
        .unwrap();
    assert_eq!(r1.frames, 30);
    assert_eq!(r1.first_frame, FrameIndex(0));
    assert_eq!(r1.end_secs, 1.0);

    let r2 = scene.wait(0.1 + 0.2).unwrap();
    assert_eq!(r2.frames, 9);
    assert_eq!(r2.first_frame, FrameIndex(30));
    assert_eq!(r2.index, 1);
    assert_eq!(scene.next_frame(), FrameIndex(39));

    let sink = scene.finish().unwrap();
    assert!(sink.is_ended());
    let idx: Vec<u64> = sink.frames().iter().map(|f| f.index.0).collect();
    assert_eq!(idx, (0..39).collect::<Vec<_>>());
}

#[test]
fn unaligned_plays_do_not_drift() {
    let cfg = RenderConfig {
        fps: Some(15),
        ..medium()
    };
    let mut scene = Scene::new(cfg, InMemorySink::new()).unwrap();
    let mut prev_end = 0.0;
    for _ in 0..12 {
        let r = scene.wait(0.49).unwrap();
        assert_eq!(r.start_secs, prev_end);
        prev_end = r.end_secs;
        // Each play ends on the frame nearest its scripted end.
        assert!((scene.time_secs() - r.end_secs).abs() <= 0.5 / 15.0 + 1e-9);
    }
    assert!((scene.elapsed_secs() - 5.88).abs() < 1e-9);
    // 5.88 s at 15 fps is 88.2 ticks; per-play rounding alone would give 12 * 7 = 84.
    assert_eq!(scene.next_frame(), FrameIndex(88));
}

#[test]
fn play_starting_between_frames_samples_from_its_own_start() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    scene.graph_mut().show(a).unwrap();
    scene.wait(0.01).unwrap();
    let r = scene
        .play(&Directive::moving(a, Point::ORIGIN, Point::new(1.0, 0.0), 1.0).unwrap())
        .unwrap();
    assert_eq!(r.first_frame, FrameIndex(1));
    assert_eq!(r.frames, 29);
    let sink = scene.finish().unwrap();
    let first = sink.frames()[1].node(a).unwrap().center.x;
    // Frame 1 is at 1/30 s, 0.0233 s into the move.
    assert!((first - (1.0 / 30.0 - 0.01)).abs() < 1e-9);
}

#[test]
fn frames_sample_local_time_and_play_ends_in_end_state() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    scene.graph_mut().show(a).unwrap();
    let d = Directive::moving(a, Point::ORIGIN, Point::new(3.0, 0.0), 1.0).unwrap();
    scene.play(&d).unwrap();
    let end = scene.graph().center(a).unwrap();
    assert!((end.x - 3.0).abs() < 1e-9 && end.y.abs() < 1e-9);

    let sink = scene.finish().unwrap();
    let frames = sink.frames();
    assert_eq!(frames.len(), 30);
    assert!(frames[0].node(a).unwrap().center.x.abs() < 1e-12);
    let mid = frames[15].node(a).unwrap().center;
    assert!((mid.x - 1.5).abs() < 1e-9);
    assert!((frames[15].time_secs - 0.5).abs() < 1e-12);
}

#[test]
fn zero_length_play_emits_nothing_but_applies() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    let r = scene
        .play(&Directive::appear(a, 0.0, RevealMode::Fade).unwrap())
        .unwrap();
    assert_eq!(r.frames, 0);
    assert!(scene.graph().is_shown(a));
}

#[test]
fn tiny_positive_play_emits_one_frame() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    assert_eq!(scene.wait(0.001).unwrap().frames, 1);
}

#[test]
fn conflicting_play_is_rejected_before_any_frame() {
    let mut scene = Scene::new(medium(), InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    let d = Directive::parallel(
        vec![
            Directive::appear(a, 1.0, RevealMode::Fade).unwrap(),
            Directive::moving(a, Point::ORIGIN, Point::new(1.0, 1.0), 1.0).unwrap(),
        ],
        0.0,
    )
    .unwrap();
    assert!(scene.play(&d).is_err());
    assert_eq!(scene.next_frame(), FrameIndex(0));
    assert!(!scene.graph().is_shown(a));
}

#[test]
fn final_hold_repeats_last_state() {
    let cfg = RenderConfig {
        final_hold_secs: 0.5,
        ..medium()
    };
    let mut scene = Scene::new(cfg, InMemorySink::new()).unwrap();
    let a = dot(&mut scene);
    scene
        .play(&Directive::appear(a, 0.0, RevealMode::Fade).unwrap())
        .unwrap();
    let sink = scene.finish().unwrap();
    assert_eq!(sink.frames().len(), 15);
    assert!(sink.frames().iter().all(|f| f.node(a).unwrap().emphasis == 1.0));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = RenderConfig {
        fps: Some(0),
        ..RenderConfig::default()
    };
    assert!(Scene::new(cfg, InMemorySink::new()).is_err());
}
