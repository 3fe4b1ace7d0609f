use super::*;
use crate::foundation::core::Rgba;
use crate::scene::node::{SceneNode, Shape, Style};

fn square(g: &mut SceneGraph, at: Point) -> NodeId {
    g.insert(
        SceneNode::new(
            Shape::Rect {
                width: 1.0,
                height: 1.0,
            },
            Style::SHAPE,
        )
        .at(at),
    )
}

fn wait(d: f64) -> Directive {
    Directive::wait(d).unwrap()
}

#[test]
fn compile_assigns_absolute_starts_in_tree_order() {
    let (a, b) = (NodeId(0), NodeId(1));
    let d = Directive::sequential(vec![
        Directive::appear(a, 1.0, RevealMode::Fade).unwrap(),
        wait(0.5),
        Directive::parallel(
            vec![
                Directive::disappear(a, 1.0).unwrap(),
                Directive::appear(b, 1.0, RevealMode::Create).unwrap(),
            ],
            0.5,
        )
        .unwrap(),
    ])
    .unwrap();
    let tl = Timeline::compile(&d);
    let starts: Vec<f64> = tl.entries().iter().map(|e| e.start).collect();
    assert_eq!(starts, vec![0.0, 1.5, 2.0]);
    assert_eq!(tl.total(), 3.0);
    assert!(tl.entries().iter().all(|e| e.state() == EntryState::Pending));
}

#[test]
fn stretch_rescales_nested_windows() {
    let d = Directive::stretch(
        Directive::sequential(vec![
            Directive::appear(NodeId(0), 1.0, RevealMode::Fade).unwrap(),
            wait(2.0),
            Directive::disappear(NodeId(0), 1.0).unwrap(),
        ])
        .unwrap(),
        2.0,
    )
    .unwrap();
    let tl = Timeline::compile(&d);
    let e = tl.entries();
    assert_eq!((e[0].start, e[0].duration), (0.0, 0.5));
    assert_eq!((e[1].start, e[1].duration), (1.5, 0.5));
    assert_eq!(tl.total(), 2.0);
}

#[test]
fn overlapping_writes_to_related_nodes_are_rejected() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    let grp = g.group(&[a]).unwrap();
    let other = square(&mut g, Point::new(3.0, 0.0));

    let clash = Directive::parallel(
        vec![
            Directive::moving(a, Point::ORIGIN, Point::new(1.0, 0.0), 1.0).unwrap(),
            Directive::disappear(grp, 1.0).unwrap(),
        ],
        0.5,
    )
    .unwrap();
    let err = Timeline::compile(&clash).check(&g).unwrap_err();
    assert!(matches!(err, KineError::InvalidDirective(_)));

    let fine = Directive::parallel(
        vec![
            Directive::moving(a, Point::ORIGIN, Point::new(1.0, 0.0), 1.0).unwrap(),
            Directive::disappear(other, 1.0).unwrap(),
            Directive::appear(grp, 0.0, RevealMode::Fade).unwrap(),
        ],
        0.0,
    )
    .unwrap();
    Timeline::compile(&fine).check(&g).unwrap();

    let chained = Directive::parallel(
        vec![
            Directive::appear(a, 1.0, RevealMode::Fade).unwrap(),
            Directive::disappear(a, 1.0).unwrap(),
        ],
        1.0,
    )
    .unwrap();
    Timeline::compile(&chained).check(&g).unwrap();
}

#[test]
fn unknown_or_unpositioned_targets_are_rejected() {
    let mut g = SceneGraph::new();
    let empty = g.group(&[]).unwrap();
    let d = Directive::appear(NodeId(42), 1.0, RevealMode::Fade).unwrap();
    assert!(Timeline::compile(&d).check(&g).is_err());
    let d = Directive::moving(empty, Point::ORIGIN, Point::ORIGIN, 1.0).unwrap();
    assert!(Timeline::compile(&d).check(&g).is_err());
}

#[test]
fn advance_walks_entries_through_their_states() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    let d = Directive::sequential(vec![
        Directive::appear(a, 1.0, RevealMode::Fade)
            .unwrap()
            .with_ease(Ease::Linear),
        Directive::moving(a, Point::ORIGIN, Point::new(4.0, 0.0), 2.0).unwrap(),
    ])
    .unwrap();
    let mut tl = Timeline::compile(&d);

    assert_eq!(tl.advance(&mut g, 0.0).unwrap(), 0);
    assert!(g.is_shown(a));
    assert_eq!(g.get(a).unwrap().emphasis(), 0.0);
    assert_eq!(tl.entries()[0].state(), EntryState::Active);
    assert_eq!(tl.entries()[1].state(), EntryState::Pending);

    tl.advance(&mut g, 0.5).unwrap();
    assert_eq!(g.get(a).unwrap().emphasis(), 0.5);

    assert_eq!(tl.advance(&mut g, 2.0).unwrap(), 1);
    assert_eq!(g.get(a).unwrap().emphasis(), 1.0);
    assert_eq!(g.center(a), Some(Point::new(2.0, 0.0)));

    assert_eq!(tl.finish(&mut g).unwrap(), 1);
    assert!(tl.is_finished());
    assert_eq!(g.center(a), Some(Point::new(4.0, 0.0)));
}

#[test]
fn zero_duration_entries_apply_end_state_at_start() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    let d = Directive::sequential(vec![
        wait(1.0),
        Directive::appear(a, 0.0, RevealMode::Fade).unwrap(),
        wait(1.0),
    ])
    .unwrap();
    let mut tl = Timeline::compile(&d);
    tl.advance(&mut g, 0.5).unwrap();
    assert!(!g.is_shown(a));
    assert_eq!(tl.advance(&mut g, 1.0).unwrap(), 1);
    assert!(g.is_shown(a));
    assert_eq!(g.get(a).unwrap().emphasis(), 1.0);
}

#[test]
fn disappear_leaves_stage_and_tween_reaches_target_value() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    g.show(a).unwrap();
    let d = Directive::parallel(
        vec![
            Directive::tween(
                a,
                Tween::StrokeColor {
                    from: Rgba::WHITE,
                    to: Rgba::BLUE,
                },
                1.0,
            )
            .unwrap(),
            Directive::disappear(a, 1.0).unwrap(),
        ],
        1.0,
    )
    .unwrap();
    let mut tl = Timeline::compile(&d);
    tl.check(&g).unwrap();
    tl.finish(&mut g).unwrap();
    assert_eq!(g.get(a).unwrap().style().stroke_color, Rgba::BLUE);
    assert!(!g.is_shown(a));
    assert_eq!(g.get(a).unwrap().emphasis(), 0.0);
}

#[test]
fn disappearing_a_group_member_takes_only_it_off_stage() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    let b = square(&mut g, Point::new(2.0, 0.0));
    let grp = g.group(&[a, b]).unwrap();
    g.show(grp).unwrap();

    let mut tl = Timeline::compile(&Directive::disappear(a, 1.0).unwrap());
    tl.check(&g).unwrap();
    tl.finish(&mut g).unwrap();
    assert!(!g.is_shown(a));
    assert!(g.is_shown(b));
    assert_eq!(g.stage(), &[b]);
}

#[test]
fn move_without_start_begins_where_the_node_is() {
    let mut g = SceneGraph::new();
    let a = square(&mut g, Point::ORIGIN);
    let d = Directive::sequential(vec![
        Directive::move_to(a, Point::new(2.0, 0.0), 1.0).unwrap(),
        Directive::move_to(a, Point::new(2.0, 2.0), 1.0).unwrap(),
    ])
    .unwrap();
    let mut tl = Timeline::compile(&d);
    tl.check(&g).unwrap();
    tl.advance(&mut g, 1.0).unwrap();
    assert_eq!(g.center(a), Some(Point::new(2.0, 0.0)));
    tl.advance(&mut g, 1.5).unwrap();
    assert_eq!(g.center(a), Some(Point::new(2.0, 1.0)));
}
