use super::*;
use crate::scene::node::{SceneNode, Shape, Style};

const EPS: f64 = 1e-9;

fn rect_node(g: &mut SceneGraph, w: f64, h: f64, at: Point) -> NodeId {
    g.insert(SceneNode::new(Shape::Rect { width: w, height: h }, Style::SHAPE).at(at))
}

fn frame() -> Rect {
    Rect::new(-7.0, -4.0, 7.0, 4.0)
}

#[test]
fn grid_of_twelve_squares_matches_expected_extent() {
    let mut g = SceneGraph::new();
    let squares: Vec<NodeId> = (0..12)
        .map(|_| rect_node(&mut g, 0.7, 0.7, Point::ORIGIN))
        .collect();
    let cells = arrange_in_grid(&mut g, &squares, Grid::uniform(3, 4, 0.25)).unwrap();
    assert_eq!(cells.len(), 12);

    let grp = g.group(&squares).unwrap();
    let b = g.bounds(grp).unwrap();
    assert!((b.width() - 3.55).abs() < EPS);
    assert!((b.height() - 2.6).abs() < EPS);

    // Row-major: square 1 is right of square 0, square 4 is below square 0.
    let b0 = g.bounds(squares[0]).unwrap();
    let b1 = g.bounds(squares[1]).unwrap();
    let b4 = g.bounds(squares[4]).unwrap();
    assert!((b1.x0 - b0.x1 - 0.25).abs() < EPS);
    assert!((b0.y0 - b4.y1 - 0.25).abs() < EPS);
    assert!((b0.y0 - b1.y0).abs() < EPS);
}

#[test]
fn grid_rejects_insufficient_capacity() {
    let mut g = SceneGraph::new();
    let nodes: Vec<NodeId> = (0..5)
        .map(|_| rect_node(&mut g, 1.0, 1.0, Point::ORIGIN))
        .collect();
    let err = arrange_in_grid(&mut g, &nodes, Grid::uniform(2, 2, 0.1)).unwrap_err();
    assert!(matches!(err, KineError::Layout(_)));
    assert!(arrange_in_grid(&mut g, &nodes, Grid::uniform(0, 9, 0.1)).is_err());
}

#[test]
fn grid_keeps_previous_center_and_aligns_cells() {
    let mut g = SceneGraph::new();
    let wide = rect_node(&mut g, 2.0, 1.0, Point::new(10.0, 10.0));
    let narrow = rect_node(&mut g, 1.0, 1.0, Point::new(10.0, 10.0));
    let cells = arrange_in_grid(
        &mut g,
        &[wide, narrow],
        Grid::uniform(2, 1, 0.5).cell_alignment(Direction::Left),
    )
    .unwrap();
    assert_eq!(cells[0].width(), 2.0);
    let bw = g.bounds(wide).unwrap();
    let bn = g.bounds(narrow).unwrap();
    assert!((bw.x0 - bn.x0).abs() < EPS);
    assert!((bw.y0 - bn.y1 - 0.5).abs() < EPS);
    let grp = g.group(&[wide, narrow]).unwrap();
    let c = g.center(grp).unwrap();
    assert!((c.x - 10.0).abs() < EPS && (c.y - 10.0).abs() < EPS);
}

#[test]
fn next_to_gap_equals_buffer_in_every_direction() {
    for (dir, start) in [
        (Direction::Right, Point::new(-8.0, 3.0)),
        (Direction::Left, Point::new(5.0, -2.0)),
        (Direction::Up, Point::new(0.3, -9.0)),
        (Direction::Down, Point::new(4.0, 4.0)),
    ] {
        let mut g = SceneGraph::new();
        let b = rect_node(&mut g, 2.0, 3.0, Point::new(1.0, 1.0));
        let a = rect_node(&mut g, 0.5, 0.7, start);
        place_next_to(&mut g, a, b, NextTo::new(dir, 0.4)).unwrap();
        let ra = g.bounds(a).unwrap();
        let rb = g.bounds(b).unwrap();
        let gap = match dir {
            Direction::Right => ra.x0 - rb.x1,
            Direction::Left => rb.x0 - ra.x1,
            Direction::Up => ra.y0 - rb.y1,
            Direction::Down => rb.y0 - ra.y1,
            _ => unreachable!(),
        };
        assert!((gap - 0.4).abs() < EPS, "{dir:?}: gap {gap}");
        // Centered on the orthogonal axis by default.
        match dir {
            Direction::Right | Direction::Left => {
                assert!((ra.center().y - rb.center().y).abs() < EPS)
            }
            _ => assert!((ra.center().x - rb.center().x).abs() < EPS),
        }
    }
}

#[test]
fn next_to_with_aligned_edge_matches_faces() {
    let mut g = SceneGraph::new();
    let b = rect_node(&mut g, 2.0, 3.0, Point::ORIGIN);
    let a = rect_node(&mut g, 1.0, 1.0, Point::new(-3.0, -3.0));
    place_next_to(&mut g, a, b, NextTo::new(Direction::Down, 0.3).aligned(Direction::Left))
        .unwrap();
    let ra = g.bounds(a).unwrap();
    let rb = g.bounds(b).unwrap();
    assert!((ra.x0 - rb.x0).abs() < EPS);
    assert!((rb.y0 - ra.y1 - 0.3).abs() < EPS);
}

#[test]
fn next_to_is_idempotent() {
    let mut g = SceneGraph::new();
    let b = rect_node(&mut g, 1.0, 1.0, Point::ORIGIN);
    let a = rect_node(&mut g, 1.0, 2.0, Point::new(9.0, 9.0));
    let opts = NextTo::new(Direction::Right, 1.5);
    place_next_to(&mut g, a, b, opts).unwrap();
    let first = g.bounds(a).unwrap();
    place_next_to(&mut g, a, b, opts).unwrap();
    assert_eq!(g.bounds(a).unwrap(), first);
}

#[test]
fn next_to_fails_on_unpositioned_or_missing_reference() {
    let mut g = SceneGraph::new();
    let a = rect_node(&mut g, 1.0, 1.0, Point::ORIGIN);
    let empty = g.group(&[]).unwrap();
    let err = place_next_to(&mut g, a, empty, NextTo::default()).unwrap_err();
    assert!(matches!(err, KineError::Layout(_)));
    let err = place_next_to(&mut g, a, NodeId(99), NextTo::default()).unwrap_err();
    assert!(matches!(err, KineError::Layout(_)));
    assert_eq!(g.center(a), Some(Point::ORIGIN));
}

#[test]
fn align_to_keeps_orthogonal_coordinate() {
    let mut g = SceneGraph::new();
    let b = rect_node(&mut g, 2.0, 4.0, Point::new(0.0, 1.0));
    let a = rect_node(&mut g, 1.0, 1.0, Point::new(6.0, -5.0));
    align_to(&mut g, a, b, Direction::Up).unwrap();
    let ra = g.bounds(a).unwrap();
    assert!((ra.y1 - 3.0).abs() < EPS);
    assert!((ra.center().x - 6.0).abs() < EPS);
}

#[test]
fn to_edge_and_corner_respect_frame_buffer() {
    let mut g = SceneGraph::new();
    let a = rect_node(&mut g, 2.0, 1.0, Point::new(1.0, 0.0));
    to_edge(&mut g, a, Direction::Up, 0.5, frame()).unwrap();
    let ra = g.bounds(a).unwrap();
    assert!((ra.y1 - 3.5).abs() < EPS);
    assert!((ra.center().x - 1.0).abs() < EPS);

    to_corner(&mut g, a, Direction::DownLeft, 0.5, frame()).unwrap();
    let ra = g.bounds(a).unwrap();
    assert!((ra.x0 + 6.5).abs() < EPS);
    assert!((ra.y0 + 3.5).abs() < EPS);

    assert!(to_edge(&mut g, a, Direction::UpLeft, 0.5, frame()).is_err());
    assert!(to_corner(&mut g, a, Direction::Up, 0.5, frame()).is_err());
}

#[test]
fn arrange_stacks_with_aligned_edge_without_recentering() {
    let mut g = SceneGraph::new();
    let top = rect_node(&mut g, 3.0, 1.0, Point::new(0.0, 2.0));
    let label = rect_node(&mut g, 1.0, 0.4, Point::new(7.0, 7.0));
    arrange(
        &mut g,
        &[top, label],
        Arrange {
            direction: Direction::Down,
            buffer: 0.3,
            aligned_edge: Some(Direction::Left),
            center: false,
        },
    )
    .unwrap();
    let rt = g.bounds(top).unwrap();
    let rl = g.bounds(label).unwrap();
    assert_eq!(g.center(top), Some(Point::new(0.0, 2.0)));
    assert!((rt.x0 - rl.x0).abs() < EPS);
    assert!((rt.y0 - rl.y1 - 0.3).abs() < EPS);
}

#[test]
fn overlapping_members_are_rejected() {
    let mut g = SceneGraph::new();
    let a = rect_node(&mut g, 1.0, 1.0, Point::ORIGIN);
    let grp = g.group(&[a]).unwrap();
    assert!(arrange(&mut g, &[grp, a], Arrange::default()).is_err());
    assert!(place_next_to(&mut g, grp, a, NextTo::default()).is_err());
}
