use super::*;

const EPS: f64 = 1e-12;

fn wait(d: f64) -> Directive {
    Directive::wait(d).unwrap()
}

#[test]
fn sequential_total_is_sum_of_children() {
    let d = Directive::sequential(vec![wait(0.5), wait(1.25), wait(0.0), wait(2.0)]).unwrap();
    assert!((d.duration() - 3.75).abs() < EPS);
}

#[test]
fn parallel_lag_places_children_proportionally() {
    let children = vec![wait(1.0), wait(1.0), wait(1.0)];
    assert_eq!(lagged_starts(&children, 0.5), vec![0.0, 0.5, 1.0]);
    let d = Directive::parallel(children, 0.5).unwrap();
    assert!((d.duration() - 2.0).abs() < EPS);
}

#[test]
fn parallel_without_lag_lasts_as_long_as_longest_child() {
    let d = Directive::parallel(vec![wait(0.3), wait(2.0), wait(1.0)], 0.0).unwrap();
    assert!((d.duration() - 2.0).abs() < EPS);
}

#[test]
fn parallel_full_lag_chains_uneven_children() {
    let children = vec![wait(0.2), wait(0.3), wait(0.1), wait(0.3), wait(0.1)];
    let starts = lagged_starts(&children, 1.0);
    let expected = [0.0, 0.2, 0.5, 0.6, 0.9];
    for (s, e) in starts.iter().zip(expected) {
        assert!((s - e).abs() < EPS);
    }
    let d = Directive::parallel(children, 1.0).unwrap();
    assert!((d.duration() - 1.0).abs() < EPS);
}

#[test]
fn invalid_inputs_are_rejected() {
    let is_directive_err =
        |r: KineResult<Directive>| matches!(r, Err(KineError::InvalidDirective(_)));
    assert!(is_directive_err(Directive::wait(-0.1)));
    assert!(is_directive_err(Directive::wait(f64::NAN)));
    assert!(is_directive_err(Directive::appear(NodeId(0), f64::INFINITY, RevealMode::Fade)));
    assert!(is_directive_err(Directive::sequential(vec![])));
    assert!(is_directive_err(Directive::parallel(vec![], 0.0)));
    assert!(is_directive_err(Directive::parallel(vec![wait(1.0)], 1.5)));
    assert!(is_directive_err(Directive::parallel(vec![wait(1.0)], -0.1)));
    assert!(is_directive_err(Directive::moving(
        NodeId(0),
        Point::new(f64::NAN, 0.0),
        Point::ORIGIN,
        1.0
    )));
    assert!(is_directive_err(Directive::tween(
        NodeId(0),
        Tween::FillOpacity { from: 0.0, to: 2.0 },
        1.0
    )));
    assert!(is_directive_err(Directive::stretch(wait(0.0), 1.0)));
}

#[test]
fn stretch_reports_run_time() {
    let inner = Directive::sequential(vec![wait(0.5), wait(1.5)]).unwrap();
    let d = Directive::stretch(inner, 1.0).unwrap();
    assert_eq!(d.duration(), 1.0);
    assert!(Directive::stretch(wait(0.0), 0.0).is_ok());
}

#[test]
fn leaf_defaults_and_overrides() {
    let m = Directive::moving(NodeId(1), Point::ORIGIN, Point::new(1.0, 0.0), 1.0).unwrap();
    assert!(matches!(m.kind(), DirectiveKind::Move { ease: Ease::Linear, .. }));
    let a = Directive::appear(NodeId(1), 1.0, RevealMode::Fade)
        .unwrap()
        .with_ease(Ease::InOutCubic)
        .with_mode(RevealMode::Write);
    assert!(matches!(
        a.kind(),
        DirectiveKind::Appear {
            ease: Ease::InOutCubic,
            mode: RevealMode::Write,
            ..
        }
    ));
    assert_eq!(wait(1.0).with_ease(Ease::Smooth), wait(1.0));
}
