use super::common::*;
use crate::scoring::{score_metric, score_percent, InvalidMetricInput};

#[test]
fn positive_metric_with_zero_goal_scores_full() {
    assert_eq!(score_percent(&positive(0.0, 0.0, 0.5)), 100.0);
    assert_eq!(score_percent(&positive(7.0, 0.0, 0.5)), 100.0);
}

#[test]
fn positive_metric_overshoot_is_unbounded() {
    assert_eq!(score_percent(&positive(15.0, 10.0, 0.5)), 150.0);
    assert_eq!(score_percent(&positive(30.0, 10.0, 0.5)), 300.0);
}

#[test]
fn negative_metric_with_zero_fact_is_always_perfect() {
    assert_eq!(score_percent(&negative(0.0, 0.0, 0.2, None)), 100.0);
    assert_eq!(score_percent(&negative(0.0, 10.0, 0.2, None)), 100.0);
    assert_eq!(score_percent(&negative(0.0, 10.0, 0.2, Some(100.0))), 100.0);
}

#[test]
fn negative_metric_with_defects_and_zero_goal_floors_to_zero() {
    assert_eq!(score_percent(&negative(1.0, 0.0, 0.2, None)), 0.0);
    assert_eq!(score_percent(&negative(50.0, 0.0, 0.2, Some(50.0))), 0.0);
}

#[test]
fn negative_metric_at_threshold_scores_full() {
    // fact_percent == threshold exactly
    assert_eq!(score_percent(&negative(2.0, 20.0, 0.2, Some(10.0))), 100.0);
    assert_eq!(score_percent(&negative(1.0, 20.0, 0.2, Some(10.0))), 100.0);
}

#[test]
fn negative_metric_with_degenerate_threshold_zeroes_out() {
    // threshold >= 100 consumes the whole range; any defect scores 0
    assert_eq!(score_percent(&negative(21.0, 20.0, 0.2, Some(100.0))), 0.0);
}

#[test]
fn missing_threshold_behaves_as_zero() {
    let with_zero = score_percent(&negative(3.0, 20.0, 0.2, Some(0.0)));
    let with_none = score_percent(&negative(3.0, 20.0, 0.2, None));
    assert_eq!(with_zero, with_none);
    assert_eq!(with_none, 85.0);
}

#[test]
fn negative_decay_is_monotonic_in_fact() {
    let mut previous = f64::INFINITY;
    for fact in 0..=60 {
        let percent = score_percent(&negative(fact as f64, 20.0, 0.2, Some(10.0)));
        assert!(
            percent <= previous,
            "score increased from {previous} to {percent} at fact {fact}"
        );
        previous = percent;
    }
}

#[test]
fn negative_score_never_drops_below_zero() {
    // fact_percent = 500, far past the 0% point of the decay line
    assert_eq!(score_percent(&negative(100.0, 20.0, 0.2, Some(10.0))), 0.0);
}

#[test]
fn documented_edge_cases_never_error() {
    for input in [
        positive(0.0, 0.0, 0.5),
        negative(0.0, 0.0, 0.2, None),
        negative(5.0, 0.0, 0.2, Some(0.0)),
        negative(5.0, 10.0, 0.2, Some(100.0)),
        negative(2.0, 20.0, 0.2, Some(10.0)),
    ] {
        score_metric(&input).expect("documented edge case must score");
    }
}

#[test]
fn rejects_inputs_outside_the_domain() {
    assert_eq!(
        score_metric(&positive(-1.0, 10.0, 0.5)),
        Err(InvalidMetricInput::Fact(-1.0))
    );
    assert_eq!(
        score_metric(&positive(1.0, -10.0, 0.5)),
        Err(InvalidMetricInput::Goal(-10.0))
    );
    assert_eq!(
        score_metric(&positive(1.0, 10.0, 1.5)),
        Err(InvalidMetricInput::Weight(1.5))
    );
    assert_eq!(
        score_metric(&negative(1.0, 10.0, 0.5, Some(150.0))),
        Err(InvalidMetricInput::Threshold(150.0))
    );
    assert!(score_metric(&positive(f64::NAN, 10.0, 0.5)).is_err());
    assert!(score_metric(&positive(1.0, f64::INFINITY, 0.5)).is_err());
}

#[test]
fn scores_a_typical_positive_metric() {
    let score = score_metric(&positive(8.0, 10.0, 0.5)).expect("valid input");
    assert_eq!(score.percent, 80.0);
    assert_eq!(score.weighted_score, 40.0);
    assert_eq!(score.fact, 8.0);
    assert_eq!(score.goal, 10.0);
}

#[test]
fn scores_a_negative_metric_inside_the_decay_band() {
    // fact_percent = 15, threshold 10: 100 - (5 / 90) * 100 = 94.44...
    let score = score_metric(&negative(3.0, 20.0, 0.2, Some(10.0))).expect("valid input");
    assert_eq!(score.percent, 94.44);
    assert_eq!(score.weighted_score, 18.89);
}
