use crate::scoring::{MetricDirection, MetricInput};

pub(super) fn positive(fact: f64, goal: f64, weight: f64) -> MetricInput {
    MetricInput {
        fact,
        goal,
        direction: MetricDirection::Positive,
        weight,
        threshold: None,
    }
}

pub(super) fn negative(fact: f64, goal: f64, weight: f64, threshold: Option<f64>) -> MetricInput {
    MetricInput {
        fact,
        goal,
        direction: MetricDirection::Negative,
        weight,
        threshold,
    }
}
