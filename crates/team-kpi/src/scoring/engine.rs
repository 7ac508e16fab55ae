use super::domain::{
    validate_threshold, validate_weight, InvalidMetricInput, MetricDirection, MetricInput,
    MetricScore,
};

/// Rounds to two decimal places, half away from zero. This is the single
/// rounding primitive used at every persistence-time rounding site (percent,
/// weighted score, period total, multi-period mean); intermediate values stay
/// at full precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn validate(input: &MetricInput) -> Result<(), InvalidMetricInput> {
    if !input.fact.is_finite() || input.fact < 0.0 {
        return Err(InvalidMetricInput::Fact(input.fact));
    }
    if !input.goal.is_finite() || input.goal < 0.0 {
        return Err(InvalidMetricInput::Goal(input.goal));
    }
    validate_weight(input.weight)?;
    validate_threshold(input.threshold)
}

/// Achievement percentage for a single measurement.
///
/// Assumes the validated input domain (`fact`, `goal` finite and non-negative,
/// `threshold` within `[0, 100]` when present); [`score_metric`] enforces it.
pub fn score_percent(input: &MetricInput) -> f64 {
    match input.direction {
        MetricDirection::Negative => {
            // Zero defects is always a perfect score, whatever the goal.
            if input.fact == 0.0 {
                return 100.0;
            }
            // Defects occurred with no baseline to compare against.
            if input.goal == 0.0 {
                return 0.0;
            }

            let fact_percent = input.fact / input.goal * 100.0;
            let threshold = input.threshold.unwrap_or(0.0);

            if fact_percent <= threshold {
                return 100.0;
            }
            if threshold >= 100.0 {
                return 0.0;
            }

            // Linear decay from 100 at the threshold down to 0 at
            // fact_percent = 100, clamped beyond that.
            (100.0 - (fact_percent - threshold) / (100.0 - threshold) * 100.0).max(0.0)
        }
        MetricDirection::Positive => {
            // No target was set; treat as fully met.
            if input.goal == 0.0 {
                100.0
            } else {
                // Unbounded above: overperformance yields >100.
                input.fact / input.goal * 100.0
            }
        }
    }
}

/// Weighted contribution of a metric to the employee's period total. The
/// engine performs no clamping here; weight is a configuration-supplied
/// fraction.
pub fn weighted_score(percent: f64, weight: f64) -> f64 {
    percent * weight
}

/// Validates the measurement, scores it, and rounds both outputs to two
/// decimals. The weighted score is computed from the unrounded percent so the
/// two roundings stay independent.
pub fn score_metric(input: &MetricInput) -> Result<MetricScore, InvalidMetricInput> {
    validate(input)?;

    let percent = score_percent(input);
    let weighted = weighted_score(percent, input.weight);

    Ok(MetricScore {
        fact: input.fact,
        goal: input.goal,
        percent: round2(percent),
        weighted_score: round2(weighted),
    })
}
