use super::engine::round2;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An employee's KPI for one reporting period.
///
/// `has_data` distinguishes "no metrics reported yet" from "reported and
/// scored zero"; both carry `total_percent == 0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub total_percent: f64,
    pub has_data: bool,
}

/// Sums `(percent, weight)` pairs for one employee in one period. Summation
/// runs at full precision; only the final total is rounded.
pub fn aggregate_period<I>(scores: I) -> PeriodTotal
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut total = 0.0;
    let mut has_data = false;
    for (percent, weight) in scores {
        total += percent * weight;
        has_data = true;
    }

    PeriodTotal {
        total_percent: round2(total),
        has_data,
    }
}

/// Same total, built from already-weighted contributions, the shape persisted
/// report entries come back in.
pub fn aggregate_weighted<I>(weighted_scores: I) -> PeriodTotal
where
    I: IntoIterator<Item = f64>,
{
    let mut total = 0.0;
    let mut has_data = false;
    for weighted in weighted_scores {
        total += weighted;
        has_data = true;
    }

    PeriodTotal {
        total_percent: round2(total),
        has_data,
    }
}

/// One period's KPI with its inclusive date range, ready for rollup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodScore {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_percent: f64,
}

/// Unweighted mean of the period totals that intersect the containing range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiPeriodKpi {
    pub mean_percent: f64,
    pub periods_count: usize,
}

/// Inclusive range intersection. A week spanning a month boundary counts
/// toward both months.
pub fn ranges_overlap(
    sub_start: NaiveDate,
    sub_end: NaiveDate,
    containing_start: NaiveDate,
    containing_end: NaiveDate,
) -> bool {
    sub_start <= containing_end && sub_end >= containing_start
}

/// Rolls period totals up to a higher-level KPI. Periods outside the
/// containing range are excluded from both numerator and denominator; zero
/// qualifying periods yields a zero mean with `periods_count == 0`.
pub fn rollup_periods(
    scores: &[PeriodScore],
    containing_start: NaiveDate,
    containing_end: NaiveDate,
) -> MultiPeriodKpi {
    let mut sum = 0.0;
    let mut count = 0usize;
    for score in scores {
        if ranges_overlap(
            score.period_start,
            score.period_end,
            containing_start,
            containing_end,
        ) {
            sum += score.total_percent;
            count += 1;
        }
    }

    if count == 0 {
        return MultiPeriodKpi {
            mean_percent: 0.0,
            periods_count: 0,
        };
    }

    MultiPeriodKpi {
        mean_percent: round2(sum / count as f64),
        periods_count: count,
    }
}

/// Monetary equivalent of a KPI percentage, rounded to the nearest whole
/// unit. An unset budget stays `None`; it is never coerced to zero.
pub fn to_money(percent: f64, budget: Option<f64>) -> Option<i64> {
    budget.map(|budget| (budget * percent / 100.0).round() as i64)
}
