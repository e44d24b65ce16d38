use serde::{Deserialize, Serialize};

use crate::error::ApibenchError;
use crate::results::RunSummary;

/// Which end of the scale wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Max,
    Min,
}

impl Direction {
    fn prefers(self, candidate: f64, current: f64) -> bool {
        match self {
            Direction::Max => candidate > current,
            Direction::Min => candidate < current,
        }
    }
}

/// Field selector over [`RunSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Rps,
    HttpReqDuration,
    DataSent,
    DataReceived,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Rps => "rps",
            Metric::HttpReqDuration => "http_req_duration",
            Metric::DataSent => "data_sent",
            Metric::DataReceived => "data_received",
        }
    }

    pub fn value_of(self, summary: &RunSummary) -> f64 {
        match self {
            Metric::Rps => summary.rps.value(),
            Metric::HttpReqDuration => summary.http_req_duration.value(),
            Metric::DataSent => summary.data_sent,
            Metric::DataReceived => summary.data_received,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// A non-winning entry and how far behind the winner it is.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry<'a, T> {
    pub item: &'a T,
    /// `|winner − value| / winner × 100`; never negative.
    pub percent_worse: f64,
}

/// Outcome of ranking a collection. `others` keeps input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<'a, T> {
    pub metric: String,
    pub direction: Direction,
    pub winner: &'a T,
    pub winner_index: usize,
    pub others: Vec<RankedEntry<'a, T>>,
}

/// Percentage by which `value` trails `winner`.
pub fn percent_delta(metric: &str, winner: f64, value: f64) -> Result<f64, ApibenchError> {
    if winner == 0.0 {
        return Err(ApibenchError::DivisionByZero {
            metric: metric.to_string(),
        });
    }
    Ok((winner - value).abs() / winner.abs() * 100.0)
}

/// Pick the best of `items` by `value` and compute every other item's
/// percentage delta against it.
///
/// Ties go to the first item encountered. An empty slice is a
/// [`ApibenchError::Validation`] error; a zero-valued winner with anything
/// left to compare is [`ApibenchError::DivisionByZero`].
pub fn rank_by<'a, T, F>(
    items: &'a [T],
    metric: &str,
    direction: Direction,
    value: F,
) -> Result<Ranking<'a, T>, ApibenchError>
where
    F: Fn(&T) -> f64,
{
    let Some(first) = items.first() else {
        return Err(ApibenchError::Validation(format!(
            "nothing to rank by {metric}"
        )));
    };

    let mut winner_index = 0;
    let mut winner_value = value(first);
    for (index, item) in items.iter().enumerate().skip(1) {
        let v = value(item);
        if direction.prefers(v, winner_value) {
            winner_index = index;
            winner_value = v;
        }
    }

    let others = items
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != winner_index)
        .map(|(_, item)| {
            Ok(RankedEntry {
                item,
                percent_worse: percent_delta(metric, winner_value, value(item))?,
            })
        })
        .collect::<Result<Vec<_>, ApibenchError>>()?;

    Ok(Ranking {
        metric: metric.to_string(),
        direction,
        winner: &items[winner_index],
        winner_index,
        others,
    })
}

/// Rank analyzed result files by one of their metrics.
pub fn rank(
    summaries: &[RunSummary],
    metric: Metric,
    direction: Direction,
) -> Result<Ranking<'_, RunSummary>, ApibenchError> {
    rank_by(summaries, metric.name(), direction, |s| metric.value_of(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MetricSummary;

    fn summary(key: &str, duration_ms: f64, rps: f64) -> RunSummary {
        RunSummary {
            key: key.to_string(),
            data_received: 1.0,
            data_sent: 1.0,
            http_req_duration: MetricSummary::Mean(duration_ms),
            rps: MetricSummary::Rate(rps),
        }
    }

    #[test]
    fn fastest_duration_wins_and_deltas_match() {
        let summaries = vec![
            summary("A", 12.5, 10.0),
            summary("B", 8.0, 10.0),
            summary("C", 20.0, 10.0),
        ];

        let ranking = rank(&summaries, Metric::HttpReqDuration, Direction::Min).unwrap();

        assert_eq!(ranking.winner.key, "B");
        assert_eq!(ranking.winner_index, 1);
        assert_eq!(ranking.others.len(), 2);
        assert_eq!(ranking.others[0].item.key, "A");
        assert_eq!(ranking.others[0].percent_worse, 56.25);
        assert_eq!(ranking.others[1].item.key, "C");
        assert_eq!(ranking.others[1].percent_worse, 150.0);
    }

    #[test]
    fn highest_rps_wins() {
        let summaries = vec![
            summary("slow", 1.0, 50.0),
            summary("fast", 1.0, 200.0),
            summary("mid", 1.0, 100.0),
        ];
        let ranking = rank(&summaries, Metric::Rps, Direction::Max).unwrap();

        assert_eq!(ranking.winner.key, "fast");
        let deltas: Vec<_> = ranking.others.iter().map(|e| e.percent_worse).collect();
        assert_eq!(deltas, vec![75.0, 50.0]);
    }

    #[test]
    fn winner_is_member_and_deltas_non_negative() {
        let summaries = vec![
            summary("a", 3.0, 7.0),
            summary("b", 9.0, 1.0),
            summary("c", 4.5, 11.0),
            summary("d", 0.5, 2.0),
        ];
        for (metric, direction) in [
            (Metric::Rps, Direction::Max),
            (Metric::Rps, Direction::Min),
            (Metric::HttpReqDuration, Direction::Max),
            (Metric::HttpReqDuration, Direction::Min),
        ] {
            let ranking = rank(&summaries, metric, direction).unwrap();
            assert!(summaries.iter().any(|s| std::ptr::eq(s, ranking.winner)));
            assert_eq!(ranking.others.len(), summaries.len() - 1);
            assert!(ranking.others.iter().all(|e| e.percent_worse >= 0.0));
        }
    }

    #[test]
    fn ties_go_to_first_encountered() {
        let summaries = vec![
            summary("first", 5.0, 1.0),
            summary("second", 5.0, 1.0),
        ];
        let ranking = rank(&summaries, Metric::HttpReqDuration, Direction::Min).unwrap();
        assert_eq!(ranking.winner.key, "first");
        assert_eq!(ranking.others[0].percent_worse, 0.0);
    }

    #[test]
    fn single_entry_wins_alone() {
        let summaries = vec![summary("only", 0.0, 0.0)];
        let ranking = rank(&summaries, Metric::Rps, Direction::Max).unwrap();
        assert_eq!(ranking.winner.key, "only");
        assert!(ranking.others.is_empty());
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = rank(&[], Metric::Rps, Direction::Max).unwrap_err();
        assert!(matches!(err, ApibenchError::Validation(_)));
    }

    #[test]
    fn zero_winner_is_division_by_zero() {
        let summaries = vec![summary("idle", 0.0, 0.0), summary("busy", 4.0, 3.0)];
        let err = rank(&summaries, Metric::HttpReqDuration, Direction::Min).unwrap_err();
        assert!(matches!(
            err,
            ApibenchError::DivisionByZero { ref metric } if metric == "http_req_duration"
        ));
    }

    #[test]
    fn percent_delta_of_winner_against_itself_is_zero() {
        assert_eq!(percent_delta("rps", 42.0, 42.0).unwrap(), 0.0);
    }

    #[test]
    fn rank_by_works_on_arbitrary_items() {
        let averages = [("x", 30.0), ("y", 10.0), ("z", 15.0)];
        let ranking = rank_by(&averages, "average_response_time", Direction::Min, |(_, v)| *v).unwrap();
        assert_eq!(ranking.winner.0, "y");
        assert_eq!(ranking.others[0].percent_worse, 200.0);
        assert_eq!(ranking.others[1].percent_worse, 50.0);
    }

    #[test]
    fn metric_names() {
        assert_eq!(Metric::Rps.to_string(), "rps");
        assert_eq!(Metric::HttpReqDuration.to_string(), "http_req_duration");
        assert_eq!(Metric::DataSent.name(), "data_sent");
        assert_eq!(Metric::DataReceived.name(), "data_received");
    }

    #[test]
    fn metric_value_selects_field() {
        let s = RunSummary {
            key: "k".to_string(),
            data_received: 3.0,
            data_sent: 2.0,
            http_req_duration: MetricSummary::Mean(12.5),
            rps: MetricSummary::Rate(99.0),
        };
        assert_eq!(Metric::Rps.value_of(&s), 99.0);
        assert_eq!(Metric::HttpReqDuration.value_of(&s), 12.5);
        assert_eq!(Metric::DataSent.value_of(&s), 2.0);
        assert_eq!(Metric::DataReceived.value_of(&s), 3.0);
    }
}
