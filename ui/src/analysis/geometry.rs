//! Scales and axis ticks for the time-series plot.

use std::collections::BTreeMap;

use api::model::date_key_for;
use time::{Duration, OffsetDateTime};

use super::series::{CommunitySeries, DataPoint};

/// Number of value-axis ticks the plot aims for.
pub const VALUE_TICK_TARGET: u32 = 10;

/// Headroom above the tallest point.
const VALUE_HEADROOM: f64 = 1.1;

/// Maps instants onto `[0, width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: OffsetDateTime,
    end: OffsetDateTime,
    width: f64,
}

impl TimeScale {
    /// A degenerate domain is widened by one day on each side, or on the
    /// side that stays inside the calendar.
    fn new(first: OffsetDateTime, last: OffsetDateTime, width: f64) -> Self {
        let (start, end) = if first == last {
            (
                first.checked_sub(Duration::DAY).unwrap_or(first),
                last.checked_add(Duration::DAY).unwrap_or(last),
            )
        } else {
            (first, last)
        };
        Self { start, end, width }
    }

    pub fn domain(&self) -> (OffsetDateTime, OffsetDateTime) {
        (self.start, self.end)
    }

    pub fn x(&self, date: OffsetDateTime) -> f64 {
        let span = (self.end - self.start).as_seconds_f64();
        if span <= 0.0 {
            return self.width / 2.0;
        }
        (date - self.start).as_seconds_f64() / span * self.width
    }
}

/// Maps hit counts onto `[height, 0]` (larger counts plot higher).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    max: f64,
    height: f64,
}

impl ValueScale {
    fn for_max_hits(max_hits: u32, height: f64) -> Self {
        let max = if max_hits == 0 {
            1.0
        } else {
            f64::from(max_hits) * VALUE_HEADROOM
        };
        Self { max, height }
    }

    pub fn domain(&self) -> (f64, f64) {
        (0.0, self.max)
    }

    pub fn y(&self, value: f64) -> f64 {
        self.height - value / self.max * self.height
    }
}

/// How densely the date axis is labelled, from the number of distinct dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTickPolicy {
    /// Up to ten dates: one label per date.
    EveryDate,
    /// Label every `n`-th calendar day from the first date.
    EveryNthDay(u32),
}

impl DateTickPolicy {
    pub fn for_date_count(count: usize) -> Self {
        match count {
            0..=10 => Self::EveryDate,
            11..=30 => Self::EveryNthDay(count.div_ceil(10) as u32),
            _ => Self::EveryNthDay(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateTick {
    pub at: OffsetDateTime,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueTick {
    pub value: u32,
    pub y: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotGeometry {
    pub width: f64,
    pub height: f64,
    pub x: TimeScale,
    pub y: ValueScale,
    pub max_hit_count: u32,
    pub date_count: usize,
    pub date_policy: DateTickPolicy,
    pub date_ticks: Vec<DateTick>,
    pub value_ticks: Vec<ValueTick>,
}

impl PlotGeometry {
    /// Every point is zero; the axes still render.
    pub fn is_flat(&self) -> bool {
        self.max_hit_count == 0
    }

    pub fn project(&self, point: &DataPoint) -> (f64, f64) {
        (self.x.x(point.date), self.y.y(f64::from(point.hit_count)))
    }
}

/// Result of laying out a set of series.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartGeometry {
    /// Nothing to plot; callers show a placeholder instead of axes.
    Empty,
    Plot(PlotGeometry),
}

impl ChartGeometry {
    pub fn compute(series: &[CommunitySeries], width: f64, height: f64) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);

        let mut dates: BTreeMap<OffsetDateTime, &str> = BTreeMap::new();
        let mut max_hit_count = 0;
        for point in series.iter().flat_map(|line| line.points.iter()) {
            dates.entry(point.date).or_insert(point.date_key.as_str());
            max_hit_count = max_hit_count.max(point.hit_count);
        }

        let (Some((&first, _)), Some((&last, _))) = (dates.first_key_value(), dates.last_key_value())
        else {
            return Self::Empty;
        };

        let x = TimeScale::new(first, last, width);
        let y = ValueScale::for_max_hits(max_hit_count, height);
        let date_policy = DateTickPolicy::for_date_count(dates.len());

        let date_ticks = match date_policy {
            DateTickPolicy::EveryDate => dates
                .iter()
                .map(|(&at, key)| DateTick {
                    at,
                    x: x.x(at),
                    label: (*key).to_string(),
                })
                .collect(),
            DateTickPolicy::EveryNthDay(stride) => {
                day_ticks(first, last, stride).map(|at| DateTick {
                    at,
                    x: x.x(at),
                    label: date_key_for(at),
                })
                .collect()
            }
        };

        let value_ticks = integer_ticks(y.max, VALUE_TICK_TARGET)
            .map(|value| ValueTick {
                value,
                y: y.y(f64::from(value)),
                label: value.to_string(),
            })
            .collect();

        Self::Plot(PlotGeometry {
            width,
            height,
            x,
            y,
            max_hit_count,
            date_count: dates.len(),
            date_policy,
            date_ticks,
            value_ticks,
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn plot(&self) -> Option<&PlotGeometry> {
        match self {
            Self::Empty => None,
            Self::Plot(plot) => Some(plot),
        }
    }
}

fn day_ticks(
    first: OffsetDateTime,
    last: OffsetDateTime,
    stride: u32,
) -> impl Iterator<Item = OffsetDateTime> {
    let step = Duration::days(i64::from(stride.max(1)));
    std::iter::successors(Some(first), move |&at| at.checked_add(step)).take_while(move |&at| at <= last)
}

/// Integer ticks from 0 to `max` with a 1-2-5 step aiming at `target` ticks.
fn integer_ticks(max: f64, target: u32) -> impl Iterator<Item = u32> {
    let step = nice_step(max, target).max(1.0) as u32;
    let last = max.floor() as u32;
    (0..=last).step_by(step as usize)
}

fn nice_step(span: f64, target: u32) -> f64 {
    if span <= 0.0 || target == 0 {
        return 1.0;
    }
    let raw = span / f64::from(target);
    let magnitude = 10f64.powf(raw.log10().floor());
    let error = raw / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}
