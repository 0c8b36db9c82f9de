/*
MIT License

Copyright (c) 2025 Ameyanagi
*/

//! Segment-list descriptive statistics
//!
//! Science data comes in disjoint segments of GPS time. These helpers
//! summarise how much data a segment list holds and how it is spread.

pub mod errors;

pub use errors::{Result, SegmentError};

use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` in GPS seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    /// Create a segment
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Length of the segment in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A time-ordered list of disjoint segments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentList {
    segments: Vec<Segment>,
}

/// Summary statistics of a segment list
///
/// All durations are in seconds. An empty list has every field zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentStats {
    pub count: usize,
    /// Sum of segment durations
    pub total_duration: f64,
    /// From the first start to the last end
    pub span: f64,
    /// `total_duration / span`
    pub duty_cycle: f64,
    pub min_duration: f64,
    pub max_duration: f64,
    pub mean_duration: f64,
    pub median_duration: f64,
    /// Sum of the gaps between consecutive segments
    pub total_gap: f64,
    pub max_gap: f64,
}

impl SegmentList {
    /// Build a segment list, sorting by start time
    ///
    /// Segments must be finite with `end > start`, and must not overlap;
    /// touching segments (`end == next start`) are allowed.
    pub fn new(mut segments: Vec<Segment>) -> Result<Self> {
        for seg in &segments {
            if !(seg.start.is_finite() && seg.end.is_finite()) {
                return Err(SegmentError::InvalidSegment {
                    start: seg.start,
                    end: seg.end,
                    reason: "bounds must be finite",
                });
            }
            if seg.end <= seg.start {
                return Err(SegmentError::InvalidSegment {
                    start: seg.start,
                    end: seg.end,
                    reason: "end must be after start",
                });
            }
        }

        segments.sort_by(|a, b| a.start.total_cmp(&b.start));

        if let Some(pair) = segments.windows(2).find(|w| w[1].start < w[0].end) {
            return Err(SegmentError::Overlap(
                pair[0].start,
                pair[0].end,
                pair[1].start,
                pair[1].end,
            ));
        }

        Ok(Self { segments })
    }

    /// The segments in time order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Compute descriptive statistics
    pub fn stats(&self) -> SegmentStats {
        let (first, last) = match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return SegmentStats::default(),
        };

        let mut durations: Vec<f64> = self.segments.iter().map(Segment::duration).collect();
        let count = durations.len();
        let total_duration: f64 = durations.iter().sum();
        let span = last.end - first.start;

        durations.sort_by(f64::total_cmp);
        let median_duration = if count % 2 == 1 {
            durations[count / 2]
        } else {
            0.5 * (durations[count / 2 - 1] + durations[count / 2])
        };

        let gaps = self.segments.windows(2).map(|w| w[1].start - w[0].end);
        let (total_gap, max_gap) = gaps.fold((0.0, 0.0f64), |(sum, max), gap| {
            (sum + gap, max.max(gap))
        });

        SegmentStats {
            count,
            total_duration,
            span,
            duty_cycle: total_duration / span,
            min_duration: durations[0],
            max_duration: durations[count - 1],
            mean_duration: total_duration / count as f64,
            median_duration,
            total_gap,
            max_gap,
        }
    }
}
