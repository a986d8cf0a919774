//! Tilt sensor translation and input debounce
//!
//! Raw accelerometer streams fire far faster than one intended move per
//! tilt, so accepted directions are spaced by a minimum interval.

use serde::{Deserialize, Serialize};

use crate::sim::Direction;

/// One accelerometer reading (only the lateral axes are used)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
    /// Milliseconds on a monotonic clock
    pub timestamp_ms: u64,
}

impl TiltSample {
    pub fn new(x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Synthetic sample that maps back to `dir` under the default threshold
    pub fn toward(dir: Direction, magnitude: f32, timestamp_ms: u64) -> Self {
        let m = magnitude.abs();
        let (x, y) = match dir {
            Direction::Right => (-m, 0.0),
            Direction::Left => (m, 0.0),
            Direction::Down => (0.0, m),
            Direction::Up => (0.0, -m),
        };
        Self { x, y, timestamp_ms }
    }
}

/// Map a sample to a direction; the x axis wins when both exceed `threshold`
pub fn direction_for(sample: &TiltSample, threshold: f32) -> Option<Direction> {
    if sample.x < -threshold {
        Some(Direction::Right)
    } else if sample.x > threshold {
        Some(Direction::Left)
    } else if sample.y > threshold {
        Some(Direction::Down)
    } else if sample.y < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Drops events arriving sooner than `interval_ms` after the last accepted one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debouncer {
    interval_ms: u64,
    last_accepted_ms: Option<u64>,
}

impl Debouncer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Accept or drop an event at `timestamp_ms`; only accepted events move the window
    pub fn accept(&mut self, timestamp_ms: u64) -> bool {
        let ready = match self.last_accepted_ms {
            None => true,
            Some(last) => timestamp_ms.saturating_sub(last) >= self.interval_ms,
        };
        if ready {
            self.last_accepted_ms = Some(timestamp_ms);
        }
        ready
    }

    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}
