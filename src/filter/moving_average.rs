use std::collections::VecDeque;

use crate::error::{ensure_positive, EsError, Result};
use crate::filter::Filter;

/// Arithmetic mean over the last `window` samples.
///
/// Before the buffer is full the mean runs over the samples seen so far.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingAverageFilter {
    window: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    /// Create a new moving average over `window >= 1` samples
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(EsError::InvalidArgument(
                "moving-average window must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            window,
            buffer: VecDeque::with_capacity(window),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Filter for MovingAverageFilter {
    /// Validated, then ignored: the window alone sets the response.
    fn set_cutoff_frequency(&mut self, cutoff: f64) -> Result<()> {
        ensure_positive("cutoff frequency", cutoff)
    }

    /// Ignored.
    fn set_gain(&mut self, _gain: f64) -> Result<()> {
        Ok(())
    }

    /// Validated, then ignored.
    fn set_sampling_time(&mut self, sampling_time: f64) -> Result<()> {
        ensure_positive("sampling time", sampling_time)
    }

    fn update(&mut self, u: f64) -> f64 {
        if self.buffer.len() == self.window {
            self.buffer.pop_front();
        }
        self.buffer.push_back(u);
        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}
