use std::collections::VecDeque;

use thiserror::Error;

use crate::generator::WeatherReport;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("buffer bounds invalid: min {min} must be below max {max}")]
    InvalidBounds { min: usize, max: usize },
}

/// Bounded FIFO between generation and playback pacing. Single producer
/// (the session's filler task), single consumer (playback); popping hands
/// ownership of the report to the caller.
#[derive(Debug)]
pub struct ReportBuffer {
    queue: VecDeque<WeatherReport>,
    min_size: usize,
    max_size: usize,
}

impl ReportBuffer {
    pub fn new(min_size: usize, max_size: usize) -> Result<Self, BufferError> {
        if min_size >= max_size {
            return Err(BufferError::InvalidBounds {
                min: min_size,
                max: max_size,
            });
        }
        Ok(Self {
            queue: VecDeque::with_capacity(max_size),
            min_size,
            max_size,
        })
    }

    /// True when the filler should top the queue back up.
    pub fn needs_refill(&self) -> bool {
        self.queue.len() < self.min_size
    }

    pub fn has_capacity(&self) -> bool {
        self.queue.len() < self.max_size
    }

    /// Enqueue one report; returns false (dropping nothing) when full.
    pub fn push(&mut self, report: WeatherReport) -> bool {
        if !self.has_capacity() {
            return false;
        }
        self.queue.push_back(report);
        true
    }

    pub fn pop(&mut self) -> Option<WeatherReport> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
