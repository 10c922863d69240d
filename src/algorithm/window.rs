//! Raw ingest window and clocking semantics

use crate::analysis::histogram::Histogram;
use crate::io::error::{Result, try_filled};

/// When a frame is built relative to ingest
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ClockMode {
    /// Fill the window, then build exactly one frame
    Block,
    /// Shift new bytes in at the tail and build a frame on every ingest
    Slide,
}

/// Outcome of a single ingest call
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ingest {
    /// Bytes taken from the caller's chunk
    pub consumed: usize,
    /// Whether this call completed a window and requires a frame
    pub frame_completed: bool,
}

/// Raw byte window with its block-mode fill offset
#[derive(Clone, Debug)]
pub struct Window {
    data: Vec<u8>,
    fill: usize,
}

impl Window {
    /// Allocate a zeroed window of `len` bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be allocated
    pub fn with_len(len: usize) -> Result<Self> {
        Ok(Self {
            data: try_filled(len, 0u8, "raw window")?,
            fill: 0,
        })
    }

    /// Absorb bytes from `chunk` under `clock` semantics
    ///
    /// Every absorbed byte is counted into `histogram` immediately.
    ///
    /// Slide: a chunk shorter than the window shifts the existing content left
    /// by the chunk length and appends the chunk at the tail; a longer chunk
    /// replaces the whole window with its leading bytes. Either way a frame is due.
    ///
    /// Block: bytes are written at the fill offset up to the remaining
    /// capacity; reaching the end resets the offset and makes a frame due.
    pub fn ingest(
        &mut self,
        clock: ClockMode,
        chunk: &[u8],
        histogram: &mut Histogram,
    ) -> Ingest {
        let len = self.data.len();

        match clock {
            ClockMode::Slide => {
                let take = chunk.len().min(len);
                if let Some(incoming) = chunk.get(..take) {
                    self.data.copy_within(take.., 0);
                    if let Some(tail) = self.data.get_mut(len - take..) {
                        tail.copy_from_slice(incoming);
                    }
                    histogram.absorb_all(incoming);
                }
                self.fill = 0;

                Ingest {
                    consumed: take,
                    frame_completed: true,
                }
            }
            ClockMode::Block => {
                let take = chunk.len().min(len - self.fill);
                if let (Some(incoming), Some(target)) = (
                    chunk.get(..take),
                    self.data.get_mut(self.fill..self.fill + take),
                ) {
                    target.copy_from_slice(incoming);
                    histogram.absorb_all(incoming);
                }
                self.fill += take;

                let frame_completed = self.fill == len;
                if frame_completed {
                    self.fill = 0;
                }

                Ingest {
                    consumed: take,
                    frame_completed,
                }
            }
        }
    }

    /// Window contents
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Window size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Test if the window holds no bytes
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current block-mode fill offset
    pub const fn fill(&self) -> usize {
        self.fill
    }

    /// Bytes that can still be absorbed before the window completes
    pub fn remaining(&self) -> usize {
        self.data.len() - self.fill
    }
}
