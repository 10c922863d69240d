//! Outbound notifications and the external frame sink

use crate::io::error::Result;
use crate::spatial::raster::Raster;
use image::RgbaImage;

/// Event emitted by a channel alongside its frames
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// Emitted at the start of every frame step
    FrameStatus {
        /// Frame number, starting at 1
        sequence: u64,
        /// Processed-byte counter at this frame
        processed: u64,
        /// Milliseconds since the Unix epoch when the frame was started
        acquired_ms: u64,
        /// Window entropy scaled to `[0, 1]`
        entropy: f64,
    },
    /// Emitted once after the packing, mapping or footprint changed
    StreamInfo {
        /// ASCII digits of packing index, mapping index and sample footprint
        code: [u8; 3],
    },
    /// Emitted once per frame for every pattern that matched
    PatternMatch {
        /// Pattern identifier
        id: u32,
        /// Matches in this frame
        count: u32,
    },
}

/// Receiver of finished rasters and channel notifications
pub trait FrameSink {
    /// Accept one notification
    fn notify(&mut self, notification: Notification);

    /// Accept a finished raster
    ///
    /// May block under transport backpressure.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be delivered, normally
    /// [`crate::ChannelError::Sink`] for transport refusals
    fn flush(&mut self, raster: &Raster) -> Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }

    fn flush(&mut self, raster: &Raster) -> Result<()> {
        (**self).flush(raster)
    }
}

/// In-memory sink recording notifications and, optionally, frame copies
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    notifications: Vec<Notification>,
    frames: Vec<RgbaImage>,
    flushes: usize,
    keep_frames: bool,
}

impl RecordingSink {
    /// Record notifications and count flushes without copying frames
    pub const fn new() -> Self {
        Self {
            notifications: Vec::new(),
            frames: Vec::new(),
            flushes: 0,
            keep_frames: false,
        }
    }

    /// Record notifications and a copy of every flushed frame
    pub const fn keeping_frames() -> Self {
        Self {
            notifications: Vec::new(),
            frames: Vec::new(),
            flushes: 0,
            keep_frames: true,
        }
    }

    /// Notifications received so far
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Frames copied so far
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Number of flushes received
    pub const fn flushes(&self) -> usize {
        self.flushes
    }

    /// Take the recorded notifications, leaving none behind
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Take the recorded frames, leaving none behind
    pub fn drain_frames(&mut self) -> Vec<RgbaImage> {
        std::mem::take(&mut self.frames)
    }

    /// Pattern match notifications as `(id, count)` pairs
    pub fn pattern_matches(&self) -> Vec<(u32, u32)> {
        self.notifications
            .iter()
            .filter_map(|n| match n {
                Notification::PatternMatch { id, count } => Some((*id, *count)),
                _ => None,
            })
            .collect()
    }
}

impl FrameSink for RecordingSink {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn flush(&mut self, raster: &Raster) -> Result<()> {
        self.flushes += 1;
        if self.keep_frames {
            self.frames.push(raster.image().clone());
        }
        Ok(())
    }
}
