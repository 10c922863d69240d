//! Channel façade composing window, histogram, mapping, alpha and packing

use crate::algorithm::alpha::{self, AlphaMode};
use crate::algorithm::packing::{PackingMode, pack_pixel};
use crate::algorithm::patterns::{Pattern, PatternFlags, PatternSet};
use crate::algorithm::window::{ClockMode, Ingest, Window};
use crate::analysis::histogram::{BUCKETS, Histogram};
use crate::io::command::Command;
use crate::io::configuration::{BACKGROUND, DEFAULT_WINDOW_SIDE, MAX_WINDOW_SIDE, OPAQUE};
use crate::io::error::{Result, invalid_parameter, try_filled};
use crate::io::pattern_spec::parse_pattern_spec;
use crate::io::sink::{FrameSink, Notification};
use crate::math::entropy::{normalized, shannon_with};
use crate::spatial::mapping::{CoordinateMap, MappingMode};
use crate::spatial::raster::Raster;
use log::{debug, trace, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// Initial channel state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Window side in samples
    pub side: usize,
    /// Ingest clocking
    pub clock: ClockMode,
    /// Offset to coordinate policy
    pub mapping: MappingMode,
    /// Sample to pixel policy
    pub packing: PackingMode,
    /// Opacity policy
    pub alpha: AlphaMode,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            side: DEFAULT_WINDOW_SIDE,
            clock: ClockMode::Block,
            mapping: MappingMode::Raster,
            packing: PackingMode::Intensity,
            alpha: AlphaMode::Entropy,
        }
    }
}

// Buffers that change together on resize, allocated before any is swapped in
struct Buffers {
    window: Window,
    alpha: Vec<u8>,
    map: CoordinateMap,
    raster: Raster,
}

impl Buffers {
    fn allocate(side: usize, mapping: MappingMode, packing: PackingMode) -> Result<Self> {
        if side == 0 || side > MAX_WINDOW_SIDE {
            return Err(invalid_parameter(
                "side",
                &side,
                &format!("must be between 1 and {MAX_WINDOW_SIDE}"),
            ));
        }

        let cells = side * side;
        let map = CoordinateMap::build(mapping, side)?;
        let window = Window::with_len(cells * packing.footprint(mapping))?;
        let alpha = try_filled(cells, OPAQUE, "alpha buffer")?;
        let raster = Raster::new(side, BACKGROUND)?;

        Ok(Self {
            window,
            alpha,
            map,
            raster,
        })
    }
}

/// Transcoding channel bound to one external sink
///
/// Owns every buffer it renders from. Not re-entrant: ingest and step
/// must not run concurrently on the same channel.
pub struct Channel<S: FrameSink> {
    sink: S,
    clock: ClockMode,
    packing: PackingMode,
    alpha_mode: AlphaMode,
    side: usize,
    footprint: usize,
    map: CoordinateMap,
    window: Window,
    alpha: Vec<u8>,
    histogram: Histogram,
    patterns: PatternSet,
    raster: Raster,
    processed: u64,
    processed_at_frame: u64,
    frames: u64,
    status_dirty: bool,
}

impl<S: FrameSink> Channel<S> {
    /// Create a channel rendering into `sink`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `config.side` is zero or above [`MAX_WINDOW_SIDE`]
    /// - Curve mapping is requested with a side that is not a power of two
    /// - A buffer cannot be allocated
    pub fn new(sink: S, config: ChannelConfig) -> Result<Self> {
        let buffers = Buffers::allocate(config.side, config.mapping, config.packing)?;

        Ok(Self {
            sink,
            clock: config.clock,
            packing: config.packing,
            alpha_mode: config.alpha,
            side: config.side,
            footprint: config.packing.footprint(config.mapping),
            map: buffers.map,
            window: buffers.window,
            alpha: buffers.alpha,
            histogram: Histogram::new(),
            patterns: PatternSet::new(),
            raster: buffers.raster,
            processed: 0,
            processed_at_frame: 0,
            frames: 0,
            status_dirty: true,
        })
    }

    /// Absorb a chunk of raw bytes, building a frame when the clock says so
    ///
    /// # Errors
    ///
    /// Returns an error if a triggered frame cannot be flushed to the sink;
    /// the bytes are still consumed
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<Ingest> {
        let outcome = self.window.ingest(self.clock, bytes, &mut self.histogram);
        self.processed = self.processed.saturating_add(outcome.consumed as u64);

        if outcome.frame_completed {
            self.step()?;
            if self.clock == ClockMode::Block {
                self.histogram.reset();
            }
        }

        Ok(outcome)
    }

    /// Reallocate every buffer for a new window side
    ///
    /// Window content is zeroed, alpha reset to opaque, the fill offset and
    /// histogram cleared, and the raster cleared to the background. No frame
    /// is built.
    ///
    /// # Errors
    ///
    /// Returns an error if the side is invalid for the active mapping or a
    /// buffer cannot be allocated; the channel then keeps its previous buffers
    pub fn resize(&mut self, side: usize) -> Result<()> {
        self.rebuild(side, self.map.mode(), self.packing)
    }

    /// Switch the offset to coordinate policy and build a frame
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping cannot be built for the current side,
    /// a required resize fails (both leave the previous mapping active), or
    /// the forced frame cannot be flushed
    pub fn switch_mapping(&mut self, mode: MappingMode) -> Result<()> {
        if self.packing.footprint(mode) == self.footprint {
            self.map = CoordinateMap::build(mode, self.side)?;
        } else {
            self.rebuild(self.side, mode, self.packing)?;
        }
        debug!("mapping switched to {mode:?}");

        if mode.is_sparse() {
            self.raster.clear(BACKGROUND);
        }
        self.status_dirty = true;
        self.step()
    }

    /// Switch the sample to pixel policy
    ///
    /// Resizes when the per-sample footprint changes, keeping the raw buffer
    /// an exact multiple of the sample count.
    ///
    /// # Errors
    ///
    /// Returns an error if the required resize fails; the previous packing
    /// then stays active
    pub fn switch_packing(&mut self, mode: PackingMode) -> Result<()> {
        let footprint = mode.footprint(self.map.mode());
        if self.window.len() == self.side * self.side * footprint {
            self.packing = mode;
            self.footprint = footprint;
        } else {
            self.rebuild(self.side, self.map.mode(), mode)?;
        }
        debug!("packing switched to {mode:?}, footprint {footprint}");

        self.status_dirty = true;
        Ok(())
    }

    /// Switch the opacity policy
    pub fn switch_alpha(&mut self, mode: AlphaMode) {
        self.alpha_mode = mode;
        if mode == AlphaMode::Constant {
            alpha::fill_constant(&mut self.alpha);
        }
        debug!("alpha switched to {mode:?}");
    }

    /// Switch the ingest clock
    pub fn switch_clock(&mut self, mode: ClockMode) {
        self.clock = mode;
        debug!("clock switched to {mode:?}");
    }

    /// Apply a decoded control command
    ///
    /// # Errors
    ///
    /// Propagates errors from the mapping or packing switch
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Clock(mode) => self.switch_clock(mode),
            Command::Mapping(mode) => self.switch_mapping(mode)?,
            Command::Packing(mode) => self.switch_packing(mode)?,
            Command::Alpha(mode) => self.switch_alpha(mode),
        }
        Ok(())
    }

    /// Decode and apply an inbound command selector
    ///
    /// Unrecognized selectors are logged and rejected without state change.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ChannelError::UnknownCommand`] for unrecognized
    /// selectors and propagates errors from the applied switch
    pub fn consume_command(&mut self, selector: i32) -> Result<()> {
        let command = Command::from_selector(selector).inspect_err(|e| warn!("{e}"))?;
        self.apply(command)
    }

    /// Register a pattern for the pattern alpha policy
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence is empty or cannot be stored; the
    /// sequence is dropped and existing patterns are untouched
    pub fn add_pattern(
        &mut self,
        bytes: Vec<u8>,
        alpha: u8,
        id: u32,
        flags: PatternFlags,
    ) -> Result<()> {
        let pattern = Pattern::new(bytes, alpha, id, flags)?;
        self.patterns.register(pattern)
    }

    /// Register every valid entry of a pattern specification
    ///
    /// Malformed entries are logged and skipped; entries registered before
    /// them stay registered. Returns the number of patterns added.
    pub fn add_patterns(&mut self, spec: &str) -> usize {
        let mut added = 0;
        for entry in parse_pattern_spec(spec) {
            let registered = entry
                .and_then(|e| self.add_pattern(e.bytes, e.alpha, e.id, e.flags));
            match registered {
                Ok(()) => added += 1,
                Err(e) => warn!("pattern rejected: {e}"),
            }
        }
        added
    }

    /// Override the processed-byte counter, e.g. after seeking the source
    pub const fn set_processed_offset(&mut self, offset: u64) {
        self.processed = offset;
    }

    /// Build and flush a frame from the current window immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the sink refuses the frame
    pub fn force_step(&mut self) -> Result<()> {
        self.step()
    }

    /// Bytes the window can absorb before it completes
    pub fn remaining_capacity(&self) -> usize {
        self.window.remaining()
    }

    /// Raw bytes spanned by one raster row
    pub const fn row_stride(&self) -> usize {
        self.footprint * self.side
    }

    /// Window side in samples
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Raw bytes per sample
    pub const fn footprint(&self) -> usize {
        self.footprint
    }

    /// Active clock mode
    pub const fn clock(&self) -> ClockMode {
        self.clock
    }

    /// Active mapping mode
    pub const fn mapping(&self) -> MappingMode {
        self.map.mode()
    }

    /// Active mapping with its derived tables
    pub const fn coordinate_map(&self) -> &CoordinateMap {
        &self.map
    }

    /// Active packing mode
    pub const fn packing(&self) -> PackingMode {
        self.packing
    }

    /// Active alpha mode
    pub const fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Raw window contents
    pub fn window(&self) -> &[u8] {
        self.window.as_slice()
    }

    /// Alpha buffer, one entry per sample
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Byte histogram of the current window
    pub const fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Registered patterns
    pub const fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Output raster
    pub const fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Processed-byte counter
    pub const fn processed(&self) -> u64 {
        self.processed
    }

    /// Processed-byte counter recorded at the last flushed frame
    pub const fn processed_at_last_frame(&self) -> u64 {
        self.processed_at_frame
    }

    /// Frames built so far
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Borrow the sink
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tear the channel down, returning its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    // Allocates everything first so a failure leaves the channel untouched
    fn rebuild(&mut self, side: usize, mapping: MappingMode, packing: PackingMode) -> Result<()> {
        let buffers = Buffers::allocate(side, mapping, packing)?;

        self.window = buffers.window;
        self.alpha = buffers.alpha;
        self.map = buffers.map;
        self.raster = buffers.raster;
        self.side = side;
        self.packing = packing;
        self.footprint = packing.footprint(mapping);
        self.histogram.reset();
        self.status_dirty = true;

        debug!(
            "channel resized to {side}x{side}, {} raw bytes",
            self.window.len()
        );
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        let window = self.window.as_slice();

        if self.clock == ClockMode::Slide || self.histogram.total() != window.len() as u64 {
            self.histogram.rebuild(window);
        }

        self.frames += 1;
        let entropy = normalized(shannon_with(window, self.histogram.counts()));
        self.sink.notify(Notification::FrameStatus {
            sequence: self.frames,
            processed: self.processed,
            acquired_ms: now_ms(),
            entropy,
        });

        if self.status_dirty {
            self.sink.notify(Notification::StreamInfo {
                code: stream_code(self.packing, self.map.mode(), self.footprint),
            });
            self.status_dirty = false;
        }

        let intensity = match self.packing {
            PackingMode::HistogramIntensity => self.histogram.intensity_lut(),
            _ => [0; BUCKETS],
        };

        let matches = alpha::generate(
            self.alpha_mode,
            &mut self.alpha,
            window,
            self.footprint,
            self.side,
            &mut self.patterns,
        );
        for found in matches {
            self.sink.notify(Notification::PatternMatch {
                id: found.id,
                count: found.count,
            });
        }

        let extra = self.map.mode().extra_bytes();
        for (offset, sample) in window.chunks_exact(self.footprint).enumerate() {
            let Some((x, y)) = self.map.locate(offset, sample) else {
                continue;
            };
            let opacity = self.alpha.get(offset).copied().unwrap_or(OPAQUE);
            let body = sample.get(extra..).unwrap_or_default();
            if let Some(pixel) = pack_pixel(self.packing, body, opacity, &intensity) {
                self.raster.put(x, y, pixel);
            }
        }

        self.sink.flush(&self.raster)?;
        self.processed_at_frame = self.processed;
        trace!(
            "frame {} flushed at {} bytes, entropy {entropy:.3}",
            self.frames, self.processed
        );

        if self.map.mode().is_sparse() {
            self.raster.clear(BACKGROUND);
        }
        Ok(())
    }
}

/// Stream-info code: ASCII digits of packing index, mapping index and footprint
pub fn stream_code(packing: PackingMode, mapping: MappingMode, footprint: usize) -> [u8; 3] {
    let footprint = u8::try_from(footprint).unwrap_or(u8::MAX - b'0');
    [
        b'0' + packing.index(),
        b'0' + mapping.index(),
        b'0'.saturating_add(footprint),
    ]
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
