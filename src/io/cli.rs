//! Command-line file sensor feeding a file through a channel

use crate::algorithm::alpha::AlphaMode;
use crate::algorithm::channel::{Channel, ChannelConfig};
use crate::algorithm::packing::PackingMode;
use crate::algorithm::window::ClockMode;
use crate::io::configuration::{
    ANIMATION_SUFFIX, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_FRAMES, DEFAULT_WINDOW_SIDE, FRAME_SUFFIX,
    GIF_FRAME_DELAY_MS,
};
use crate::io::error::{ChannelError, Result, invalid_parameter, io_error};
use crate::io::image::{export_gif, save_png};
use crate::io::progress::FeedProgress;
use crate::io::sink::{FrameSink, Notification};
use crate::spatial::mapping::MappingMode;
use crate::spatial::raster::Raster;
use clap::Parser;
use image::RgbaImage;
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bytecanvas")]
#[command(
    author,
    version,
    about = "Render a file as a sequence of byte-window images"
)]
/// Command-line arguments for the file sensor
pub struct Cli {
    /// Input file to visualize
    #[arg(value_name = "FILE")]
    pub target: PathBuf,

    /// Window side in pixels
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIDE)]
    pub side: usize,

    /// Ingest clocking
    #[arg(short, long, value_enum, default_value_t = ClockMode::Block)]
    pub clock: ClockMode,

    /// Offset to coordinate mapping
    #[arg(short, long, value_enum, default_value_t = MappingMode::Raster)]
    pub mapping: MappingMode,

    /// Sample to pixel packing
    #[arg(short, long, value_enum, default_value_t = PackingMode::Intensity)]
    pub packing: PackingMode,

    /// Opacity source
    #[arg(short, long, value_enum, default_value_t = AlphaMode::Entropy)]
    pub alpha: AlphaMode,

    /// Bytes read per ingest call
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk: usize,

    /// Pattern specification, e.g. `val=4d,5a:opt=80,event`
    #[arg(short = 'P', long)]
    pub pattern: Option<String>,

    /// Stop after this many frames
    #[arg(short, long, default_value_t = DEFAULT_MAX_FRAMES)]
    pub frames: usize,

    /// Start reading at this byte offset
    #[arg(long, default_value_t = 0)]
    pub skip: u64,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export one animated GIF instead of per-frame PNGs
    #[arg(short, long)]
    pub gif: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Channel configuration selected on the command line
    pub const fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            side: self.side,
            clock: self.clock,
            mapping: self.mapping,
            packing: self.packing,
            alpha: self.alpha,
        }
    }

    /// Directory frames are written to
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            self.target
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }
}

/// Sink writing flushed frames to disk or collecting them for animation
pub struct ExportSink {
    directory: PathBuf,
    stem: String,
    animate: bool,
    exported: usize,
    frames: Vec<RgbaImage>,
}

impl ExportSink {
    /// Create a sink naming its files after `stem` inside `directory`
    pub const fn new(directory: PathBuf, stem: String, animate: bool) -> Self {
        Self {
            directory,
            stem,
            animate,
            exported: 0,
            frames: Vec::new(),
        }
    }

    /// Path of the PNG for frame number `index` (starting at 1)
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory
            .join(format!("{}{FRAME_SUFFIX}_{index:04}.png", self.stem))
    }

    /// Path of the animated GIF
    pub fn animation_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{ANIMATION_SUFFIX}", self.stem))
    }

    /// Frames flushed so far
    pub const fn exported(&self) -> usize {
        self.exported
    }

    /// Write collected frames as an animated GIF, if animating
    ///
    /// # Errors
    ///
    /// Returns an error if GIF export fails
    pub fn finish(&self) -> Result<()> {
        if self.animate && !self.frames.is_empty() {
            export_gif(&self.frames, &self.animation_path(), GIF_FRAME_DELAY_MS)?;
        }
        Ok(())
    }
}

impl FrameSink for ExportSink {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::PatternMatch { id, count } => {
                info!("pattern {id} matched {count} times");
            }
            Notification::StreamInfo { code } => {
                debug!("stream info {}", String::from_utf8_lossy(&code));
            }
            Notification::FrameStatus { .. } => {}
        }
    }

    fn flush(&mut self, raster: &Raster) -> Result<()> {
        self.exported += 1;
        if self.animate {
            self.frames.push(raster.image().clone());
            Ok(())
        } else {
            save_png(raster.image(), &self.frame_path(self.exported))
        }
    }
}

/// Reads the target file in chunks and feeds it through a channel
pub struct Sensor {
    cli: Cli,
}

impl Sensor {
    /// Create a sensor for the given CLI arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Feed the target file and export frames
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the channel cannot be
    /// configured, or a frame cannot be exported
    pub fn process(&self) -> Result<usize> {
        if self.cli.chunk == 0 {
            return Err(invalid_parameter("chunk", &0, &"must be positive"));
        }

        let mut file = File::open(&self.cli.target).map_err(|e| ChannelError::FileSystem {
            path: self.cli.target.clone(),
            operation: "open",
            source: e,
        })?;
        let length = file.metadata().map(|m| m.len()).unwrap_or(0);
        if self.cli.skip > 0 {
            file.seek(SeekFrom::Start(self.cli.skip))
                .map_err(|e| ChannelError::FileSystem {
                    path: self.cli.target.clone(),
                    operation: "seek",
                    source: e,
                })?;
        }

        let stem = self
            .cli
            .target
            .file_stem()
            .ok_or_else(|| io_error("Target has no file name"))?
            .to_string_lossy()
            .to_string();
        let sink = ExportSink::new(self.cli.output_dir(), stem, self.cli.gif);

        let mut channel = Channel::new(sink, self.cli.channel_config())?;
        channel.set_processed_offset(self.cli.skip);
        if let Some(spec) = &self.cli.pattern {
            let added = channel.add_patterns(spec);
            info!("{added} patterns registered");
        }

        let mut progress = if self.cli.should_show_progress() {
            FeedProgress::new(&self.cli.target, length.saturating_sub(self.cli.skip))
        } else {
            FeedProgress::hidden()
        };

        let mut buffer = vec![0u8; self.cli.chunk];
        'feed: loop {
            let read = file.read(&mut buffer).map_err(|e| ChannelError::FileSystem {
                path: self.cli.target.clone(),
                operation: "read",
                source: e,
            })?;
            if read == 0 {
                break;
            }

            let mut rest = buffer.get(..read).unwrap_or_default();
            while !rest.is_empty() {
                let outcome = channel.ingest(rest)?;
                progress.advance(outcome.consumed as u64);
                progress.set_frames(channel.frames());
                rest = rest.get(outcome.consumed..).unwrap_or_default();

                if channel.sink().exported() >= self.cli.frames {
                    break 'feed;
                }
            }
        }
        progress.finish();

        let sink = channel.into_sink();
        sink.finish()?;
        info!(
            "{} frames written to {}",
            sink.exported(),
            self.cli.output_dir().display()
        );
        Ok(sink.exported())
    }
}
