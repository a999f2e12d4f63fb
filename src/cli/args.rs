//! Command-line arguments for the `lz4pipe` binary.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use crate::config::{PipeConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_CHUNK_SIZE};

/// Marker meaning stdin (as INPUT) or stdout (as OUTPUT).
pub const STDIO_MARK: &str = "-";

/// Compress or decompress a headerless LZ4-family token stream.
#[derive(Debug, Clone, Parser)]
#[command(name = "lz4pipe", version, about)]
pub struct Args {
    /// Decompress instead of compress.
    #[arg(short = 'd', long = "decompress")]
    pub decompress: bool,

    /// Overwrite OUTPUT if it exists.
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Read the whole input and use the one-shot block codec.
    #[arg(long = "block")]
    pub block: bool,

    /// More log output (repeatable).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Errors only.
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Chunks buffered between the codec thread and the writer.
    #[arg(long = "channel-capacity", default_value_t = DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,

    /// Bytes per chunk handed from the codec thread to the writer.
    #[arg(long = "chunk-size", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Input file; `-` or absent reads stdin.
    pub input: Option<PathBuf>,

    /// Output file; `-` or absent writes stdout.
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn pipe_config(&self) -> PipeConfig {
        PipeConfig::new()
            .with_channel_capacity(self.channel_capacity)
            .with_chunk_size(self.chunk_size)
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// `None` when the input is stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != STDIO_MARK)
    }

    /// `None` when the output is stdout.
    pub fn output_path(&self) -> Option<&PathBuf> {
        self.output.as_ref().filter(|p| p.as_os_str() != STDIO_MARK)
    }
}
