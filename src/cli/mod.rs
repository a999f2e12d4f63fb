//! Command-line driver for the `lz4pipe` binary.
//!
//! | Submodule | Responsibility |
//! |-----------|----------------|
//! | [`args`]  | `Args`: clap definition, log level and pipe configuration derived from flags. |
//!
//! [`run`] opens the input and output, then either streams through a
//! background codec thread or, with `--block`, runs the one-shot codec over
//! the whole input.

pub mod args;

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};

use anyhow::{bail, Context, Result};
use log::info;

pub use args::Args;

use crate::block::{compress_to_vec, decompress_into_writer};
use crate::io::stream::{decode_stream_with_config, encode_stream_with_config};

fn open_input(args: &Args) -> Result<Box<dyn Read + Send>> {
    match args.input_path() {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

fn open_output(args: &Args) -> Result<Box<dyn Write>> {
    match args.output_path() {
        Some(path) => {
            if path.exists() && !args.force {
                bail!("{} already exists; use -f to overwrite", path.display());
            }
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// Execute one compression or decompression as described by `args`.
/// Returns the number of bytes written to the output.
pub fn run(args: &Args) -> Result<u64> {
    let mut input = open_input(args)?;
    let mut output = open_output(args)?;
    let verb = if args.decompress { "decompress" } else { "compress" };

    let written = if args.block {
        let mut src = Vec::new();
        input.read_to_end(&mut src).context("read failed")?;
        if args.decompress {
            decompress_into_writer(&src, &mut output).context("decompression failed")?
        } else {
            let compressed = compress_to_vec(&src).context("compression failed")?;
            output.write_all(&compressed).context("write failed")?;
            output.flush().context("write failed")?;
            compressed.len() as u64
        }
    } else {
        let config = args.pipe_config();
        let mut produced = if args.decompress {
            decode_stream_with_config(input, &config)
        } else {
            encode_stream_with_config(input, &config)
        }
        .context("cannot start codec thread")?;
        let n = io::copy(&mut produced, &mut output).with_context(|| format!("{verb} failed"))?;
        output.flush().context("write failed")?;
        n
    };

    info!("{verb}: {written} bytes written");
    Ok(written)
}
