//! `crtwo2fits` — converts Canon CR2 raw photos into FITS images.
//!
//! This binary is the thin ambient shell around the `cr2` decoding
//! crate: argument parsing, config loading, logging, and FITS writing
//! live here; the CR2 parsing and lossless-JPEG decoding live in `cr2`
//! and `cr2-codec`.

mod config;
mod fits;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};

/// Converts Canon CR2 raw photos into FITS astronomical images.
#[derive(Parser, Debug)]
#[command(name = "crtwo2fits", version, about)]
struct Cli {
    /// CR2 files to convert
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write a compressed FITS file (header-only primary HDU + image extension)
    #[arg(short = 'c', long = "compressed")]
    compressed: bool,

    /// Copy the photo's EXIF timestamp into the FITS header as DATE-OBS
    #[arg(short = 'e', long = "export-exif")]
    export_exif: bool,

    /// Skip the sensor-border crop and emit the full decoded frame
    #[arg(short = 'f', long = "full-frame")]
    full_frame: bool,

    /// Write log output to a file instead of stderr
    #[arg(short = 'l', long = "log-file", num_args = 0..=1, default_missing_value = "crtwo2fits.log")]
    log_file: Option<PathBuf>,

    /// Use the native lossless-JPEG decoder instead of an external decoder
    #[arg(short = 'n', long = "native-decoder")]
    native_decoder: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("Error: failed to initialize logging: {err:#}");
        std::process::exit(1);
    }
    if let Err(err) = run(&cli) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut failures = 0usize;
    for path in &cli.files {
        if let Err(err) = convert_one(cli, path) {
            tracing::error!(file = %path.display(), "{err:#}");
            failures += 1;
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} of {} file(s) failed to convert", cli.files.len());
    }
    Ok(())
}

fn convert_one(cli: &Cli, path: &PathBuf) -> anyhow::Result<()> {
    let mut image = cr2::CR2Image::open(path).with_context(|| format!("opening {}", path.display()))?;
    if !cli.native_decoder {
        image.set_external_decoder(config::load_external_decoder());
    }

    let decoded = image
        .load(3, cli.full_frame, cli.native_decoder)
        .with_context(|| format!("decoding {}", path.display()))?;

    let mut cards = Vec::new();
    if cli.export_exif {
        if let Ok(exif) = image.exif() {
            if let Some(date_obs) = fits::date_obs_from_exif(exif) {
                cards.push(fits::Card::str("DATE-OBS", date_obs, Some("date of observation, UTC")));
            } else {
                tracing::warn!(file = %path.display(), "no usable EXIF timestamp for DATE-OBS");
            }
        }
    }

    let out_path = path.with_extension("fits");
    fits::write_file(
        &out_path,
        &fits::FitsImage {
            data: &decoded.data,
            width: decoded.width,
            height: decoded.height,
        },
        &cards,
        cli.compressed,
    )
    .with_context(|| format!("writing {}", out_path.display()))?;

    tracing::info!(input = %path.display(), output = %out_path.display(), "converted");
    image.close();
    Ok(())
}
