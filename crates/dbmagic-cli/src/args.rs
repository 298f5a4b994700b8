//! Command-line argument definitions for the dbMagic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, view overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the dbMagic diagram tool
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram document (.json or .toml)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; the extension picks SVG or PNG
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Zoom factor, overriding the configuration
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Device pixel ratio, overriding the configuration
    #[arg(long)]
    pub device_pixel_ratio: Option<f32>,

    /// Viewport width; fitted to the diagram when unset
    #[arg(long)]
    pub width: Option<f32>,

    /// Viewport height; fitted to the diagram when unset
    #[arg(long)]
    pub height: Option<f32>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
