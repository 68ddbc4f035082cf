//! Command-line argument definitions for the SpeciesRing CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Flags given here override the matching configuration file
//! values.

use clap::Parser;

/// Command-line arguments for the SpeciesRing report tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the raw caches and processed artefacts
    #[arg(short, long)]
    pub data_dir: Option<String>,

    /// Fetch sequences again even if saved records exist
    #[arg(long)]
    pub refresh: bool,

    /// Common name of the reference species
    #[arg(short, long)]
    pub reference: Option<String>,

    /// Gene whose sequences are compared
    #[arg(short, long)]
    pub gene: Option<String>,

    /// Skip species photo lookup
    #[arg(long)]
    pub no_images: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
