// Command-line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Guided breathing timer with spoken cues
#[derive(Parser, Debug)]
#[command(name = "seven_breaths", version, about)]
pub struct Cli {
    /// Directory holding the cue assets (nose-in, nose-out, mouth-in, mouth-out, silence)
    #[arg(long, default_value = "assets", env = "SEVEN_BREATHS_ASSETS")]
    pub assets: PathBuf,

    /// Settings file (defaults to <config dir>/seven-breaths/settings.json)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Run one session in the terminal instead of opening a window
    #[arg(long)]
    pub headless: bool,

    /// Do not open an audio device
    #[arg(long)]
    pub no_audio: bool,

    /// Output device name (defaults to the system output)
    #[arg(long)]
    pub device: Option<String>,

    /// Print the available output devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
