use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "audiowarn",
    version,
    about = "Plays two audio warnings at MM:SS times"
)]
pub struct Cli {
    /// Time for the first warning (MM:SS).
    #[arg(long, value_name = "MM:SS", default_value = "9:00")]
    pub t1: String,

    /// Time for the second warning (MM:SS).
    #[arg(long, value_name = "MM:SS", default_value = "10:00")]
    pub t2: String,

    /// Audio file for the first warning.
    #[arg(long, value_name = "PATH", default_value = "09.mp3")]
    pub a1: PathBuf,

    /// Audio file for the second warning.
    #[arg(long, value_name = "PATH", default_value = "10.mp3")]
    pub a2: PathBuf,

    /// Sleep until each warning instead of showing a live countdown.
    #[arg(long)]
    pub no_countdown: bool,

    /// Keep the timer running without playback when no audio player is installed.
    #[arg(long)]
    pub allow_missing_player: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
