use std::path::PathBuf;

/// Startup failures that end the run before the timer starts.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WarnError {
    #[error("invalid time {input:?}, expected MM:SS")]
    InvalidTimestamp { input: String },

    #[error("t2 ({t2}) must be greater than t1 ({t1})")]
    OffsetOrder { t1: String, t2: String },

    #[error("audio file not found: {}", .0.display())]
    MissingAudio(PathBuf),

    #[error(
        "no audio player found (ffplay/mpg123/aplay/paplay); install one, for example: sudo apt install ffmpeg"
    )]
    PlayerUnavailable,
}
