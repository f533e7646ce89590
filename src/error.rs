use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed sequencer state: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(#[from] ron::error::SpannedError),

    #[error("invalid note name {0:?}")]
    InvalidNote(String),
    #[error("scale must have at least one degree")]
    EmptyScale,
    #[error("scale degrees must ascend within one octave, got {0:?}")]
    InvalidScale(Vec<u8>),
    #[error("measure count must be between 1 and {max}, got {got}")]
    InvalidMeasures { got: usize, max: usize },
    #[error("octave count must be between 1 and {max}, got {got}")]
    InvalidOctaves { got: usize, max: usize },
    #[error("tile (column {column}, row {row}) is outside the grid")]
    TileOutOfBounds { column: usize, row: usize },
    #[error("no instrument named {0:?}")]
    UnknownInstrument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
