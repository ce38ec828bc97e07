use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("core: {0}")]
    Core(#[from] cr2_core::Error),

    #[error("invalid marker: {0}")]
    InvalidMarker(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("unsupported pgm variant: {0:?}")]
    UnsupportedPgm(Vec<u8>),

    #[error("invalid pgm: {0}")]
    InvalidPgm(String),

    #[error("requested crop exceeds decoded array: need {need:?}, have {have:?}")]
    SmallRaw { need: (u32, u32), have: (u32, u32) },

    #[error("external decoder failed: {0}")]
    ExternalDecoder(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
