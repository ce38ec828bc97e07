use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("core: {0}")]
    Core(#[from] cr2_core::Error),

    #[error("codec: {0}")]
    Codec(#[from] cr2_codec::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("not a CR2 file")]
    NotCR2,

    #[error("malformed Canon SensorInfo maker note")]
    MalformedSensorInfo,

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("image is not open")]
    NotOpen,
}

pub type Result<T> = std::result::Result<T, Error>;
