use thiserror::Error;

/// Errors produced by the binary-primitive layer: byte order detection,
/// IFD entry decoding, and bounds checks shared by every higher layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown byte order marker {0:02x?}, expected \"II\" or \"MM\"")]
    UnknownEndian([u8; 2]),

    #[error("unexpected end of data: need {need} bytes, have {have}")]
    UnexpectedEof { need: usize, have: usize },

    #[error("ifd offset {0} is out of bounds for a buffer of {1} bytes")]
    InvalidIfdOffset(u32, usize),

    #[error("value at offset {offset} with size {size} is out of bounds for a buffer of {len} bytes")]
    ValueOutOfBounds {
        offset: u32,
        size: usize,
        len: usize,
    },

    #[error("unsupported IFD entry type id {0}")]
    UnsupportedType(u16),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
