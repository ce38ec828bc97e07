//! Lossless-JPEG decoding, slice reassembly, cropping, and the
//! external-decoder adapter used to turn a CR2 raw strip into a 2-D
//! sensor image.

pub mod bitreader;
pub mod crop;
pub mod decoder;
pub mod error;
pub mod external;
pub mod frame;
pub mod huffman;
pub mod reassemble;

pub use decoder::{decode, DecodedRaster};
pub use error::{Error, Result};
pub use frame::{Component, FrameHeader, ScanComponent, ScanHeader};
pub use huffman::HuffmanTable;
