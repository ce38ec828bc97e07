//! CR2 container parsing and the public `CR2Image` open/load/close
//! facade: walks IFD0 -> EXIF -> MakerNote to find `Sensor` geometry,
//! IFD3 to find the raw strip and slice descriptor, and drives the
//! lossless-JPEG decoder, slice reassembler, and cropper in `cr2-codec`.

pub mod container;
pub mod error;
pub mod image;
pub mod makernote;
pub mod tags;

pub use container::Container;
pub use error::{Error, Result};
pub use image::{CR2Image, ExternalDecoder, Image};
