//! Binary primitives shared by the CR2 container parser and the
//! lossless-JPEG codec: byte-order-aware reads, TIFF IFD decoding, the
//! dynamic EXIF value type, and raw sensor geometry.
//!
//! ```
//! use cr2_core::byte_order::ByteOrder;
//!
//! let header = [b'I', b'I', 0x2A, 0x00];
//! let order = ByteOrder::from_marker([header[0], header[1]]).unwrap();
//! assert_eq!(order.read_u16(&header[2..4]), 0x002A);
//! ```

pub mod byte_order;
pub mod error;
pub mod format;
pub mod ifd;
pub mod sensor;
pub mod value;

pub use byte_order::ByteOrder;
pub use error::{Error, Result};
pub use ifd::{Ifd, IfdEntry, IfdReader};
pub use sensor::{CR2Slice, Sensor};
pub use value::ExifValue;
