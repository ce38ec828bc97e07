//! TIFF/EXIF/MakerNote tag ids this parser looks for, named per the
//! container contract in spec section 4.1/6.

pub const EXIF_IFD_POINTER: u16 = 34665; // 0x8769
pub const MAKER_NOTE: u16 = 37500; // 0x927C

pub const STRIP_OFFSET: u16 = 273;
pub const STRIP_BYTES_COUNT: u16 = 279;
pub const CR2_SLICE: u16 = 50752; // 0xC640

pub const SENSOR_INFO: u16 = 0x00E0;

pub const DATE_TIME_ORIGINAL: u16 = 36867;
pub const DATE_TIME_DIGITIZED: u16 = 36868;
pub const DATE_TIME: u16 = 306;
