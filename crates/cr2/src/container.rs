use cr2_core::{ByteOrder, CR2Slice, Ifd, IfdReader, Sensor};

use crate::error::{Error, Result};
use crate::makernote;
use crate::tags;

/// The result of parsing a CR2 container's header, IFD0/EXIF/MakerNote
/// chain, and IFD3 raw-strip descriptor, without touching the entropy
/// payload itself.
pub struct Container {
    pub version: f64,
    pub byte_order: ByteOrder,
    pub sensor: Sensor,
    pub slice: CR2Slice,
    pub ifd0: Ifd,
    pub exif: Ifd,
    pub makernote: Ifd,
}

/// Parses a CR2 file already read fully into memory.
pub fn parse(data: &[u8]) -> Result<Container> {
    if data.len() < 16 {
        return Err(Error::NotCR2);
    }

    let order_marker = [data[0], data[1]];
    if order_marker != *b"II" && order_marker != *b"MM" {
        return Err(Error::NotCR2);
    }
    let byte_order = ByteOrder::from_marker(order_marker).expect("marker validated above");

    if byte_order.read_u16(&data[2..4]) != 0x002A {
        return Err(Error::NotCR2);
    }
    if &data[8..10] != b"CR" {
        return Err(Error::NotCR2);
    }
    let major = data[10];
    let minor = data[11];
    let version = major as f64 + (minor as f64) / 10.0;

    let ifd0_offset = byte_order.read_u32(&data[4..8]);
    let ifd3_offset = byte_order.read_u32(&data[12..16]);

    let reader = IfdReader::new(data, byte_order);

    let ifd0 = reader.read_ifd(ifd0_offset)?;
    let exif_offset = ifd0
        .get(tags::EXIF_IFD_POINTER)
        .and_then(|v| v.as_u32())
        .ok_or(Error::NotCR2)?;
    let exif = reader.read_ifd(exif_offset)?;

    let maker_offset = match exif.get(tags::MAKER_NOTE) {
        Some(cr2_core::ExifValue::Undefined { offset, .. }) => *offset,
        _ => return Err(Error::NotCR2),
    };
    let makernote_ifd = reader.read_ifd(maker_offset)?;

    let sensor_info = makernote_ifd
        .get(tags::SENSOR_INFO)
        .and_then(|v| v.as_i16_vec())
        .ok_or(Error::NotCR2)?;
    let sensor = makernote::sensor_from_sensor_info(&sensor_info)?;

    let ifd3 = reader.read_ifd(ifd3_offset)?;
    let strip_offset = ifd3
        .get(tags::STRIP_OFFSET)
        .and_then(|v| v.as_u32())
        .ok_or(Error::NotCR2)?;
    let strip_byte_count = ifd3
        .get(tags::STRIP_BYTES_COUNT)
        .and_then(|v| v.as_u32())
        .ok_or(Error::NotCR2)?;

    let slice = match ifd3.get(tags::CR2_SLICE).and_then(|v| v.as_u16_vec()) {
        Some(triplet) if triplet.len() == 3 => CR2Slice {
            strip_offset,
            slice_count: triplet[0] as u32,
            strip_byte_count,
            slice_width: triplet[1] as u32,
            last_slice_width: triplet[2] as u32,
        },
        _ => CR2Slice {
            strip_offset,
            slice_count: 0,
            strip_byte_count,
            slice_width: 0,
            last_slice_width: 0,
        },
    };

    Ok(Container {
        version,
        byte_order,
        sensor,
        slice,
        ifd0,
        exif,
        makernote: makernote_ifd,
    })
}
