use std::collections::HashMap;

use crate::byte_order::ByteOrder;
use crate::error::{Error, Result};
use crate::format::{self, ASCII, DOUBLE, FLOAT, LONG, RATIONAL, SBYTE, SHORT, SLONG, SRATIONAL, SSHORT, UNDEFINED};
use crate::value::ExifValue;

/// One raw 12-byte TIFF directory entry, before value resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    pub tag: u16,
    pub type_id: u16,
    pub count: u32,
    pub value_or_offset: u32,
}

/// An ordered directory plus a `tag -> decoded value` map. Tag uniqueness
/// within one IFD is not assumed; later entries overwrite earlier ones in
/// the map (`by_tag`), while `entries` preserves the original order.
#[derive(Debug, Clone, Default)]
pub struct Ifd {
    pub entries: Vec<IfdEntry>,
    pub by_tag: HashMap<u16, ExifValue>,
}

impl Ifd {
    pub fn get(&self, tag: u16) -> Option<&ExifValue> {
        self.by_tag.get(&tag)
    }
}

/// Reads TIFF IFDs out of an in-memory buffer holding the whole file.
pub struct IfdReader<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> IfdReader<'a> {
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        IfdReader { data, byte_order }
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        self.data
            .get(offset..offset + len)
            .ok_or(Error::UnexpectedEof {
                need: offset + len,
                have: self.data.len(),
            })
    }

    /// Reads the full IFD at `offset`: a 2-byte entry count followed by
    /// that many 12-byte entries, each resolved to a decoded value. The
    /// cursor is restored to immediately after each 12-byte entry before
    /// moving to the next one (i.e. entries are read positionally, never
    /// by following a resolved value's offset).
    pub fn read_ifd(&self, offset: u32) -> Result<Ifd> {
        let offset = offset as usize;
        let count_bytes = self.slice(offset, 2)?;
        let entry_count = self.byte_order.read_u16(count_bytes);

        let mut ifd = Ifd::default();
        for i in 0..entry_count as usize {
            let entry_offset = offset + 2 + i * 12;
            let entry = self.read_entry(entry_offset)?;
            let value = self.resolve_value(&entry)?;
            ifd.entries.push(entry);
            ifd.by_tag.insert(entry.tag, value);
        }
        Ok(ifd)
    }

    /// Returns the offset of the next IFD in the chain (0 means none),
    /// stored as a 4-byte field immediately after the last entry.
    pub fn next_ifd_offset(&self, offset: u32) -> Result<u32> {
        let offset = offset as usize;
        let count_bytes = self.slice(offset, 2)?;
        let entry_count = self.byte_order.read_u16(count_bytes) as usize;
        let next_offset = offset + 2 + entry_count * 12;
        let bytes = self.slice(next_offset, 4)?;
        Ok(self.byte_order.read_u32(bytes))
    }

    fn read_entry(&self, offset: usize) -> Result<IfdEntry> {
        let bytes = self.slice(offset, 12)?;
        Ok(IfdEntry {
            tag: self.byte_order.read_u16(&bytes[0..2]),
            type_id: self.byte_order.read_u16(&bytes[2..4]),
            count: self.byte_order.read_u32(&bytes[4..8]),
            value_or_offset: self.byte_order.read_u32(&bytes[8..12]),
        })
    }

    /// Resolves one entry's value per the rules in the container format:
    /// a single value no wider than 4 bytes is decoded in place from
    /// `value_or_offset`; otherwise `value_or_offset` is a file offset to
    /// `count * type_size` bytes of out-of-line data. Type 7 (undefined)
    /// never dereferences the offset, since its purpose here is to carry
    /// the offset onward (e.g. into a MakerNote sub-IFD).
    pub fn resolve_value(&self, entry: &IfdEntry) -> Result<ExifValue> {
        if entry.type_id == UNDEFINED {
            return Ok(ExifValue::Undefined {
                count: entry.count,
                offset: entry.value_or_offset,
            });
        }

        let size = format::type_size(entry.type_id).ok_or(Error::UnsupportedType(entry.type_id))?;
        let inline = entry.count == 1 && size <= 4;

        let bytes: std::borrow::Cow<[u8]> = if inline {
            std::borrow::Cow::Owned(entry.value_or_offset.to_ne_bytes().to_vec())
        } else {
            let total = size * entry.count as usize;
            std::borrow::Cow::Borrowed(self.slice(entry.value_or_offset as usize, total)?)
        };

        if entry.type_id == ASCII {
            let raw = if inline {
                &entry.value_or_offset.to_le_bytes()[..]
            } else {
                &bytes[..]
            };
            return Ok(ExifValue::Ascii(decode_ascii(raw, inline, &self.byte_order)));
        }

        // Inline values were just stashed as native-endian bytes of the
        // original u32 field; decode each single value with that in mind
        // by re-reading through the byte-order reader on a byte-order
        // view of the field rather than `bytes` directly.
        if inline {
            return Ok(decode_inline(entry, &self.byte_order));
        }

        let items: Vec<ExifValue> = (0..entry.count as usize)
            .map(|i| decode_one(entry.type_id, &bytes[i * size..(i + 1) * size], &self.byte_order))
            .collect::<Result<_>>()?;

        if items.len() == 1 {
            Ok(items.into_iter().next().unwrap())
        } else {
            Ok(ExifValue::List(items))
        }
    }
}

fn decode_ascii(raw: &[u8], inline: bool, byte_order: &ByteOrder) -> String {
    let bytes: Vec<u8> = if inline {
        // An inline ASCII value (count <= 4) is stored as raw bytes in
        // file byte order, not as a native-endian integer.
        match byte_order {
            ByteOrder::Little => raw.to_vec(),
            ByteOrder::Big => raw.iter().rev().copied().collect(),
        }
    } else {
        raw.to_vec()
    };
    let trimmed = trim_trailing_nuls(&bytes);
    match std::str::from_utf8(trimmed) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(trimmed).into_owned(),
    }
}

fn trim_trailing_nuls(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
    &bytes[..end]
}

fn decode_inline(entry: &IfdEntry, byte_order: &ByteOrder) -> ExifValue {
    // `value_or_offset` was decoded from the original 4 file bytes with
    // `byte_order`; re-encoding with the same byte order recovers those
    // raw file bytes, left-justified, from which we take the first
    // `size` bytes for the declared (narrower) type.
    let bytes = match byte_order {
        ByteOrder::Little => entry.value_or_offset.to_le_bytes(),
        ByteOrder::Big => entry.value_or_offset.to_be_bytes(),
    };
    let size = format::type_size(entry.type_id).unwrap();
    decode_one(entry.type_id, &bytes[..size], byte_order).unwrap_or(ExifValue::Long(entry.value_or_offset))
}

fn decode_one(type_id: u16, bytes: &[u8], byte_order: &ByteOrder) -> Result<ExifValue> {
    Ok(match type_id {
        format::BYTE => ExifValue::Byte(bytes[0]),
        SBYTE => ExifValue::SignedByte(bytes[0] as i8),
        SHORT => ExifValue::Short(byte_order.read_u16(bytes)),
        SSHORT => ExifValue::SignedShort(byte_order.read_i16(bytes)),
        LONG => ExifValue::Long(byte_order.read_u32(bytes)),
        SLONG => ExifValue::SignedLong(byte_order.read_i32(bytes)),
        RATIONAL => ExifValue::rational(byte_order.read_u32(&bytes[0..4]), byte_order.read_u32(&bytes[4..8])),
        SRATIONAL => {
            ExifValue::signed_rational(byte_order.read_i32(&bytes[0..4]), byte_order.read_i32(&bytes[4..8]))
        }
        FLOAT => ExifValue::Float(byte_order.read_f32(bytes)),
        DOUBLE => ExifValue::Double(byte_order.read_f64(bytes)),
        other => return Err(Error::UnsupportedType(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mini_ifd() -> Vec<u8> {
        // 1 entry: tag=0x0100 (fake), type=SHORT, count=1, value=7 inline.
        let mut v = Vec::new();
        v.extend_from_slice(&1u16.to_le_bytes()); // entry count
        v.extend_from_slice(&0x0100u16.to_le_bytes()); // tag
        v.extend_from_slice(&SHORT.to_le_bytes()); // type
        v.extend_from_slice(&1u32.to_le_bytes()); // count
        v.extend_from_slice(&7u32.to_le_bytes()); // value (inline)
        v.extend_from_slice(&0u32.to_le_bytes()); // next ifd offset
        v
    }

    #[test]
    fn reads_inline_short() {
        let data = mini_ifd();
        let reader = IfdReader::new(&data, ByteOrder::Little);
        let ifd = reader.read_ifd(0).unwrap();
        assert_eq!(ifd.get(0x0100), Some(&ExifValue::Short(7)));
    }

    #[test]
    fn next_ifd_offset_zero_when_absent() {
        let data = mini_ifd();
        let reader = IfdReader::new(&data, ByteOrder::Little);
        assert_eq!(reader.next_ifd_offset(0).unwrap(), 0);
    }

    #[test]
    fn last_write_wins_on_duplicate_tags() {
        let mut v = Vec::new();
        v.extend_from_slice(&2u16.to_le_bytes());
        // entry 1: tag 0x10, value 1
        v.extend_from_slice(&0x10u16.to_le_bytes());
        v.extend_from_slice(&SHORT.to_le_bytes());
        v.extend_from_slice(&1u32.to_le_bytes());
        v.extend_from_slice(&1u32.to_le_bytes());
        // entry 2: tag 0x10 again, value 2
        v.extend_from_slice(&0x10u16.to_le_bytes());
        v.extend_from_slice(&SHORT.to_le_bytes());
        v.extend_from_slice(&1u32.to_le_bytes());
        v.extend_from_slice(&2u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());

        let reader = IfdReader::new(&v, ByteOrder::Little);
        let ifd = reader.read_ifd(0).unwrap();
        assert_eq!(ifd.get(0x10), Some(&ExifValue::Short(2)));
        assert_eq!(ifd.entries.len(), 2);
    }

    #[test]
    fn undefined_preserves_inner_offset() {
        let mut v = Vec::new();
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&0x927Cu16.to_le_bytes());
        v.extend_from_slice(&UNDEFINED.to_le_bytes());
        v.extend_from_slice(&128u32.to_le_bytes());
        v.extend_from_slice(&0x200u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());

        let reader = IfdReader::new(&v, ByteOrder::Little);
        let ifd = reader.read_ifd(0).unwrap();
        assert_eq!(
            ifd.get(0x927C),
            Some(&ExifValue::Undefined {
                count: 128,
                offset: 0x200
            })
        );
    }
}
