//! Minimal FITS primary-HDU (and, for `--compressed`, image-extension-HDU)
//! writer: just enough of the standard to satisfy the external interface
//! contract in spec section 6 (`SWCREATE`, `BITPIX=16`, `NAXIS=2`, plus
//! caller-supplied `(key, value, comment)` cards and a 2-D 16-bit data
//! unit). No tile compression is implemented for `--compressed`; see
//! `DESIGN.md` for why.

use std::io;
use std::path::Path;

use cr2_core::{ExifValue, Ifd};

const BLOCK_SIZE: usize = 2880;
const CARD_SIZE: usize = 80;

#[derive(Debug, Clone)]
pub enum CardValue {
    Str(String),
    Int(i64),
    Logical(bool),
    Float(f64),
}

#[derive(Debug, Clone)]
pub struct Card {
    pub keyword: String,
    pub value: CardValue,
    pub comment: Option<String>,
}

impl Card {
    pub fn str(keyword: &str, value: impl Into<String>, comment: Option<&str>) -> Self {
        Card {
            keyword: keyword.to_string(),
            value: CardValue::Str(value.into()),
            comment: comment.map(str::to_string),
        }
    }
}

pub struct FitsImage<'a> {
    pub data: &'a [u16],
    pub width: usize,
    pub height: usize,
}

fn format_value(value: &CardValue) -> String {
    match value {
        CardValue::Str(s) => {
            let escaped = s.replace('\'', "''");
            format!("'{:<8}'", escaped)
        }
        CardValue::Int(i) => i.to_string(),
        CardValue::Logical(b) => if *b { "T" } else { "F" }.to_string(),
        CardValue::Float(f) => format!("{f}"),
    }
}

fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let keyword = format!("{:<8}", card.keyword.to_uppercase());
    let value = format_value(&card.value);
    let value_field = match card.value {
        CardValue::Str(_) => format!("{value:<20}"),
        _ => format!("{value:>20}"),
    };
    let mut line = format!("{keyword}= {value_field}");
    if let Some(comment) = &card.comment {
        line.push_str(" / ");
        line.push_str(comment);
    }
    line.truncate(CARD_SIZE);
    let mut bytes = [b' '; CARD_SIZE];
    bytes[..line.len()].copy_from_slice(line.as_bytes());
    bytes
}

fn end_card() -> [u8; CARD_SIZE] {
    let mut bytes = [b' '; CARD_SIZE];
    bytes[..3].copy_from_slice(b"END");
    bytes
}

fn pad_block(buf: &mut Vec<u8>, fill: u8) {
    let rem = buf.len() % BLOCK_SIZE;
    if rem != 0 {
        buf.resize(buf.len() + (BLOCK_SIZE - rem), fill);
    }
}

fn header_block(cards: &[Card]) -> Vec<u8> {
    let mut buf = Vec::with_capacity((cards.len() + 1) * CARD_SIZE);
    for card in cards {
        buf.extend_from_slice(&format_card(card));
    }
    buf.extend_from_slice(&end_card());
    pad_block(&mut buf, b' ');
    buf
}

/// `BITPIX=16` data is signed; an unsigned 16-bit sample is stored as
/// `sample - 32768` with `BZERO=32768`/`BSCALE=1` cards recording the
/// offset, the standard FITS unsigned-integer convention.
fn data_block(samples: &[u16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        let signed = (s as i32 - 32768) as i16;
        buf.extend_from_slice(&signed.to_be_bytes());
    }
    pad_block(&mut buf, 0);
    buf
}

fn mandatory_cards(naxis: i64, width: usize, height: usize) -> Vec<Card> {
    let mut cards = vec![
        Card {
            keyword: "BITPIX".into(),
            value: CardValue::Int(16),
            comment: Some("16-bit unsigned sensor samples".into()),
        },
        Card {
            keyword: "NAXIS".into(),
            value: CardValue::Int(naxis),
            comment: None,
        },
    ];
    if naxis >= 1 {
        cards.push(Card {
            keyword: "NAXIS1".into(),
            value: CardValue::Int(width as i64),
            comment: None,
        });
    }
    if naxis >= 2 {
        cards.push(Card {
            keyword: "NAXIS2".into(),
            value: CardValue::Int(height as i64),
            comment: None,
        });
    }
    if naxis > 0 {
        cards.push(Card {
            keyword: "BZERO".into(),
            value: CardValue::Int(32768),
            comment: None,
        });
        cards.push(Card {
            keyword: "BSCALE".into(),
            value: CardValue::Int(1),
            comment: None,
        });
    }
    cards
}

fn sw_create_card() -> Card {
    Card::str("SWCREATE", "crtwo2fits", None)
}

/// Writes `image` to `path` as a FITS file: a single data-bearing primary
/// HDU, or (when `compressed`) a header-only primary HDU followed by one
/// `IMAGE` extension HDU carrying the data.
pub fn write_file(path: &Path, image: &FitsImage, extra_cards: &[Card], compressed: bool) -> io::Result<()> {
    let mut buf = Vec::new();

    if compressed {
        let mut primary = vec![Card {
            keyword: "SIMPLE".into(),
            value: CardValue::Logical(true),
            comment: Some("conforms to FITS standard".into()),
        }];
        primary.extend(mandatory_cards(0, 0, 0));
        primary.push(sw_create_card());
        primary.extend_from_slice(extra_cards);
        buf.extend(header_block(&primary));

        let mut ext = vec![Card {
            keyword: "XTENSION".into(),
            value: CardValue::Str("IMAGE".into()),
            comment: Some("image extension".into()),
        }];
        ext.extend(mandatory_cards(2, image.width, image.height));
        ext.push(Card {
            keyword: "PCOUNT".into(),
            value: CardValue::Int(0),
            comment: None,
        });
        ext.push(Card {
            keyword: "GCOUNT".into(),
            value: CardValue::Int(1),
            comment: None,
        });
        ext.push(sw_create_card());
        ext.extend_from_slice(extra_cards);
        buf.extend(header_block(&ext));
        buf.extend(data_block(image.data));
    } else {
        let mut primary = vec![Card {
            keyword: "SIMPLE".into(),
            value: CardValue::Logical(true),
            comment: Some("conforms to FITS standard".into()),
        }];
        primary.extend(mandatory_cards(2, image.width, image.height));
        primary.push(sw_create_card());
        primary.extend_from_slice(extra_cards);
        buf.extend(header_block(&primary));
        buf.extend(data_block(image.data));
    }

    std::fs::write(path, buf)
}

/// Finds the first populated EXIF timestamp tag in preference order
/// (`DateTimeOriginal`, `DateTimeDigitized`, `DateTime`, tags 36867/36868/306)
/// and reformats it as an ISO-8601 UTC string for a `DATE-OBS` card.
pub fn date_obs_from_exif(exif: &Ifd) -> Option<String> {
    const CANDIDATES: [u16; 3] = [
        cr2::tags::DATE_TIME_ORIGINAL,
        cr2::tags::DATE_TIME_DIGITIZED,
        cr2::tags::DATE_TIME,
    ];
    for tag in CANDIDATES {
        if let Some(ExifValue::Ascii(raw)) = exif.get(tag) {
            if let Some(iso) = exif_datetime_to_iso8601(raw) {
                return Some(iso);
            }
        }
    }
    None
}

/// Converts EXIF's `"YYYY:MM:DD HH:MM:SS"` timestamp into `"YYYY-MM-DDTHH:MM:SS"`.
fn exif_datetime_to_iso8601(raw: &str) -> Option<String> {
    let naive = chrono::NaiveDateTime::parse_from_str(raw.trim(), "%Y:%m:%d %H:%M:%S").ok()?;
    Some(naive.format("%Y-%m-%dT%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_is_exactly_80_bytes() {
        let card = Card::str("SWCREATE", "crtwo2fits", None);
        assert_eq!(format_card(&card).len(), CARD_SIZE);
    }

    #[test]
    fn header_block_is_padded_to_2880() {
        let cards = vec![sw_create_card()];
        let block = header_block(&cards);
        assert_eq!(block.len() % BLOCK_SIZE, 0);
        assert!(block.len() >= BLOCK_SIZE);
    }

    #[test]
    fn data_block_is_padded_to_2880() {
        let samples = vec![0u16; 10];
        let block = data_block(&samples);
        assert_eq!(block.len() % BLOCK_SIZE, 0);
    }

    #[test]
    fn unsigned_sample_round_trips_through_bzero() {
        let samples = vec![8192u16, 0, 65535];
        let block = data_block(&samples);
        for (i, &expected) in samples.iter().enumerate() {
            let bytes = [block[i * 2], block[i * 2 + 1]];
            let signed = i16::from_be_bytes(bytes);
            let recovered = (signed as i32 + 32768) as u16;
            assert_eq!(recovered, expected);
        }
    }

    #[test]
    fn parses_exif_timestamp_to_iso8601() {
        assert_eq!(
            exif_datetime_to_iso8601("2023:04:05 12:30:00"),
            Some("2023-04-05T12:30:00".to_string())
        );
    }

    #[test]
    fn rejects_malformed_exif_timestamp() {
        assert_eq!(exif_datetime_to_iso8601("not a date"), None);
    }
}
