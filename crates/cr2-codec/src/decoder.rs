use std::collections::HashMap;

use crate::bitreader::BitReader;
use crate::error::{Error, Result};
use crate::frame::{FrameHeader, ScanHeader};
use crate::huffman::HuffmanTable;

const SOI: u16 = 0xFFD8;
const EOI: u16 = 0xFFD9;
const DHT: u8 = 0xC4;
const SOF3: u8 = 0xC3;
const SOS: u8 = 0xDA;

/// The decoded lossless-JPEG payload: frame/scan metadata plus the
/// decoder's raw raster output (row-major, `frame.height` rows of
/// `frame.width * component_count` samples each, still in slice order —
/// reassembly into true sensor columns is `reassemble::reassemble`'s job).
pub struct DecodedRaster {
    pub frame: FrameHeader,
    pub scan: ScanHeader,
    pub width: usize,
    pub height: usize,
    pub samples: Vec<u16>,
}

/// Decodes one lossless-JPEG strip (SOI..EOI) as found at a CR2 IFD3
/// strip offset.
pub fn decode(strip: &[u8]) -> Result<DecodedRaster> {
    if strip.len() < 4 {
        return Err(Error::InvalidMarker("strip too short for SOI/EOI".into()));
    }
    let soi = u16::from_be_bytes([strip[0], strip[1]]);
    let eoi = u16::from_be_bytes([strip[strip.len() - 2], strip[strip.len() - 1]]);
    if soi != SOI {
        return Err(Error::InvalidMarker(format!("expected SOI, found {soi:04X}")));
    }
    if eoi != EOI {
        return Err(Error::InvalidMarker(format!("expected EOI, found {eoi:04X}")));
    }

    let mut pos = 2usize;
    let mut dht_tables: HashMap<u8, HuffmanTable> = HashMap::new();
    let mut frame: Option<FrameHeader> = None;
    let mut scan: Option<ScanHeader> = None;
    let mut scan_data_start = 0usize;

    while pos + 4 <= strip.len() {
        if strip[pos] != 0xFF {
            return Err(Error::InvalidMarker(format!(
                "expected marker at offset {pos}, found {:02X}",
                strip[pos]
            )));
        }
        let marker = strip[pos + 1];
        let seg_len = u16::from_be_bytes([strip[pos + 2], strip[pos + 3]]) as usize;
        let seg_end = pos + 2 + seg_len;
        if seg_end > strip.len() {
            return Err(Error::CorruptedData("segment runs past end of strip".into()));
        }
        let body = &strip[pos + 4..seg_end];

        match marker {
            DHT => {
                let mut off = 0;
                while off < body.len() {
                    let (_, destination, table, consumed) = HuffmanTable::from_dht_entry(&body[off..])?;
                    dht_tables.insert(destination, table);
                    off += consumed;
                }
                pos = seg_end;
            }
            SOF3 => {
                frame = Some(
                    FrameHeader::parse(body)
                        .ok_or_else(|| Error::CorruptedData("malformed SOF3 segment".into()))?,
                );
                pos = seg_end;
            }
            SOS => {
                scan = Some(
                    ScanHeader::parse(body).ok_or_else(|| Error::CorruptedData("malformed SOS segment".into()))?,
                );
                scan_data_start = seg_end;
                break;
            }
            _ => {
                pos = seg_end;
            }
        }
    }

    let frame = frame.ok_or_else(|| Error::CorruptedData("missing SOF3 segment".into()))?;
    let scan = scan.ok_or_else(|| Error::CorruptedData("missing SOS segment".into()))?;

    let component_count = scan.components.len();
    if component_count == 0 || component_count != frame.component_count() {
        return Err(Error::CorruptedData(
            "scan component count disagrees with frame".into(),
        ));
    }

    let mut scan_tables = Vec::with_capacity(component_count);
    for sc in &scan.components {
        let table = dht_tables
            .get(&sc.td)
            .ok_or_else(|| Error::CorruptedData(format!("no DHT for destination {}", sc.td)))?;
        scan_tables.push(table.clone());
    }
    let same_tables = scan_tables.windows(2).all(|w| w[0] == w[1]);

    let width = frame.width as usize * component_count;
    let height = frame.height as usize;
    let precision = frame.precision as u32;
    let mut samples = vec![0u16; width * height];
    let mut predictor_reg = vec![1i32 << (precision - 1); component_count];

    let mut br = BitReader::new(&strip[scan_data_start..]);
    let mut symbol_index: usize = 0;

    for row in 0..height {
        let row_start = row * width;
        for x in 0..width {
            let table = if same_tables {
                &scan_tables[0]
            } else {
                &scan_tables[symbol_index % scan_tables.len()]
            };
            symbol_index += 1;

            let s = table.decode(&mut br)? as u32;
            if s > 16 {
                return Err(Error::CorruptedData(format!("implausible magnitude category {s}")));
            }
            let m = if s == 0 { 0 } else { br.read_bits(s) as u32 };
            let delta = extend(m, s);

            let sample = if x < component_count {
                let updated = predictor_reg[x] + delta;
                predictor_reg[x] = updated;
                updated
            } else {
                let left = samples[row_start + x - component_count] as i32;
                let (top, top_left) = if row == 0 {
                    (0, 0)
                } else {
                    let prev_start = row_start - width;
                    (
                        samples[prev_start + x] as i32,
                        samples[prev_start + x - component_count] as i32,
                    )
                };
                predict(scan.psv, left, top, top_left) + delta
            };
            samples[row_start + x] = sample as u16;
        }
    }

    Ok(DecodedRaster {
        frame,
        scan,
        width,
        height,
        samples,
    })
}

fn extend(m: u32, s: u32) -> i32 {
    if s == 0 {
        return 0;
    }
    let half = 1u32 << (s - 1);
    if m < half {
        m as i32 - ((1i64 << s) as i32 - 1)
    } else {
        m as i32
    }
}

fn predict(psv: u8, left: i32, top: i32, top_left: i32) -> i32 {
    match psv {
        0 => 0,
        1 => left,
        2 => top,
        3 => top_left,
        4 => left + top - top_left,
        5 => left + ((top - top_left) >> 1),
        6 => top + ((left - top_left) >> 1),
        7 => (top - left) >> 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build_strip(psv: u8, component_count: u8, width: u16, height: u16) -> Vec<u8> {
        let mut s = Vec::new();
        s.extend_from_slice(&[0xFF, 0xD8]); // SOI

        // DHT: single table, one symbol of length 1 ("0" -> symbol 0),
        // i.e. every decoded magnitude category is 0 (delta always 0).
        let mut dht_body = vec![0x00u8]; // class 0, destination 0
        let mut counts = [0u8; 16];
        counts[0] = 1;
        dht_body.extend_from_slice(&counts);
        dht_body.push(0); // symbol 0
        s.extend_from_slice(&[0xFF, DHT]);
        s.extend_from_slice(&((dht_body.len() + 2) as u16).to_be_bytes());
        s.extend_from_slice(&dht_body);

        // SOF3
        let mut sof_body = vec![14u8];
        sof_body.extend_from_slice(&height.to_be_bytes());
        sof_body.extend_from_slice(&width.to_be_bytes());
        sof_body.push(component_count);
        for c in 0..component_count {
            sof_body.push(c + 1);
            sof_body.push(0x11);
            sof_body.push(0);
        }
        s.extend_from_slice(&[0xFF, SOF3]);
        s.extend_from_slice(&((sof_body.len() + 2) as u16).to_be_bytes());
        s.extend_from_slice(&sof_body);

        // SOS
        let mut sos_body = vec![component_count];
        for c in 0..component_count {
            sos_body.push(c + 1);
            sos_body.push(0x00); // td=0, ta=0
        }
        sos_body.push(psv);
        sos_body.push(0);
        sos_body.push(0);
        s.extend_from_slice(&[0xFF, SOS]);
        s.extend_from_slice(&((sos_body.len() + 2) as u16).to_be_bytes());
        s.extend_from_slice(&sos_body);

        // entropy data: one "0" bit per sample (all-zero deltas)
        let total_samples = width as usize * component_count as usize * height as usize;
        let mut bits = Vec::new();
        for _ in 0..total_samples {
            bits.push(false);
        }
        let mut byte = 0u8;
        let mut nbits = 0u8;
        for b in bits {
            byte = (byte << 1) | (b as u8);
            nbits += 1;
            if nbits == 8 {
                s.push(byte);
                if byte == 0xFF {
                    s.push(0x00);
                }
                byte = 0;
                nbits = 0;
            }
        }
        if nbits > 0 {
            byte <<= 8 - nbits;
            s.push(byte);
            if byte == 0xFF {
                s.push(0x00);
            }
        }

        s.extend_from_slice(&[0xFF, 0xD9]); // EOI
        s
    }

    #[test]
    fn all_zero_delta_yields_constant_predictor_seed() {
        let strip = build_strip(1, 2, 2, 4);
        let decoded = decode(&strip).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 4);
        assert!(decoded.samples.iter().all(|&v| v == 1 << 13));
    }

    #[test]
    fn rejects_bad_soi() {
        let mut strip = build_strip(1, 2, 2, 4);
        strip[0] = 0x00;
        assert!(matches!(decode(&strip), Err(Error::InvalidMarker(_))));
    }

    #[test]
    fn rejects_bad_eoi() {
        let mut strip = build_strip(1, 2, 2, 4);
        let n = strip.len();
        strip[n - 1] = 0xD8;
        assert!(matches!(decode(&strip), Err(Error::InvalidMarker(_))));
    }

    #[test]
    fn predictor_table_matches_spec() {
        assert_eq!(predict(0, 5, 9, 3), 0);
        assert_eq!(predict(1, 5, 9, 3), 5);
        assert_eq!(predict(2, 5, 9, 3), 9);
        assert_eq!(predict(3, 5, 9, 3), 3);
        assert_eq!(predict(4, 5, 9, 3), 5 + 9 - 3);
        assert_eq!(predict(5, 5, 9, 3), 5 + ((9 - 3) >> 1));
        assert_eq!(predict(6, 5, 9, 3), 9 + ((5 - 3) >> 1));
        assert_eq!(predict(7, 5, 9, 3), (9 - 5) >> 1);
    }

    #[test]
    fn extend_matches_jpeg_magnitude_rule() {
        assert_eq!(extend(0, 0), 0);
        assert_eq!(extend(1, 1), 1);
        assert_eq!(extend(0, 1), -1);
        assert_eq!(extend(3, 2), 3);
        assert_eq!(extend(2, 2), 2);
    }

    proptest! {
        #[test]
        fn predictor_matches_table_for_arbitrary_neighbors(
            psv in 0u8..=7u8,
            left in -20_000i32..20_000,
            top in -20_000i32..20_000,
            top_left in -20_000i32..20_000,
        ) {
            let expected = match psv {
                0 => 0,
                1 => left,
                2 => top,
                3 => top_left,
                4 => left + top - top_left,
                5 => left + ((top - top_left) >> 1),
                6 => top + ((left - top_left) >> 1),
                7 => (top - left) >> 1,
                _ => unreachable!(),
            };
            prop_assert_eq!(predict(psv, left, top, top_left), expected);
        }

        #[test]
        fn extend_respects_jpeg_magnitude_sign_rule(s in 1u32..=16u32, raw in 0u32..(1u32 << 16)) {
            let m = raw % (1u32 << s);
            let half = 1u32 << (s - 1);
            let value = extend(m, s);
            if m < half {
                prop_assert!(value < 0);
                prop_assert!(value >= -(((1i64 << s) - 1) as i32));
            } else {
                prop_assert!(value >= 0);
                prop_assert!(value < (1i64 << s) as i32);
            }
        }
    }
}
