/// One component descriptor from a SOF3 (or SOS) segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub selector: u8,
}

/// Decoded SOF3 (lossless start-of-frame) segment.
#[derive(Debug, Clone)]
pub struct FrameHeader {
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<Component>,
}

impl FrameHeader {
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Parses a SOF3 segment body (everything after the 2-byte length
    /// field): 1 byte precision, 2 bytes height, 2 bytes width, 1 byte
    /// component count, then 3 bytes per component.
    pub fn parse(body: &[u8]) -> Option<FrameHeader> {
        if body.len() < 6 {
            return None;
        }
        let precision = body[0];
        let height = u16::from_be_bytes([body[1], body[2]]);
        let width = u16::from_be_bytes([body[3], body[4]]);
        let component_count = body[5] as usize;
        let need = 6 + component_count * 3;
        if body.len() < need {
            return None;
        }
        let mut components = Vec::with_capacity(component_count);
        for i in 0..component_count {
            let off = 6 + i * 3;
            let id = body[off];
            let sampling = body[off + 1];
            let selector = body[off + 2];
            components.push(Component {
                id,
                h_sampling: sampling >> 4,
                v_sampling: sampling & 0x0F,
                selector,
            });
        }
        Some(FrameHeader {
            precision,
            height,
            width,
            components,
        })
    }
}

/// Per-component Huffman table selection for one scan, plus the
/// predictor-selection value and the (unused in lossless) spectral
/// selection / approximation fields.
#[derive(Debug, Clone)]
pub struct ScanComponent {
    pub id: u8,
    pub td: u8,
    pub ta: u8,
}

#[derive(Debug, Clone)]
pub struct ScanHeader {
    pub components: Vec<ScanComponent>,
    pub psv: u8,
    pub se: u8,
    pub ah_al: u8,
}

impl ScanHeader {
    /// Parses a SOS segment body: 1 byte component count, 2 bytes per
    /// component (id, td/ta nibble), then ss (psv), se, ah/al.
    pub fn parse(body: &[u8]) -> Option<ScanHeader> {
        if body.is_empty() {
            return None;
        }
        let count = body[0] as usize;
        let need = 1 + count * 2 + 3;
        if body.len() < need {
            return None;
        }
        let mut components = Vec::with_capacity(count);
        for i in 0..count {
            let off = 1 + i * 2;
            let id = body[off];
            let tdta = body[off + 1];
            components.push(ScanComponent {
                id,
                td: tdta >> 4,
                ta: tdta & 0x0F,
            });
        }
        let tail_off = 1 + count * 2;
        Some(ScanHeader {
            components,
            psv: body[tail_off],
            se: body[tail_off + 1],
            ah_al: body[tail_off + 2],
        })
    }
}
