use std::collections::HashMap;

use crate::bitreader::BitReader;
use crate::error::{Error, Result};

/// A canonical JPEG Huffman table: codes of length 1..16 mapping to 8-bit
/// symbols, built from a DHT segment's length-count array and symbol list.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanTable {
    /// `codes[len - 1]` maps a `len`-bit code value to its symbol.
    codes: [HashMap<u16, u8>; 16],
}

impl HuffmanTable {
    /// Builds a table from the 16 length counts (`l[i]` = number of codes
    /// of length `i + 1`) and the flattened symbol list, in the order
    /// DHT declares them, using the canonical JPEG code-generation rule.
    pub fn from_counts_and_symbols(counts: &[u8; 16], symbols: &[u8]) -> Self {
        let mut codes: [HashMap<u16, u8>; 16] = Default::default();
        let mut code: u16 = 0;
        let mut symbol_idx = 0;
        for (len_idx, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                codes[len_idx].insert(code, symbols[symbol_idx]);
                symbol_idx += 1;
                code += 1;
            }
            code <<= 1;
        }
        HuffmanTable { codes }
    }

    /// Parses one DHT table entry (the byte immediately after the
    /// segment-length field up through its symbol list) and returns
    /// `(class, destination, table, bytes_consumed)`.
    pub fn from_dht_entry(data: &[u8]) -> Result<(u8, u8, HuffmanTable, usize)> {
        if data.is_empty() {
            return Err(Error::CorruptedData("DHT entry truncated".into()));
        }
        let class_and_id = data[0];
        let class = class_and_id >> 4;
        let destination = class_and_id & 0x0F;
        if class != 0 {
            return Err(Error::CorruptedData(format!(
                "non-DC Huffman class {class} in lossless stream"
            )));
        }
        if data.len() < 17 {
            return Err(Error::CorruptedData("DHT length counts truncated".into()));
        }
        let mut counts = [0u8; 16];
        counts.copy_from_slice(&data[1..17]);
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        let symbols_end = 17 + total;
        if data.len() < symbols_end {
            return Err(Error::CorruptedData("DHT symbol list truncated".into()));
        }
        let symbols = &data[17..symbols_end];
        let table = HuffmanTable::from_counts_and_symbols(&counts, symbols);
        Ok((class, destination, table, symbols_end))
    }

    pub fn symbol_count(&self) -> usize {
        self.codes.iter().map(HashMap::len).sum()
    }

    /// Decodes the next Huffman symbol from `br`, trying code lengths
    /// 1..=16 in order and advancing the reader past the matched code.
    pub fn decode(&self, br: &mut BitReader) -> Result<u8> {
        for len in 1..=16u32 {
            let candidate = br.peek(len);
            if let Some(&symbol) = self.codes[(len - 1) as usize].get(&candidate) {
                br.advance(len);
                return Ok(symbol);
            }
        }
        Err(Error::CorruptedData("no Huffman prefix matched".into()))
    }
}
