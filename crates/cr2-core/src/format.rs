/// Returns the byte width of one value of the given TIFF type id, per the
/// standard type table (1..12). Type 2 (ASCII) and type 7 (undefined) are
/// variable-length and reported as 1 (per-byte).
pub fn type_size(type_id: u16) -> Option<usize> {
    match type_id {
        1 | 2 | 6 | 7 => Some(1),
        3 | 8 => Some(2),
        4 | 9 | 11 => Some(4),
        5 | 10 | 12 => Some(8),
        _ => None,
    }
}

pub const BYTE: u16 = 1;
pub const ASCII: u16 = 2;
pub const SHORT: u16 = 3;
pub const LONG: u16 = 4;
pub const RATIONAL: u16 = 5;
pub const SBYTE: u16 = 6;
pub const UNDEFINED: u16 = 7;
pub const SSHORT: u16 = 8;
pub const SLONG: u16 = 9;
pub const SRATIONAL: u16 = 10;
pub const FLOAT: u16 = 11;
pub const DOUBLE: u16 = 12;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(type_size(BYTE), Some(1));
        assert_eq!(type_size(SHORT), Some(2));
        assert_eq!(type_size(LONG), Some(4));
        assert_eq!(type_size(RATIONAL), Some(8));
        assert_eq!(type_size(UNDEFINED), Some(1));
        assert_eq!(type_size(13), None);
    }
}
