pub mod writer {
    //! Testing utilities.
    #![allow(dead_code)]

    // The writer module is derived from ttf-parser, licenced under Apache-2.0.
    // https://github.com/RazrFalcon/ttf-parser/blob/439aaaebd50eb8aed66302e3c1b51fae047f85b2/src/writer.rs

    #[allow(missing_debug_implementations)]
    #[derive(Clone, Copy)]
    pub enum TtfType {
        Raw(&'static [u8]),
        UInt8(u8),
        Int16(i16),
        UInt16(u16),
        Int32(i32),
        UInt32(u32),
    }

    pub fn convert(values: &[TtfType]) -> Vec<u8> {
        let mut data = Vec::with_capacity(256);
        for v in values {
            convert_type(*v, &mut data);
        }

        data
    }

    pub fn convert_type(value: TtfType, data: &mut Vec<u8>) {
        match value {
            TtfType::Raw(bytes) => data.extend_from_slice(bytes),
            TtfType::UInt8(n) => data.push(n),
            TtfType::Int16(n) => data.extend_from_slice(&n.to_be_bytes()),
            TtfType::UInt16(n) => data.extend_from_slice(&n.to_be_bytes()),
            TtfType::Int32(n) => data.extend_from_slice(&n.to_be_bytes()),
            TtfType::UInt32(n) => data.extend_from_slice(&n.to_be_bytes()),
        }
    }

    #[derive(Debug)]
    pub struct Writer {
        pub data: Vec<u8>,
    }

    impl Writer {
        pub fn new() -> Self {
            Writer {
                data: Vec::with_capacity(256),
            }
        }

        pub fn offset(&self) -> usize {
            self.data.len()
        }

        pub fn write(&mut self, value: TtfType) {
            convert_type(value, &mut self.data);
        }

        pub fn write_bytes(&mut self, bytes: &[u8]) {
            self.data.extend_from_slice(bytes);
        }
    }
}

pub mod build {
    //! Builders for `kerx` table data.
    #![allow(dead_code)]

    use super::writer::{TtfType::*, Writer};

    /// Size of the `kerx` subtable header.
    pub const SUBTABLE_HEADER_SIZE: usize = 12;

    /// Size of a format 2 or 4 subtable body header.
    const CLASS_GRID_HEADER_SIZE: usize = 16;

    /// A `kerx` table with the given subtables.
    pub fn table(version: u16, subtables: &[Vec<u8>]) -> Vec<u8> {
        let mut w = Writer::new();
        w.write(UInt16(version));
        w.write(UInt16(0));
        w.write(UInt32(subtables.len() as u32));
        for subtable in subtables {
            w.write_bytes(subtable);
        }
        w.data
    }

    /// A subtable whose length covers the header and `body`.
    pub fn subtable(coverage: u32, body: &[u8]) -> Vec<u8> {
        let length = (SUBTABLE_HEADER_SIZE + body.len()) as u32;
        subtable_with_length(length, coverage, body)
    }

    /// A subtable declaring `length`, regardless of the size of `body`.
    pub fn subtable_with_length(length: u32, coverage: u32, body: &[u8]) -> Vec<u8> {
        let mut w = Writer::new();
        w.write(UInt32(length));
        w.write(UInt32(coverage));
        w.write(UInt32(0));
        w.write_bytes(body);
        w.data
    }

    /// A format 0 subtable body with binary search fields derived from the number of pairs.
    pub fn format0(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
        const PAIR_SIZE: u32 = 6;
        let n_pairs = pairs.len() as u32;
        let (search_range, entry_selector) = match n_pairs.checked_ilog2() {
            Some(log2) => ((1 << log2) * PAIR_SIZE, log2),
            None => (0, 0),
        };
        let range_shift = n_pairs * PAIR_SIZE - search_range;

        let mut w = Writer::new();
        w.write(UInt32(n_pairs));
        w.write(UInt32(search_range));
        w.write(UInt32(entry_selector));
        w.write(UInt32(range_shift));
        for &(left, right, value) in pairs {
            w.write(UInt16(left));
            w.write(UInt16(right));
            w.write(Int16(value));
        }
        w.data
    }

    /// A class table covering glyphs from `first_glyph`.
    pub fn class_table(first_glyph: u16, classes: &[u16]) -> Vec<u8> {
        let mut w = Writer::new();
        w.write(UInt16(first_glyph));
        w.write(UInt16(classes.len() as u16));
        for &class in classes {
            w.write(UInt16(class));
        }
        w.data
    }

    /// A format 2 or 4 subtable body: the header, then the left and right class tables, then
    /// the kerning array.
    pub fn class_grid(row_width: u32, left: &[u8], right: &[u8], values: &[i16]) -> Vec<u8> {
        let left_offset = SUBTABLE_HEADER_SIZE + CLASS_GRID_HEADER_SIZE;
        let right_offset = left_offset + left.len();
        let array_offset = right_offset + right.len();

        let mut w = Writer::new();
        w.write(UInt32(row_width));
        w.write(UInt32(left_offset as u32));
        w.write(UInt32(right_offset as u32));
        w.write(UInt32(array_offset as u32));
        w.write_bytes(left);
        w.write_bytes(right);
        for &value in values {
            w.write(Int16(value));
        }
        w.data
    }
}
