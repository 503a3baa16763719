//! Lookup tables and extended state table headers.
//!
//! <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6Tables.html>

use std::cmp::Ordering;
use std::convert::TryFrom;

use crate::binary::read::{
    MinSize, Offset32, ReadArray, ReadBinary, ReadBinaryDep, ReadCtxt, ReadScope, ReadUnchecked,
};
use crate::binary::{U16Be, U32Be, U64Be, U8};
use crate::error::ParseError;
use crate::size;
use crate::SafeFrom;

/// End of text.
///
/// This class should not appear in the class array.
pub const CLASS_CODE_EOT: u16 = 0;

/// Out of bounds.
///
/// All glyph indexes that are not covered by the class lookup table are automatically assigned
/// class code 1. Class code 1 may also appear in the class array.
pub const CLASS_CODE_OOB: u16 = 1;

/// Deleted glyph.
///
/// Sometimes contextual processing removes a glyph from the glyph array by changing its glyph
/// index to the deleted glyph index, 0xFFFF. This glyph code is automatically assigned class
/// "deleted," which should not appear in the class array.
pub const CLASS_CODE_DELETED: u16 = 2;
pub const DELETED_GLYPH: u16 = 0xFFFF;

/// Classes 0 to 3 are predefined so every state table has at least four.
pub const MIN_CLASSES: u32 = 4;

/// Glyph value that marks the terminating unit of a binary search table.
const END_OF_SEARCH: u16 = 0xFFFF;

/// The size of the values held by a lookup table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueSize {
    U16,
    U32,
}

impl ValueSize {
    pub fn size(self) -> usize {
        match self {
            ValueSize::U16 => size::U16,
            ValueSize::U32 => size::U32,
        }
    }

    fn read(self, ctxt: &mut ReadCtxt<'_>) -> Result<u32, ParseError> {
        match self {
            ValueSize::U16 => Ok(u32::from(ctxt.read_u16be()?)),
            ValueSize::U32 => Ok(ctxt.read_u32be()?),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct LookupArgs {
    /// Number of glyphs in the font, which sizes a format 0 lookup table.
    pub n_glyphs: u16,
    pub value_size: ValueSize,
}

#[derive(Debug, Clone)]
pub enum LookupTable<'a> {
    /// Simple Array format 0
    Format0(LookupValues<'a>),
    /// Segment Single format 2
    Format2(BinSearchTable<'a>),
    /// Segment Array format 4
    Format4 {
        segments: BinSearchTable<'a>,
        /// Segment value offsets are relative to the start of the lookup table.
        table: ReadScope<'a>,
    },
    /// Single Table format 6
    Format6(BinSearchTable<'a>),
    /// Trimmed Array format 8
    Format8(TrimmedArray<'a>),
    /// Extended Trimmed Array format 10
    Format10(TrimmedArray<'a>),
}

/// An array of lookup values of one of the supported unit sizes.
#[derive(Debug, Clone)]
pub enum LookupValues<'a> {
    OneByte(ReadArray<'a, U8>),
    TwoByte(ReadArray<'a, U16Be>),
    FourByte(ReadArray<'a, U32Be>),
    EightByte(ReadArray<'a, U64Be>),
}

#[derive(Debug, Clone)]
pub struct TrimmedArray<'a> {
    first_glyph: u16,
    values: LookupValues<'a>,
}

/// The units of a lookup table that are located by binary search.
#[derive(Debug, Clone)]
pub struct BinSearchTable<'a> {
    unit_size: usize,
    n_units: usize,
    units: ReadScope<'a>,
    value_size: ValueSize,
}

#[derive(Debug, Clone, Copy)]
pub struct BinSrchHeader {
    unit_size: u16,
    n_units: u16,
}

impl ReadBinary for BinSrchHeader {
    type HostType<'a> = Self;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self, ParseError> {
        let unit_size = ctxt.read_u16be()?;
        let n_units = ctxt.read_u16be()?;

        // The searchRange, entrySelector, and rangeShift fields are redundant and only existed to
        // speed up searching on 1980s processors.
        let _search_range = ctxt.read_u16be()?;
        let _entry_selector = ctxt.read_u16be()?;
        let _range_shift = ctxt.read_u16be()?;

        Ok(BinSrchHeader { unit_size, n_units })
    }
}

impl<'a> BinSearchTable<'a> {
    /// Read the binary search header and take the units it describes.
    ///
    /// `min_unit_size` is the size of the fields the lookup format reads from each unit. The
    /// declared unit size may be larger and is used as the stride. `key_words` is the number of
    /// glyph fields at the start of each unit.
    fn read(
        ctxt: &mut ReadCtxt<'a>,
        min_unit_size: usize,
        key_words: usize,
        value_size: ValueSize,
    ) -> Result<Self, ParseError> {
        let header = ctxt.read::<BinSrchHeader>()?;
        let unit_size = usize::from(header.unit_size);
        ctxt.check(unit_size >= min_unit_size)?;

        // NOTE(mul): u16 * u16 fits in usize
        let units_len = unit_size * usize::from(header.n_units);
        ctxt.check_length(units_len <= ctxt.remaining())?;
        let units = ctxt.read_scope(units_len)?;

        let mut table = BinSearchTable {
            unit_size,
            n_units: usize::from(header.n_units),
            units,
            value_size,
        };
        // The last unit may be a terminator that is not part of the search.
        if let Some(last) = table.n_units.checked_sub(1) {
            if let Some(mut unit) = table.unit(last) {
                let keys = unit.read_array::<U16Be>(key_words)?;
                if keys.iter().all(|glyph| glyph == END_OF_SEARCH) {
                    table.n_units = last;
                }
            }
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.n_units
    }

    pub fn is_empty(&self) -> bool {
        self.n_units == 0
    }

    fn unit(&self, index: usize) -> Option<ReadCtxt<'a>> {
        let offset = index.checked_mul(self.unit_size)?;
        self.units
            .offset_length(offset, self.unit_size)
            .ok()
            .map(|scope| scope.ctxt())
    }

    fn units(&self) -> impl Iterator<Item = ReadCtxt<'a>> + '_ {
        (0..self.n_units).filter_map(move |index| self.unit(index))
    }

    /// Find the index of the unit for which `f` returns `Ordering::Equal`.
    fn binary_search<F>(&self, mut f: F) -> Option<usize>
    where
        F: FnMut(&mut ReadCtxt<'a>) -> Result<Ordering, ParseError>,
    {
        let mut left = 0;
        let mut right = self.n_units;
        while left < right {
            let mid = left + (right - left) / 2;
            let mut unit = self.unit(mid)?;
            match f(&mut unit).ok()? {
                Ordering::Less => left = mid + 1,
                Ordering::Greater => right = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Search segment units, which start with the last and first glyph they cover.
    fn find_segment(&self, glyph: u16) -> Option<ReadCtxt<'a>> {
        let index = self.binary_search(|unit| {
            let last_glyph = unit.read_u16be()?;
            let first_glyph = unit.read_u16be()?;
            Ok(if last_glyph < glyph {
                Ordering::Less
            } else if first_glyph > glyph {
                Ordering::Greater
            } else {
                Ordering::Equal
            })
        })?;
        self.unit(index)
    }

    /// Search single glyph units, which start with the glyph they cover.
    fn find_single(&self, glyph: u16) -> Option<ReadCtxt<'a>> {
        let index = self.binary_search(|unit| Ok(unit.read_u16be()?.cmp(&glyph)))?;
        self.unit(index)
    }
}

impl<'a> LookupValues<'a> {
    /// Read `count` values of `unit_size` bytes each.
    fn read(ctxt: &mut ReadCtxt<'a>, unit_size: usize, count: usize) -> Result<Self, ParseError> {
        let byte_len = count
            .checked_mul(unit_size)
            .ok_or(ParseError::LimitExceeded)?;
        ctxt.check_length(byte_len <= ctxt.remaining())?;

        let values = match unit_size {
            1 => LookupValues::OneByte(ctxt.read_array::<U8>(count)?),
            2 => LookupValues::TwoByte(ctxt.read_array::<U16Be>(count)?),
            4 => LookupValues::FourByte(ctxt.read_array::<U32Be>(count)?),
            8 => LookupValues::EightByte(ctxt.read_array::<U64Be>(count)?),
            _ => return Err(ParseError::BadValue),
        };
        Ok(values)
    }

    pub fn len(&self) -> usize {
        match self {
            LookupValues::OneByte(array) => array.len(),
            LookupValues::TwoByte(array) => array.len(),
            LookupValues::FourByte(array) => array.len(),
            LookupValues::EightByte(array) => array.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value at `index`, if present and representable as `u32`.
    pub fn get(&self, index: usize) -> Option<u32> {
        match self {
            LookupValues::OneByte(array) => array.get_item(index).map(u32::from),
            LookupValues::TwoByte(array) => array.get_item(index).map(u32::from),
            LookupValues::FourByte(array) => array.get_item(index),
            LookupValues::EightByte(array) => {
                array.get_item(index).and_then(|value| u32::try_from(value).ok())
            }
        }
    }
}

impl<'a> TrimmedArray<'a> {
    fn new(first_glyph: u16, values: LookupValues<'a>) -> Result<Self, ParseError> {
        // The covered glyph range must be representable
        let len = u16::try_from(values.len())?;
        first_glyph.checked_add(len).ok_or(ParseError::BadValue)?;
        Ok(TrimmedArray {
            first_glyph,
            values,
        })
    }

    pub fn lookup(&self, glyph: u16) -> Option<u32> {
        let index = glyph.checked_sub(self.first_glyph)?;
        self.values.get(usize::from(index))
    }
}

impl MinSize for LookupTable<'_> {
    const MIN_SIZE: usize = size::U16;
}

impl ReadBinaryDep for LookupTable<'_> {
    type Args<'a> = LookupArgs;
    type HostType<'a> = LookupTable<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        args: LookupArgs,
    ) -> Result<Self::HostType<'a>, ParseError> {
        let table = ctxt.scope();
        let value_size = args.value_size;
        let format = ctxt.read_u16be()?;

        match format {
            0 => {
                let values =
                    LookupValues::read(ctxt, value_size.size(), usize::from(args.n_glyphs))?;
                Ok(LookupTable::Format0(values))
            }
            2 => {
                // LookupSegment: lastGlyph, firstGlyph, value
                let segments =
                    BinSearchTable::read(ctxt, 2 * size::U16 + value_size.size(), 2, value_size)?;
                Ok(LookupTable::Format2(segments))
            }
            4 => {
                // LookupSegment: lastGlyph, firstGlyph, offset to values
                let segments = BinSearchTable::read(ctxt, 3 * size::U16, 2, value_size)?;
                for mut unit in segments.units() {
                    let last_glyph = unit.read_u16be()?;
                    let first_glyph = unit.read_u16be()?;
                    let offset = unit.read_u16be()?;
                    let count = last_glyph
                        .checked_sub(first_glyph)
                        .ok_or(ParseError::BadValue)?;
                    let mut values = table.resolve(usize::from(offset), 0)?.ctxt();
                    LookupValues::read(&mut values, value_size.size(), usize::from(count) + 1)?;
                }
                Ok(LookupTable::Format4 { segments, table })
            }
            6 => {
                // LookupSingle: glyph, value
                let entries =
                    BinSearchTable::read(ctxt, size::U16 + value_size.size(), 1, value_size)?;
                Ok(LookupTable::Format6(entries))
            }
            8 => {
                let first_glyph = ctxt.read_u16be()?;
                let glyph_count = ctxt.read_u16be()?;
                let values =
                    LookupValues::read(ctxt, value_size.size(), usize::from(glyph_count))?;
                TrimmedArray::new(first_glyph, values).map(LookupTable::Format8)
            }
            10 => {
                // Size of a lookup unit for this lookup table in bytes. Allowed values are 1, 2, 4,
                // and 8.
                let unit_size = ctxt.read_u16be()?;
                let first_glyph = ctxt.read_u16be()?;
                let glyph_count = ctxt.read_u16be()?;
                let values =
                    LookupValues::read(ctxt, usize::from(unit_size), usize::from(glyph_count))?;
                TrimmedArray::new(first_glyph, values).map(LookupTable::Format10)
            }
            _ => Err(ParseError::BadValue),
        }
    }
}

impl<'a> LookupTable<'a> {
    /// Look up the value for `glyph`, returning `None` if the table does not cover it.
    pub fn lookup(&self, glyph: u16) -> Option<u32> {
        match self {
            LookupTable::Format0(values) => values.get(usize::from(glyph)),
            LookupTable::Format2(segments) => {
                let mut unit = segments.find_segment(glyph)?;
                let _last_glyph = unit.read_u16be().ok()?;
                let _first_glyph = unit.read_u16be().ok()?;
                segments.value_size.read(&mut unit).ok()
            }
            LookupTable::Format4 { segments, table } => {
                let mut unit = segments.find_segment(glyph)?;
                let _last_glyph = unit.read_u16be().ok()?;
                let first_glyph = unit.read_u16be().ok()?;
                let offset = unit.read_u16be().ok()?;
                // NOTE(sub): glyph is within the segment
                let index = usize::from(glyph - first_glyph);
                let value_size = segments.value_size.size();
                let value_offset = usize::from(offset).checked_add(index * value_size)?;
                let mut ctxt = table.offset_length(value_offset, value_size).ok()?.ctxt();
                segments.value_size.read(&mut ctxt).ok()
            }
            LookupTable::Format6(entries) => {
                let mut unit = entries.find_single(glyph)?;
                let _glyph = unit.read_u16be().ok()?;
                entries.value_size.read(&mut unit).ok()
            }
            LookupTable::Format8(array) | LookupTable::Format10(array) => array.lookup(glyph),
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct StateTableArgs {
    pub n_glyphs: u16,
    /// The size of an entry in the entry table, which depends on the table using it.
    pub entry_size: usize,
}

/// Extended state table header (STXHeader) and the structures it refers to.
///
/// All offsets are relative to the start of the header.
#[derive(Debug, Clone)]
pub struct ExtendedStateTable<'a> {
    n_classes: u32,
    class_table: LookupTable<'a>,
    state_array: ReadScope<'a>,
    entry_table: ReadScope<'a>,
}

impl ExtendedStateTable<'_> {
    /// The size of the header: nClasses and three offsets.
    pub const HEADER_SIZE: usize = 4 * size::U32;
}

impl MinSize for ExtendedStateTable<'_> {
    const MIN_SIZE: usize = Self::HEADER_SIZE;
}

impl ReadBinaryDep for ExtendedStateTable<'_> {
    type Args<'a> = StateTableArgs;
    type HostType<'a> = ExtendedStateTable<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        args: StateTableArgs,
    ) -> Result<Self::HostType<'a>, ParseError> {
        let table = ctxt.scope();
        let n_classes = ctxt.read_u32be()?;
        ctxt.check(n_classes >= MIN_CLASSES)?;
        let class_table_offset = ctxt.read::<Offset32<LookupTable<'_>>>()?;
        let state_array_offset = ctxt.read_u32be()?;
        let entry_table_offset = ctxt.read_u32be()?;

        let lookup_args = LookupArgs {
            n_glyphs: args.n_glyphs,
            value_size: ValueSize::U16,
        };
        let class_table = class_table_offset
            .resolve_dep(table, lookup_args)?
            .ok_or(ParseError::BadOffset)?;

        // There is always at least one state, and one entry for it to refer to.
        let row_size = usize::safe_from(n_classes)
            .checked_mul(size::U16)
            .ok_or(ParseError::LimitExceeded)?;
        let state_array = table.resolve(usize::safe_from(state_array_offset), row_size)?;
        let entry_table = table.resolve(usize::safe_from(entry_table_offset), args.entry_size)?;

        Ok(ExtendedStateTable {
            n_classes,
            class_table,
            state_array,
            entry_table,
        })
    }
}

impl<'a> ExtendedStateTable<'a> {
    pub fn n_classes(&self) -> u32 {
        self.n_classes
    }

    pub fn class_table(&self) -> &LookupTable<'a> {
        &self.class_table
    }

    /// The class of `glyph`. Glyphs the class table does not cover are out of bounds.
    pub fn class(&self, glyph: u16) -> u16 {
        if glyph == DELETED_GLYPH {
            return CLASS_CODE_DELETED;
        }
        self.class_table
            .lookup(glyph)
            .and_then(|class| u16::try_from(class).ok())
            .unwrap_or(CLASS_CODE_OOB)
    }

    /// The row of the state array for `state`, holding an entry index for each class.
    pub fn state_row(&self, state: u16) -> Option<ReadArray<'a, U16Be>> {
        let n_classes = usize::safe_from(self.n_classes);
        let row_size = n_classes.checked_mul(size::U16)?;
        let offset = usize::from(state).checked_mul(row_size)?;
        let row = self.state_array.offset_length(offset, row_size).ok()?;
        row.ctxt().read_array::<U16Be>(n_classes).ok()
    }

    /// Read entry `index` of the entry table as a `T`.
    pub fn entry<T: ReadUnchecked>(&self, index: u16) -> Option<T::HostType> {
        let offset = usize::from(index).checked_mul(T::SIZE)?;
        self.entry_table
            .offset_length(offset, T::SIZE)
            .ok()?
            .read::<T>()
            .ok()
    }
}
