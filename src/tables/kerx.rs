#![deny(missing_docs)]

//! `kerx` table parsing.
//!
//! <https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6kerx.html>
//!
//! Reading a [KerxTable] validates the whole table: every subtable header, every offset and
//! every declared count is checked against the data before the read succeeds. The subtables of
//! a table that was read successfully can then be visited with [KerxTable::subtables].

use bitflags::bitflags;
use log::{debug, warn};

use crate::binary::read::{
    MinSize, Offset32, ReadArray, ReadBinary, ReadBinaryDep, ReadCtxt, ReadFrom, ReadScope,
    VarSize,
};
use crate::binary::{I16Be, U16Be, U32Be};
use crate::error::ParseError;
use crate::size;
use crate::tables::aat::{ExtendedStateTable, LookupArgs, LookupTable, StateTableArgs, ValueSize};
use crate::tag::{self, DisplayTag};
use crate::SafeFrom;

/// Mask selecting the format tag from the coverage field.
const FORMAT_MASK: u32 = 0x0000_00FF;

/// `kerx` Extended Kerning Table.
#[derive(Debug)]
pub struct KerxTable<'a> {
    version: u16,
    subtable_count: u32,
    n_glyphs: u16,
    /// The data following the table header.
    subtables: ReadScope<'a>,
}

/// Iterator over the subtables of a [KerxTable], in the order they appear in the data.
pub struct KerxSubtables<'a> {
    ctxt: ReadCtxt<'a>,
    remaining: u32,
    n_glyphs: u16,
}

/// The header that starts every `kerx` subtable.
#[derive(Debug, Copy, Clone)]
pub struct KerxSubtableHeader {
    /// The length of the subtable in bytes, including this header.
    length: u32,
    /// Coverage flags and the subtable format.
    coverage: Coverage,
    /// The tuple count, used by variation subtables.
    tuple_count: u32,
}

bitflags! {
    /// Flags held in the high bits of the subtable coverage field.
    ///
    /// The low byte of the coverage field is the subtable format, see [Coverage::format].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Coverage: u32 {
        /// Set if the subtable has vertical kerning values.
        const VERTICAL = 0x8000_0000;
        /// Set if the subtable has cross-stream kerning values.
        const CROSS_STREAM = 0x4000_0000;
        /// Set if the subtable has variation kerning values.
        const VARIATION = 0x2000_0000;
        /// Set if glyphs are processed from last to first.
        const PROCESS_DIRECTION = 0x1000_0000;
        // 0x0FFFFF00 reserved, 0x000000FF format
    }
}

/// A `kerx` subtable.
#[derive(Debug)]
pub struct KerxSubtable<'a> {
    header: KerxSubtableHeader,
    body: KerxSubtableBody<'a>,
}

/// The format specific part of a `kerx` subtable.
#[derive(Debug)]
pub enum KerxSubtableBody<'a> {
    /// Ordered list of kerning pairs.
    Format0(KerxFormat0<'a>),
    /// State table for contextual kerning.
    Format1(KerxFormat1<'a>),
    /// Simple n x m array of kerning values.
    Format2(KerxClassGrid<'a>),
    /// Control point or anchor point positioning, stored as a class grid.
    Format4(KerxClassGrid<'a>),
    /// Simple index-based n x m array of kerning values.
    Format6(KerxFormat6<'a>),
    /// A subtable with a format this crate does not interpret.
    ///
    /// The subtable header is valid but the body has not been read.
    Unsupported(u8),
}

/// Format 0 subtable: ordered list of kerning pairs.
#[derive(Debug)]
pub struct KerxFormat0<'a> {
    /// The largest power of two less than or equal to nPairs, multiplied by the size of a pair.
    search_range: u32,
    /// log2 of the largest power of two less than or equal to nPairs.
    entry_selector: u32,
    /// nPairs minus the largest power of two less than or equal to nPairs, multiplied by the
    /// size of a pair.
    range_shift: u32,
    pairs: ReadArray<'a, KerxPair>,
}

/// Kerning value for a pair of glyphs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KerxPair {
    left: u16,
    right: u16,
    value: i16,
}

/// Format 1 subtable: contextual kerning driven by a state table.
#[derive(Debug)]
pub struct KerxFormat1<'a> {
    state_table: ExtendedStateTable<'a>,
    values: ReadArray<'a, I16Be>,
}

/// An entry in the entry table of a format 1 subtable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KerxEntry {
    /// The state to move to.
    pub new_state: u16,
    /// Actions to perform.
    pub flags: KerxEntryFlags,
    /// Index into the value table of the first kerning value, or 0xFFFF for none.
    pub value_index: u16,
}

bitflags! {
    /// Flags of a format 1 [KerxEntry].
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct KerxEntryFlags: u16 {
        /// Push this glyph onto the kerning stack.
        const PUSH = 0x8000;
        /// Don't advance to the next glyph before going to the new state.
        const DONT_ADVANCE = 0x4000;
        /// Reset the cross-stream kerning.
        const RESET = 0x2000;
        // 0x1FFF reserved
    }
}

/// Class grid used by format 2 and format 4 subtables.
///
/// Offsets held by the grid are relative to the start of the subtable.
#[derive(Debug)]
pub struct KerxClassGrid<'a> {
    /// The number of bytes in a row of the kerning array.
    row_width: u32,
    left_classes: Option<ClassTable<'a>>,
    right_classes: Option<ClassTable<'a>>,
    /// The kerning array, running up to the end of the subtable.
    array: Option<ReadScope<'a>>,
}

/// Glyph class table of a class grid subtable.
#[derive(Debug)]
pub struct ClassTable<'a> {
    first_glyph: u16,
    classes: ReadArray<'a, U16Be>,
}

/// Format 6 subtable: kerning values indexed by row and column lookup tables.
#[derive(Debug)]
pub struct KerxFormat6<'a> {
    flags: u32,
    row_count: u16,
    column_count: u16,
    row_indices: Option<LookupTable<'a>>,
    column_indices: Option<LookupTable<'a>>,
    /// The kerning array, running up to the end of the subtable.
    array: Option<ReadScope<'a>>,
    /// The kerning vector, running up to the end of the subtable.
    vector: Option<ReadScope<'a>>,
}

impl KerxTable<'_> {
    /// The earliest supported table version.
    pub const MIN_VERSION: u16 = 2;
}

impl ReadBinaryDep for KerxTable<'_> {
    /// The number of glyphs in the font.
    type Args<'a> = u16;
    type HostType<'a> = KerxTable<'a>;

    fn read_dep<'a>(ctxt: &mut ReadCtxt<'a>, n_glyphs: u16) -> Result<KerxTable<'a>, ParseError> {
        let version = ctxt.read_u16be()?;
        ctxt.check_version(version >= KerxTable::MIN_VERSION)?;
        let _padding = ctxt.read_u16be()?;
        let subtable_count = ctxt.read_u32be()?;

        let subtables = ctxt.scope();
        for index in 0..subtable_count {
            let position = ctxt.scope().base();
            if let Err(err) = ctxt.read_dep::<KerxSubtable<'_>>(n_glyphs) {
                debug!(
                    "{} subtable {} at {} rejected: {}",
                    DisplayTag(tag::KERX),
                    index,
                    position,
                    err
                );
                return Err(err);
            }
        }

        Ok(KerxTable {
            version,
            subtable_count,
            n_glyphs,
            subtables,
        })
    }
}

impl<'a> KerxTable<'a> {
    /// The table version.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// The number of subtables in the table.
    pub fn subtable_count(&self) -> u32 {
        self.subtable_count
    }

    /// Iterate over the subtables of this table.
    pub fn subtables(&self) -> KerxSubtables<'a> {
        KerxSubtables {
            ctxt: self.subtables.ctxt(),
            remaining: self.subtable_count,
            n_glyphs: self.n_glyphs,
        }
    }
}

impl<'a> Iterator for KerxSubtables<'a> {
    type Item = KerxSubtable<'a>;

    fn next(&mut self) -> Option<KerxSubtable<'a>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match self.ctxt.read_dep::<KerxSubtable<'_>>(self.n_glyphs) {
            Ok(subtable) => Some(subtable),
            Err(err) => {
                // Subtables were all read when the table was, so this is not expected
                warn!("{} subtable unreadable: {}", DisplayTag(tag::KERX), err);
                self.remaining = 0;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(usize::safe_from(self.remaining)))
    }
}

impl KerxSubtableHeader {
    /// The size of the header in bytes.
    pub const SIZE: usize = 3 * size::U32;

    /// The length of the subtable in bytes, including the header.
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Coverage flags of the subtable.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// The tuple count of a variation subtable.
    pub fn tuple_count(&self) -> u32 {
        self.tuple_count
    }
}

impl ReadFrom for KerxSubtableHeader {
    type ReadType = (U32Be, U32Be, U32Be);

    fn read_from((length, coverage, tuple_count): (u32, u32, u32)) -> Self {
        KerxSubtableHeader {
            length,
            coverage: Coverage::from_bits_retain(coverage),
            tuple_count,
        }
    }
}

impl Coverage {
    /// The subtable format.
    pub fn format(self) -> u8 {
        // NOTE(cast): masked to 8 bits
        (self.bits() & FORMAT_MASK) as u8
    }
}

impl MinSize for KerxSubtable<'_> {
    const MIN_SIZE: usize = KerxSubtableHeader::SIZE;
}

impl ReadBinaryDep for KerxSubtable<'_> {
    /// The number of glyphs in the font.
    type Args<'a> = u16;
    type HostType<'a> = KerxSubtable<'a>;

    /// Read a subtable and advance `ctxt` past it, by the length the subtable declares.
    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        n_glyphs: u16,
    ) -> Result<KerxSubtable<'a>, ParseError> {
        let start = ctxt.scope();
        let header = ctxt.read::<KerxSubtableHeader>()?;
        let length = usize::safe_from(header.length);
        ctxt.check_length(length >= KerxSubtableHeader::SIZE)?;
        let _body = ctxt.read_slice(length - KerxSubtableHeader::SIZE)?;

        // Offsets in the subtable body are relative to the start of the subtable
        let subtable = start.offset_length(0, length)?;
        let mut body = subtable.offset(KerxSubtableHeader::SIZE).ctxt();
        let body = match header.coverage.format() {
            0 => KerxSubtableBody::Format0(body.read::<KerxFormat0<'_>>()?),
            1 => KerxSubtableBody::Format1(body.read_dep::<KerxFormat1<'_>>(n_glyphs)?),
            2 => KerxSubtableBody::Format2(body.read_dep::<KerxClassGrid<'_>>(subtable)?),
            4 => KerxSubtableBody::Format4(body.read_dep::<KerxClassGrid<'_>>(subtable)?),
            6 => {
                KerxSubtableBody::Format6(body.read_dep::<KerxFormat6<'_>>((subtable, n_glyphs))?)
            }
            format => {
                debug!(
                    "{} subtable format {} at {} not supported, skipping",
                    DisplayTag(tag::KERX),
                    format,
                    subtable.base()
                );
                KerxSubtableBody::Unsupported(format)
            }
        };

        Ok(KerxSubtable { header, body })
    }
}

impl<'a> KerxSubtable<'a> {
    /// The subtable header.
    pub fn header(&self) -> &KerxSubtableHeader {
        &self.header
    }

    /// The format specific part of the subtable.
    pub fn body(&self) -> &KerxSubtableBody<'a> {
        &self.body
    }

    /// The subtable format.
    pub fn format(&self) -> u8 {
        self.header.coverage.format()
    }

    /// True if the subtable has vertical kerning values.
    pub fn is_vertical(&self) -> bool {
        self.header.coverage.contains(Coverage::VERTICAL)
    }

    /// True if the subtable has horizontal kerning values.
    pub fn is_horizontal(&self) -> bool {
        !self.is_vertical()
    }

    /// True if kerning is perpendicular to the flow of the text.
    pub fn is_cross_stream(&self) -> bool {
        self.header.coverage.contains(Coverage::CROSS_STREAM)
    }

    /// True if the subtable has variation kerning values.
    pub fn is_variation(&self) -> bool {
        self.header.coverage.contains(Coverage::VARIATION)
    }

    /// True if glyphs are processed from last to first.
    pub fn process_backwards(&self) -> bool {
        self.header.coverage.contains(Coverage::PROCESS_DIRECTION)
    }

    /// Look up the kerning value for a pair of glyphs.
    ///
    /// Returns `None` if the pair has no kerning value, or if the subtable format does not
    /// provide kerning by glyph pair (formats 1 and 4 and unsupported formats).
    pub fn kerning(&self, left: u16, right: u16) -> Option<i32> {
        match &self.body {
            KerxSubtableBody::Format0(format0) => format0.kerning(left, right).map(i32::from),
            KerxSubtableBody::Format2(grid) => grid.kerning(left, right).map(i32::from),
            KerxSubtableBody::Format6(format6) => format6.kerning(left, right),
            KerxSubtableBody::Format1(_)
            | KerxSubtableBody::Format4(_)
            | KerxSubtableBody::Unsupported(_) => None,
        }
    }
}

impl MinSize for KerxFormat0<'_> {
    const MIN_SIZE: usize = 4 * size::U32;
}

impl VarSize for KerxFormat0<'_> {
    const ITEM_SIZE: usize = KerxPair::SIZE;
}

impl KerxPair {
    const SIZE: usize = 2 * size::U16 + size::I16;

    /// The glyph index of the left-hand glyph.
    pub fn left(&self) -> u16 {
        self.left
    }

    /// The glyph index of the right-hand glyph.
    pub fn right(&self) -> u16 {
        self.right
    }

    /// The kerning value in font design units.
    pub fn value(&self) -> i16 {
        self.value
    }

    fn search_key(&self) -> u32 {
        (u32::from(self.left) << 16) | u32::from(self.right)
    }
}

impl ReadFrom for KerxPair {
    type ReadType = (U16Be, U16Be, I16Be);

    fn read_from((left, right, value): (u16, u16, i16)) -> Self {
        KerxPair { left, right, value }
    }
}

impl ReadBinary for KerxFormat0<'_> {
    type HostType<'a> = KerxFormat0<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<KerxFormat0<'a>, ParseError> {
        let available = ctxt.remaining();
        ctxt.check_length(available >= Self::MIN_SIZE)?;
        let n_pairs = usize::safe_from(ctxt.read_u32be()?);
        let search_range = ctxt.read_u32be()?;
        let entry_selector = ctxt.read_u32be()?;
        let range_shift = ctxt.read_u32be()?;
        Self::check_count(n_pairs, available)?;
        let pairs = ctxt.read_array::<KerxPair>(n_pairs)?;

        Ok(KerxFormat0 {
            search_range,
            entry_selector,
            range_shift,
            pairs,
        })
    }
}

impl<'a> KerxFormat0<'a> {
    /// The number of kerning pairs.
    pub fn n_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// The kerning pairs.
    pub fn pairs(&self) -> &ReadArray<'a, KerxPair> {
        &self.pairs
    }

    /// The searchRange field, as stored in the data.
    pub fn search_range(&self) -> u32 {
        self.search_range
    }

    /// The entrySelector field, as stored in the data.
    pub fn entry_selector(&self) -> u32 {
        self.entry_selector
    }

    /// The rangeShift field, as stored in the data.
    pub fn range_shift(&self) -> u32 {
        self.range_shift
    }

    /// Look up the kerning value for a pair of glyphs.
    pub fn kerning(&self, left: u16, right: u16) -> Option<i16> {
        // Pairs are ordered by the left glyph in the high word and the right glyph in the low
        let needle = (u32::from(left) << 16) | u32::from(right);
        let index = self
            .pairs
            .binary_search_by(|pair| pair.search_key().cmp(&needle))
            .ok()?;
        self.pairs.get_item(index).map(|pair| pair.value)
    }
}

impl KerxEntry {
    /// The size of an entry in the entry table.
    pub const SIZE: usize = 3 * size::U16;

    /// valueIndex that indicates the entry has no kerning values.
    pub const NO_VALUE: u16 = 0xFFFF;
}

impl ReadFrom for KerxEntry {
    type ReadType = (U16Be, U16Be, U16Be);

    fn read_from((new_state, flags, value_index): (u16, u16, u16)) -> Self {
        KerxEntry {
            new_state,
            flags: KerxEntryFlags::from_bits_truncate(flags),
            value_index,
        }
    }
}

impl MinSize for KerxFormat1<'_> {
    const MIN_SIZE: usize = ExtendedStateTable::HEADER_SIZE + size::U32;
}

impl ReadBinaryDep for KerxFormat1<'_> {
    /// The number of glyphs in the font.
    type Args<'a> = u16;
    type HostType<'a> = KerxFormat1<'a>;

    fn read_dep<'a>(ctxt: &mut ReadCtxt<'a>, n_glyphs: u16) -> Result<KerxFormat1<'a>, ParseError> {
        ctxt.check_length(ctxt.remaining() >= Self::MIN_SIZE)?;
        // Offsets are relative to the state table header, which follows the subtable header
        let table = ctxt.scope();
        let state_table = ctxt.read_dep::<ExtendedStateTable<'_>>(StateTableArgs {
            n_glyphs,
            entry_size: KerxEntry::SIZE,
        })?;
        let value_table_offset = usize::safe_from(ctxt.read_u32be()?);
        let values = if value_table_offset == 0 {
            ReadArray::empty()
        } else {
            let value_table = table.resolve(value_table_offset, 0)?;
            let count = value_table.data().len() / size::I16;
            value_table.ctxt().read_array::<I16Be>(count)?
        };

        Ok(KerxFormat1 {
            state_table,
            values,
        })
    }
}

impl<'a> KerxFormat1<'a> {
    /// The state table of the subtable.
    pub fn state_table(&self) -> &ExtendedStateTable<'a> {
        &self.state_table
    }

    /// The class of `glyph`.
    pub fn class(&self, glyph: u16) -> u16 {
        self.state_table.class(glyph)
    }

    /// The row of the state array for `state`, holding an entry index for each class.
    pub fn state_row(&self, state: u16) -> Option<ReadArray<'a, U16Be>> {
        self.state_table.state_row(state)
    }

    /// Entry `index` of the entry table.
    pub fn entry(&self, index: u16) -> Option<KerxEntry> {
        self.state_table.entry::<KerxEntry>(index)
    }

    /// Kerning value `index` of the value table.
    pub fn value(&self, index: u16) -> Option<i16> {
        self.values.get_item(usize::from(index))
    }

    /// The number of values in the value table.
    pub fn n_values(&self) -> usize {
        self.values.len()
    }
}

impl MinSize for KerxClassGrid<'_> {
    const MIN_SIZE: usize = 4 * size::U32;
}

impl ReadBinaryDep for KerxClassGrid<'_> {
    /// The subtable the grid belongs to.
    type Args<'a> = ReadScope<'a>;
    type HostType<'a> = KerxClassGrid<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        subtable: ReadScope<'a>,
    ) -> Result<KerxClassGrid<'a>, ParseError> {
        ctxt.check_length(ctxt.remaining() >= Self::MIN_SIZE)?;
        let row_width = ctxt.read_u32be()?;
        let left_classes = ctxt.read::<Offset32<ClassTable<'_>>>()?.resolve(subtable)?;
        let right_classes = ctxt.read::<Offset32<ClassTable<'_>>>()?.resolve(subtable)?;
        let array = optional_scope(subtable, ctxt.read_u32be()?, size::I16)?;

        Ok(KerxClassGrid {
            row_width,
            left_classes,
            right_classes,
            array,
        })
    }
}

impl<'a> KerxClassGrid<'a> {
    /// The number of bytes in a row of the kerning array.
    pub fn row_width(&self) -> u32 {
        self.row_width
    }

    /// The class table for left-hand glyphs.
    pub fn left_classes(&self) -> Option<&ClassTable<'a>> {
        self.left_classes.as_ref()
    }

    /// The class table for right-hand glyphs.
    pub fn right_classes(&self) -> Option<&ClassTable<'a>> {
        self.right_classes.as_ref()
    }

    /// Read the kerning value for a pair of classes.
    ///
    /// The value is found `left * rowWidth + right * 2` bytes from the start of the array.
    pub fn kerning_for_classes(&self, left: u16, right: u16) -> Option<i16> {
        let array = self.array?;
        let offset = usize::from(left)
            .checked_mul(usize::safe_from(self.row_width))?
            .checked_add(usize::from(right).checked_mul(size::I16)?)?;
        array
            .offset_length(offset, size::I16)
            .ok()?
            .read::<I16Be>()
            .ok()
    }

    /// Look up the kerning value for a pair of glyphs.
    ///
    /// Returns `None` if either glyph has no class.
    pub fn kerning(&self, left: u16, right: u16) -> Option<i16> {
        let left_class = self.left_classes.as_ref()?.get(left)?;
        let right_class = self.right_classes.as_ref()?.get(right)?;
        self.kerning_for_classes(left_class, right_class)
    }
}

impl MinSize for ClassTable<'_> {
    const MIN_SIZE: usize = 2 * size::U16;
}

impl VarSize for ClassTable<'_> {
    const ITEM_SIZE: usize = size::U16;
}

impl ReadBinary for ClassTable<'_> {
    type HostType<'a> = ClassTable<'a>;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<ClassTable<'a>, ParseError> {
        let available = ctxt.remaining();
        let first_glyph = ctxt.read_u16be()?;
        let n_glyphs = usize::from(ctxt.read_u16be()?);
        Self::check_count(n_glyphs, available)?;
        let classes = ctxt.read_array::<U16Be>(n_glyphs)?;

        Ok(ClassTable {
            first_glyph,
            classes,
        })
    }
}

impl<'a> ClassTable<'a> {
    /// The first glyph covered by the table.
    pub fn first_glyph(&self) -> u16 {
        self.first_glyph
    }

    /// The number of glyphs covered by the table.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True if the table covers no glyphs.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// The class of `glyph`, or `None` if the table does not cover it.
    pub fn get(&self, glyph: u16) -> Option<u16> {
        let index = glyph.checked_sub(self.first_glyph)?;
        self.classes.get_item(usize::from(index))
    }
}

impl KerxFormat6<'_> {
    /// Flag indicating the lookups and kerning values are 32-bit.
    pub const VALUES_ARE_LONG: u32 = 0x0000_0001;
}

impl MinSize for KerxFormat6<'_> {
    const MIN_SIZE: usize = size::U32 + 2 * size::U16 + 4 * size::U32;
}

impl ReadBinaryDep for KerxFormat6<'_> {
    /// The subtable and the number of glyphs in the font.
    type Args<'a> = (ReadScope<'a>, u16);
    type HostType<'a> = KerxFormat6<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        (subtable, n_glyphs): (ReadScope<'a>, u16),
    ) -> Result<KerxFormat6<'a>, ParseError> {
        ctxt.check_length(ctxt.remaining() >= Self::MIN_SIZE)?;
        let flags = ctxt.read_u32be()?;
        let row_count = ctxt.read_u16be()?;
        let column_count = ctxt.read_u16be()?;
        let value_size = format6_value_size(flags);
        let args = LookupArgs {
            n_glyphs,
            value_size,
        };
        let row_indices = ctxt
            .read::<Offset32<LookupTable<'_>>>()?
            .resolve_dep(subtable, args)?;
        let column_indices = ctxt
            .read::<Offset32<LookupTable<'_>>>()?
            .resolve_dep(subtable, args)?;
        let array = optional_scope(subtable, ctxt.read_u32be()?, value_size.size())?;
        let vector = optional_scope(subtable, ctxt.read_u32be()?, 0)?;

        Ok(KerxFormat6 {
            flags,
            row_count,
            column_count,
            row_indices,
            column_indices,
            array,
            vector,
        })
    }
}

impl<'a> KerxFormat6<'a> {
    /// The subtable flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// True if lookup values and kerning values are 32-bit.
    pub fn values_are_long(&self) -> bool {
        self.flags & Self::VALUES_ARE_LONG != 0
    }

    /// The number of rows in the kerning array.
    pub fn row_count(&self) -> u16 {
        self.row_count
    }

    /// The number of columns in the kerning array.
    pub fn column_count(&self) -> u16 {
        self.column_count
    }

    /// The kerning vector, if present.
    pub fn vector(&self) -> Option<ReadScope<'a>> {
        self.vector
    }

    /// Look up the kerning value for a pair of glyphs.
    ///
    /// The row and column lookups give indices that are added to find the kerning value.
    pub fn kerning(&self, left: u16, right: u16) -> Option<i32> {
        let row = self.row_indices.as_ref()?.lookup(left)?;
        let column = self.column_indices.as_ref()?.lookup(right)?;
        let index = usize::safe_from(row.checked_add(column)?);
        let value_size = format6_value_size(self.flags);
        let offset = index.checked_mul(value_size.size())?;
        let mut ctxt = self
            .array?
            .offset_length(offset, value_size.size())
            .ok()?
            .ctxt();
        match value_size {
            ValueSize::U16 => ctxt.read_i16be().ok().map(i32::from),
            ValueSize::U32 => ctxt.read_i32be().ok(),
        }
    }
}

fn format6_value_size(flags: u32) -> ValueSize {
    if flags & KerxFormat6::VALUES_ARE_LONG != 0 {
        ValueSize::U32
    } else {
        ValueSize::U16
    }
}

/// Resolve an offset to data running up to the end of `subtable`. A zero offset is absent.
fn optional_scope<'a>(
    subtable: ReadScope<'a>,
    offset: u32,
    min_size: usize,
) -> Result<Option<ReadScope<'a>>, ParseError> {
    match offset {
        0 => Ok(None),
        offset => subtable.resolve(usize::safe_from(offset), min_size).map(Some),
    }
}
