#![warn(rust_2018_idioms)]

//! Zero-copy reading and validation of the Apple Advanced Typography extended kerning (`kerx`)
//! table.
//!
//! Font data is untrusted, so a `kerx` table is read in two passes. The first pass,
//! `ReadScope::read_dep::<KerxTable<'_>>`, walks every subtable and everything the subtables
//! refer to, proving it all lies within the supplied bytes. Only a table that passes is handed
//! back, and consumers then iterate its subtables and query kerning values from it.
//!
//! ```
//! use aat_kerx::binary::read::ReadScope;
//! use aat_kerx::tables::kerx::KerxTable;
//!
//! # fn main() -> Result<(), aat_kerx::error::ParseError> {
//! // version 2, one subtable: format 0 with a single pair (1, 2) => -50
//! let data = [
//!     0, 2, 0, 0, 0, 0, 0, 1, // header
//!     0, 0, 0, 34, 0, 0, 0, 0, 0, 0, 0, 0, // subtable header
//!     0, 0, 0, 1, 0, 0, 0, 6, 0, 0, 0, 0, 0, 0, 0, 0, // format 0 header
//!     0, 1, 0, 2, 0xFF, 0xCE, // pair
//! ];
//! let kerx = ReadScope::new(&data).read_dep::<KerxTable<'_>>(3)?;
//! let subtable = kerx.subtables().next().unwrap();
//! assert_eq!(subtable.kerning(1, 2), Some(-50));
//! # Ok(())
//! # }
//! ```

/// Reading of binary data.
pub mod binary;
pub mod error;
pub mod size;
pub mod tables;
pub mod tag;

/// Lossless integer conversions to `usize`.
///
/// `u32` values read from font data are always representable as `usize` on the platforms
/// supported by this crate.
pub(crate) trait SafeFrom<T>: Sized {
    fn safe_from(value: T) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl SafeFrom<u32> for usize {
    #[inline]
    fn safe_from(value: u32) -> Self {
        value as usize
    }
}
