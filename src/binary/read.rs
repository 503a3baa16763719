#![allow(missing_docs)]

//! Parse binary data
//!
//! This module provides the basis for all parsing in this crate. Every structure is read
//! directly out of a borrowed byte buffer; nothing is copied. A `ReadScope` is the window of
//! bytes a structure is allowed to touch and every read, offset and array is checked against it
//! before any byte is looked at. Reading a structure with `ReadBinary` or `ReadBinaryDep` is
//! also its validation: if the read succeeds, everything the structure refers to is in bounds.

use crate::binary::{I16Be, I32Be, U16Be, U32Be, U64Be, U8};
use crate::error::ParseError;
use crate::size;
use crate::SafeFrom;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Copy, Clone)]
pub struct ReadEof {}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ReadScope<'a> {
    base: usize,
    data: &'a [u8],
}

#[derive(Clone)]
pub struct ReadCtxt<'a> {
    scope: ReadScope<'a>,
    offset: usize,
}

pub trait ReadBinary {
    type HostType<'a>: Sized; // default = Self

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError>;
}

pub trait ReadBinaryDep {
    type Args<'a>: Copy;
    type HostType<'a>: Sized; // default = Self

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        args: Self::Args<'a>,
    ) -> Result<Self::HostType<'a>, ParseError>;
}

/// Read will always succeed if sufficient bytes are available.
pub trait ReadUnchecked {
    type HostType: Sized; // default = Self

    /// The number of bytes consumed by `read_unchecked`.
    const SIZE: usize;

    /// Must read exactly `SIZE` bytes.
    /// Unsafe as it avoids prohibitively expensive per-byte bounds checking.
    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> Self::HostType;
}

pub trait ReadFrom {
    type ReadType: ReadUnchecked;
    fn read_from(value: <Self::ReadType as ReadUnchecked>::HostType) -> Self;
}

/// The smallest number of bytes an instance of a structure can occupy.
///
/// An offset to the structure is only resolved if at least this many bytes are present at the
/// target.
pub trait MinSize {
    const MIN_SIZE: usize;
}

/// Layout of a structure that is a fixed-size header followed by an array whose length is
/// given by a count stored in the data.
pub trait VarSize: MinSize {
    /// The size of each element of the trailing array.
    const ITEM_SIZE: usize;

    /// The exact size of the structure when the trailing array holds `count` elements.
    ///
    /// Returns `None` if the size is not representable.
    fn used_size(count: usize) -> Option<usize> {
        count
            .checked_mul(Self::ITEM_SIZE)?
            .checked_add(Self::MIN_SIZE)
    }

    /// The largest count that fits in `available` bytes.
    fn max_count_for(available: usize) -> usize {
        available.saturating_sub(Self::MIN_SIZE) / Self::ITEM_SIZE
    }

    /// Check that a structure declaring `count` elements fits in `available` bytes.
    ///
    /// Returns the used size on success. A count that does not fit is an error, it is never
    /// clamped to what is available.
    fn check_count(count: usize, available: usize) -> Result<usize, ParseError> {
        match Self::used_size(count) {
            Some(size) if size <= available => Ok(size),
            _ => Err(ParseError::BadLength),
        }
    }
}

impl<T> ReadUnchecked for T
where
    T: ReadFrom,
{
    type HostType = T;

    const SIZE: usize = T::ReadType::SIZE;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> Self::HostType {
        let t = T::ReadType::read_unchecked(ctxt);
        T::read_from(t)
    }
}

impl<T> ReadBinary for T
where
    T: ReadUnchecked,
{
    type HostType<'a> = T::HostType;

    fn read<'a>(ctxt: &mut ReadCtxt<'a>) -> Result<Self::HostType<'a>, ParseError> {
        ctxt.check_avail(T::SIZE)?;
        Ok(unsafe { T::read_unchecked(ctxt) })
        // Safe because we have `SIZE` bytes available.
    }
}

impl<T> ReadBinaryDep for T
where
    T: ReadBinary,
{
    type Args<'a> = ();
    type HostType<'a> = T::HostType<'a>;

    fn read_dep<'a>(
        ctxt: &mut ReadCtxt<'a>,
        (): Self::Args<'_>,
    ) -> Result<Self::HostType<'a>, ParseError> {
        T::read(ctxt)
    }
}

/// A 32-bit offset to a `T`, relative to some origin chosen by the structure holding it.
///
/// An offset is only a displacement. It has to be resolved against its origin, which checks
/// that the target is in bounds and then reads the target.
pub struct Offset32<T> {
    offset: u32,
    marker: PhantomData<T>,
}

impl<T> Offset32<T> {
    pub fn new(offset: u32) -> Self {
        Offset32 {
            offset,
            marker: PhantomData,
        }
    }

    /// A zero offset indicates that the target is not present.
    pub fn is_null(&self) -> bool {
        self.offset == 0
    }

    pub fn value(&self) -> u32 {
        self.offset
    }

    /// Resolve and read the target of this offset relative to `origin`.
    ///
    /// Returns `Ok(None)` for a null offset.
    pub fn resolve<'a>(self, origin: ReadScope<'a>) -> Result<Option<T::HostType<'a>>, ParseError>
    where
        T: ReadBinaryDep<Args<'a> = ()> + MinSize,
    {
        self.resolve_dep(origin, ())
    }

    /// Resolve and read the target of this offset relative to `origin`, passing `args` to
    /// the target's reader.
    ///
    /// Returns `Ok(None)` for a null offset.
    pub fn resolve_dep<'a>(
        self,
        origin: ReadScope<'a>,
        args: T::Args<'a>,
    ) -> Result<Option<T::HostType<'a>>, ParseError>
    where
        T: ReadBinaryDep + MinSize,
    {
        if self.is_null() {
            return Ok(None);
        }
        let scope = origin.resolve(usize::safe_from(self.offset), T::MIN_SIZE)?;
        scope.read_dep::<T>(args).map(Some)
    }
}

impl<T> Clone for Offset32<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Offset32<T> {}

impl<T> fmt::Debug for Offset32<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Offset32({})", self.offset)
    }
}

impl<T> ReadFrom for Offset32<T> {
    type ReadType = U32Be;

    fn read_from(offset: u32) -> Self {
        Offset32::new(offset)
    }
}

#[derive(Clone)]
pub struct ReadArray<'a, T: ReadUnchecked> {
    scope: ReadScope<'a>,
    length: usize,
    stride: usize,
    phantom: PhantomData<T>,
}

pub struct ReadArrayIter<'a, T: ReadUnchecked> {
    scope: ReadScope<'a>,
    index: usize,
    length: usize,
    stride: usize,
    phantom: PhantomData<T>,
}

impl<'a> ReadScope<'a> {
    pub fn new(data: &'a [u8]) -> ReadScope<'a> {
        let base = 0;
        ReadScope { base, data }
    }

    /// The position of this scope within the data it was originally created from.
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns true if `size` bytes starting at `offset` lie entirely within this scope.
    ///
    /// All bounds checks in this module are made through this predicate.
    pub fn contains(&self, offset: usize, size: usize) -> bool {
        match offset.checked_add(size) {
            Some(end) => end <= self.data.len(),
            None => false,
        }
    }

    pub fn offset(&self, offset: usize) -> ReadScope<'a> {
        let base = self.base.saturating_add(offset);
        let data = self.data.get(offset..).unwrap_or(&[]);
        ReadScope { base, data }
    }

    pub fn offset_length(&self, offset: usize, length: usize) -> Result<ReadScope<'a>, ParseError> {
        if self.contains(offset, length) {
            // NOTE(slice): in bounds due to contains check
            let data = &self.data[offset..offset + length];
            let base = self.base + offset;
            Ok(ReadScope { base, data })
        } else if length == 0 {
            Ok(ReadScope {
                base: self.base,
                data: &[],
            })
        } else if offset < self.data.len() {
            Err(ParseError::BadEof)
        } else {
            Err(ParseError::BadOffset)
        }
    }

    /// Resolve `offset`, relative to the start of this scope, to the scope starting at that
    /// position and running to the end of this scope.
    ///
    /// Fails with `ParseError::BadEof` unless at least `min_size` bytes are present at the
    /// target.
    pub fn resolve(&self, offset: usize, min_size: usize) -> Result<ReadScope<'a>, ParseError> {
        if self.contains(offset, min_size) {
            Ok(self.offset(offset))
        } else {
            Err(ParseError::BadEof)
        }
    }

    pub fn ctxt(&self) -> ReadCtxt<'a> {
        ReadCtxt::new(*self)
    }

    pub fn read<T: ReadBinaryDep<Args<'a> = ()>>(&self) -> Result<T::HostType<'a>, ParseError> {
        self.ctxt().read::<T>()
    }

    pub fn read_dep<T: ReadBinaryDep>(
        &self,
        args: T::Args<'a>,
    ) -> Result<T::HostType<'a>, ParseError> {
        self.ctxt().read_dep::<T>(args)
    }
}

impl<'a> ReadCtxt<'a> {
    /// ReadCtxt is constructed by calling `ReadScope::ctxt`.
    fn new(scope: ReadScope<'a>) -> ReadCtxt<'a> {
        ReadCtxt { scope, offset: 0 }
    }

    pub fn check(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadValue),
        }
    }

    /// Check a condition, returning `ParseError::BadIndex` if `false`.
    pub fn check_index(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadIndex),
        }
    }

    /// Check a condition, returning `ParseError::BadVersion` if `false`.
    ///
    /// Intended for use in checking versions read from data. Example:
    ///
    /// ```
    /// use aat_kerx::binary::read::ReadScope;
    /// use aat_kerx::error::ParseError;
    ///
    /// let scope = ReadScope::new(&[0, 2]);
    /// let mut ctxt = scope.ctxt();
    /// let major_version = ctxt.read_u16be().expect("unable to read version");
    ///
    /// assert!(ctxt.check_version(major_version == 2).is_ok());
    /// assert_eq!(ctxt.check_version(major_version == 1), Err(ParseError::BadVersion));
    /// ```
    pub fn check_version(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadVersion),
        }
    }

    /// Check a condition, returning `ParseError::BadLength` if `false`.
    ///
    /// Intended for checking declared lengths read from data against the space they occupy.
    pub fn check_length(&self, cond: bool) -> Result<(), ParseError> {
        match cond {
            true => Ok(()),
            false => Err(ParseError::BadLength),
        }
    }

    pub fn scope(&self) -> ReadScope<'a> {
        self.scope.offset(self.offset)
    }

    /// The number of bytes remaining in this context.
    pub fn remaining(&self) -> usize {
        self.scope.data.len().saturating_sub(self.offset)
    }

    pub fn read<T: ReadBinaryDep<Args<'a> = ()>>(&mut self) -> Result<T::HostType<'a>, ParseError> {
        T::read_dep(self, ())
    }

    pub fn read_dep<T: ReadBinaryDep>(
        &mut self,
        args: T::Args<'a>,
    ) -> Result<T::HostType<'a>, ParseError> {
        T::read_dep(self, args)
    }

    pub fn bytes_available(&self) -> bool {
        self.offset < self.scope.data.len()
    }

    fn check_avail(&self, length: usize) -> Result<(), ReadEof> {
        if self.scope.contains(self.offset, length) {
            Ok(())
        } else {
            Err(ReadEof {})
        }
    }

    unsafe fn read_unchecked_u8(&mut self) -> u8 {
        let byte = *self.scope.data.get_unchecked(self.offset);
        self.offset += 1;
        byte
    }

    unsafe fn read_unchecked_u16be(&mut self) -> u16 {
        let hi = u16::from(*self.scope.data.get_unchecked(self.offset));
        let lo = u16::from(*self.scope.data.get_unchecked(self.offset + 1));
        self.offset += 2;
        (hi << 8) | lo
    }

    unsafe fn read_unchecked_i16be(&mut self) -> i16 {
        self.read_unchecked_u16be() as i16
    }

    unsafe fn read_unchecked_u32be(&mut self) -> u32 {
        let b0 = u32::from(*self.scope.data.get_unchecked(self.offset));
        let b1 = u32::from(*self.scope.data.get_unchecked(self.offset + 1));
        let b2 = u32::from(*self.scope.data.get_unchecked(self.offset + 2));
        let b3 = u32::from(*self.scope.data.get_unchecked(self.offset + 3));
        self.offset += 4;
        (b0 << 24) | (b1 << 16) | (b2 << 8) | b3
    }

    unsafe fn read_unchecked_i32be(&mut self) -> i32 {
        self.read_unchecked_u32be() as i32
    }

    unsafe fn read_unchecked_u64be(&mut self) -> u64 {
        let hi = u64::from(self.read_unchecked_u32be());
        let lo = u64::from(self.read_unchecked_u32be());
        (hi << 32) | lo
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadEof> {
        self.check_avail(1)?;
        Ok(unsafe { self.read_unchecked_u8() })
        // Safe because we have 1 byte available.
    }

    pub fn read_u16be(&mut self) -> Result<u16, ReadEof> {
        self.check_avail(2)?;
        Ok(unsafe { self.read_unchecked_u16be() })
        // Safe because we have 2 bytes available.
    }

    pub fn read_i16be(&mut self) -> Result<i16, ReadEof> {
        self.check_avail(2)?;
        Ok(unsafe { self.read_unchecked_i16be() })
        // Safe because we have 2 bytes available.
    }

    pub fn read_u32be(&mut self) -> Result<u32, ReadEof> {
        self.check_avail(4)?;
        Ok(unsafe { self.read_unchecked_u32be() })
        // Safe because we have 4 bytes available.
    }

    pub fn read_i32be(&mut self) -> Result<i32, ReadEof> {
        self.check_avail(4)?;
        Ok(unsafe { self.read_unchecked_i32be() })
        // Safe because we have 4 bytes available.
    }

    /// Read an array of `length` items.
    ///
    /// The byte length of the array is computed with overflow checking before any of it is
    /// taken from the data.
    pub fn read_array<T: ReadUnchecked>(
        &mut self,
        length: usize,
    ) -> Result<ReadArray<'a, T>, ParseError> {
        let byte_len = length
            .checked_mul(T::SIZE)
            .ok_or(ParseError::LimitExceeded)?;
        let scope = self.read_scope(byte_len)?;
        Ok(ReadArray {
            scope,
            length,
            stride: T::SIZE,
            phantom: PhantomData,
        })
    }

    pub fn read_scope(&mut self, length: usize) -> Result<ReadScope<'a>, ReadEof> {
        if let Ok(scope) = self.scope.offset_length(self.offset, length) {
            self.offset += length;
            Ok(scope)
        } else {
            Err(ReadEof {})
        }
    }

    pub fn read_slice(&mut self, length: usize) -> Result<&'a [u8], ReadEof> {
        let scope = self.read_scope(length)?;
        Ok(scope.data)
    }
}

impl<'a, T: ReadUnchecked> ReadArray<'a, T> {
    pub fn empty() -> ReadArray<'a, T> {
        ReadArray {
            scope: ReadScope::new(&[]),
            length: 0,
            stride: T::SIZE,
            phantom: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn get_item(&self, index: usize) -> Option<T::HostType> {
        if index < self.length {
            let offset = index.checked_mul(self.stride)?;
            let scope = self.scope.offset_length(offset, self.stride).ok()?;
            let mut ctxt = scope.ctxt();
            Some(unsafe { T::read_unchecked(&mut ctxt) }) // Safe because we have `SIZE` bytes available.
        } else {
            None
        }
    }

    pub fn last(&self) -> Option<T::HostType> {
        let index = self.length.checked_sub(1)?;
        self.get_item(index)
    }

    pub fn iter(&self) -> ReadArrayIter<'a, T> {
        ReadArrayIter {
            scope: self.scope,
            index: 0,
            length: self.length,
            stride: self.stride,
            phantom: PhantomData,
        }
    }

    // This is derived from the function on slice in the standard library
    pub fn binary_search_by<F>(&self, mut f: F) -> Result<usize, usize>
    where
        F: FnMut(T::HostType) -> Ordering,
    {
        // INVARIANTS:
        // - 0 <= left <= left + size = right <= self.len()
        // - f returns Less for everything in self[..left]
        // - f returns Greater for everything in self[right..]
        let mut size = self.len();
        let mut left = 0;
        let mut right = size;
        while left < right {
            let mid = left + size / 2;

            // `mid < self.len()` so the item is always present
            let Some(item) = self.get_item(mid) else {
                return Err(left);
            };
            let cmp = f(item);

            if cmp == Ordering::Less {
                left = mid + 1;
            } else if cmp == Ordering::Greater {
                right = mid;
            } else {
                return Ok(mid);
            }

            size = right - left;
        }

        Err(left)
    }
}

impl<'a, 'b, T: ReadUnchecked> IntoIterator for &'b ReadArray<'a, T> {
    type Item = T::HostType;
    type IntoIter = ReadArrayIter<'a, T>;
    fn into_iter(self) -> ReadArrayIter<'a, T> {
        self.iter()
    }
}

impl<'a, T: ReadUnchecked> Iterator for ReadArrayIter<'a, T> {
    type Item = T::HostType;

    fn next(&mut self) -> Option<T::HostType> {
        if self.index >= self.length {
            return None;
        }
        let mut ctxt = self.scope.offset(self.index * self.stride).ctxt();
        ctxt.check_avail(self.stride).ok()?;
        // SAFETY: Ok because we have (at least) `stride` bytes available and T::SIZE is <= stride.
        self.index += 1;
        Some(unsafe { T::read_unchecked(&mut ctxt) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.length - self.index;
        (remaining, Some(remaining))
    }
}

impl<'a, T: ReadUnchecked> ExactSizeIterator for ReadArrayIter<'a, T> {}

impl ReadUnchecked for U8 {
    type HostType = u8;

    const SIZE: usize = size::U8;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> u8 {
        ctxt.read_unchecked_u8()
    }
}

impl ReadUnchecked for U16Be {
    type HostType = u16;

    const SIZE: usize = size::U16;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> u16 {
        ctxt.read_unchecked_u16be()
    }
}

impl ReadUnchecked for I16Be {
    type HostType = i16;

    const SIZE: usize = size::I16;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> i16 {
        ctxt.read_unchecked_i16be()
    }
}

impl ReadUnchecked for U32Be {
    type HostType = u32;

    const SIZE: usize = size::U32;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> u32 {
        ctxt.read_unchecked_u32be()
    }
}

impl ReadUnchecked for I32Be {
    type HostType = i32;

    const SIZE: usize = size::I32;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> i32 {
        ctxt.read_unchecked_i32be()
    }
}

impl ReadUnchecked for U64Be {
    type HostType = u64;

    const SIZE: usize = size::U64;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> u64 {
        ctxt.read_unchecked_u64be()
    }
}

impl<T1, T2> ReadUnchecked for (T1, T2)
where
    T1: ReadUnchecked,
    T2: ReadUnchecked,
{
    type HostType = (T1::HostType, T2::HostType);

    const SIZE: usize = T1::SIZE + T2::SIZE;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> Self::HostType {
        let t1 = T1::read_unchecked(ctxt);
        let t2 = T2::read_unchecked(ctxt);
        (t1, t2)
    }
}

impl<T1, T2, T3> ReadUnchecked for (T1, T2, T3)
where
    T1: ReadUnchecked,
    T2: ReadUnchecked,
    T3: ReadUnchecked,
{
    type HostType = (T1::HostType, T2::HostType, T3::HostType);

    const SIZE: usize = T1::SIZE + T2::SIZE + T3::SIZE;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> Self::HostType {
        let t1 = T1::read_unchecked(ctxt);
        let t2 = T2::read_unchecked(ctxt);
        let t3 = T3::read_unchecked(ctxt);
        (t1, t2, t3)
    }
}

impl<T1, T2, T3, T4> ReadUnchecked for (T1, T2, T3, T4)
where
    T1: ReadUnchecked,
    T2: ReadUnchecked,
    T3: ReadUnchecked,
    T4: ReadUnchecked,
{
    type HostType = (T1::HostType, T2::HostType, T3::HostType, T4::HostType);

    const SIZE: usize = T1::SIZE + T2::SIZE + T3::SIZE + T4::SIZE;

    unsafe fn read_unchecked<'a>(ctxt: &mut ReadCtxt<'a>) -> Self::HostType {
        let t1 = T1::read_unchecked(ctxt);
        let t2 = T2::read_unchecked(ctxt);
        let t3 = T3::read_unchecked(ctxt);
        let t4 = T4::read_unchecked(ctxt);
        (t1, t2, t3, t4)
    }
}

impl<'a, T> fmt::Debug for ReadArray<'a, T>
where
    T: ReadUnchecked,
    T::HostType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counted;

    impl MinSize for Counted {
        const MIN_SIZE: usize = 4;
    }

    impl VarSize for Counted {
        const ITEM_SIZE: usize = 2;
    }

    // Tests that offset_length does not panic when length is 0 but offset is out-of-bounds
    #[test]
    fn test_offset_length_oob() {
        let scope = ReadScope::new(&[1, 2, 3]);
        assert!(scope.offset_length(99, 0).is_ok());
        assert_eq!(scope.offset_length(99, 1), Err(ParseError::BadOffset));
        assert_eq!(scope.offset_length(2, 2), Err(ParseError::BadEof));
    }

    #[test]
    fn test_contains() {
        let scope = ReadScope::new(&[0; 8]);
        assert!(scope.contains(0, 8));
        assert!(scope.contains(8, 0));
        assert!(scope.contains(4, 4));
        assert!(!scope.contains(4, 5));
        assert!(!scope.contains(9, 0));
        assert!(!scope.contains(usize::MAX, 2));
        assert!(!scope.contains(2, usize::MAX));
    }

    #[test]
    fn test_resolve() {
        let data = [0, 1, 2, 3, 4, 5];
        let scope = ReadScope::new(&data).offset(1);
        let target = scope.resolve(2, 3).unwrap();
        assert_eq!(target.base(), 3);
        assert_eq!(target.data(), &[3, 4, 5]);
        assert_eq!(scope.resolve(2, 4), Err(ParseError::BadEof));
        assert_eq!(scope.resolve(usize::MAX, 1), Err(ParseError::BadEof));
    }

    impl MinSize for U16Be {
        const MIN_SIZE: usize = 2;
    }

    #[test]
    fn test_resolve_offset32() {
        let data = [0, 0, 0, 6, 0xFF, 0xFF, 0x12, 0x34];
        let scope = ReadScope::new(&data);
        let offset = scope.read::<Offset32<U16Be>>().unwrap();
        assert_eq!(offset.resolve(scope), Ok(Some(0x1234)));
        assert_eq!(Offset32::<U16Be>::new(0).resolve(scope), Ok(None));
        assert_eq!(
            Offset32::<U16Be>::new(7).resolve(scope),
            Err(ParseError::BadEof)
        );
    }

    #[test]
    fn test_var_size() {
        assert_eq!(Counted::used_size(3), Some(10));
        assert_eq!(Counted::used_size(usize::MAX), None);
        assert_eq!(Counted::max_count_for(11), 3);
        assert_eq!(Counted::max_count_for(2), 0);
        assert_eq!(Counted::check_count(3, 10), Ok(10));
        assert_eq!(Counted::check_count(4, 10), Err(ParseError::BadLength));
        assert_eq!(
            Counted::check_count(usize::MAX, usize::MAX),
            Err(ParseError::BadLength)
        );
    }

    #[test]
    fn test_read_array_overflow() {
        let mut ctxt = ReadScope::new(&[0; 4]).ctxt();
        assert_eq!(
            ctxt.read_array::<U32Be>(usize::MAX).map(|array| array.len()),
            Err(ParseError::LimitExceeded)
        );
        assert_eq!(
            ctxt.read_array::<U16Be>(3).map(|array| array.len()),
            Err(ParseError::BadEof)
        );
    }

    #[test]
    fn test_binary_search() {
        let data = [0, 1, 0, 3, 0, 5, 0, 7];
        let array = ReadScope::new(&data)
            .ctxt()
            .read_array::<U16Be>(4)
            .unwrap();
        assert_eq!(array.binary_search_by(|x| x.cmp(&5)), Ok(2));
        assert_eq!(array.binary_search_by(|x| x.cmp(&4)), Err(2));
        assert_eq!(array.iter().collect::<Vec<_>>(), vec![1, 3, 5, 7]);
        assert_eq!(array.last(), Some(7));
        assert_eq!(array.get_item(4), None);
    }
}
