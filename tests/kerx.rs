mod common;

use aat_kerx::binary::read::ReadScope;
use aat_kerx::error::ParseError;
use aat_kerx::tables::kerx::{KerxSubtableBody, KerxTable};

use crate::common::build;
use crate::common::writer::{self, TtfType::*};

const N_GLYPHS: u16 = 50;

fn read_kerx(data: &[u8]) -> Result<KerxTable<'_>, ParseError> {
    ReadScope::new(data).read_dep::<KerxTable<'_>>(N_GLYPHS)
}

fn format2_subtable() -> Vec<u8> {
    // 2 x 2 grid: left glyph 5 is class 0, right glyph 7 is class 1
    let body = build::class_grid(
        4,
        &build::class_table(5, &[0, 1]),
        &build::class_table(6, &[0, 1]),
        &[10, 20, 30, 40],
    );
    build::subtable(2, &body)
}

fn format1_subtable() -> Vec<u8> {
    let body = writer::convert(&[
        UInt32(4),
        UInt32(20),
        UInt32(30),
        UInt32(38),
        UInt32(0),
        // class table: format 8 with one glyph
        UInt16(8),
        UInt16(3),
        UInt16(1),
        UInt16(4),
        UInt16(0),
        // state array
        UInt16(0),
        UInt16(0),
        UInt16(0),
        UInt16(0),
        // entry table
        UInt16(0),
        UInt16(0),
        UInt16(0xFFFF),
    ]);
    build::subtable(0x2000_0001, &body)
}

fn mixed_table() -> Vec<u8> {
    build::table(
        2,
        &[
            build::subtable(0, &build::format0(&[(1, 2, -50), (3, 4, 25)])),
            format2_subtable(),
            build::subtable(99, &[0xDE, 0xAD]),
            format1_subtable(),
            build::subtable(0x8000_0000, &build::format0(&[(1, 2, 15)])),
        ],
    )
}

#[test]
fn inconsistent_pair_count() {
    // Two pairs are declared but the subtable length leaves room for one
    let mut body = build::format0(&[(1, 2, -50), (3, 4, 25)]);
    body.truncate(body.len() - 6);
    let data = build::table(2, &[build::subtable(0, &body)]);
    assert_eq!(read_kerx(&data).map(|_| ()), Err(ParseError::BadLength));
}

#[test]
fn version_too_old() {
    // The subtable is garbage but must not be looked at
    let data = build::table(1, &[vec![0xFF; 3]]);
    assert_eq!(read_kerx(&data).map(|_| ()), Err(ParseError::BadVersion));
}

#[test]
fn format2_class_pair() {
    let data = build::table(2, &[format2_subtable()]);
    let kerx = read_kerx(&data).unwrap();
    let subtable = kerx.subtables().next().unwrap();
    match subtable.body() {
        KerxSubtableBody::Format2(grid) => {
            // row 0, column 1: rowWidth * 0 + 1 * 2 bytes into the array
            assert_eq!(grid.kerning_for_classes(0, 1), Some(20));
        }
        _ => panic!("expected format 2"),
    }
    assert_eq!(subtable.kerning(5, 7), Some(20));
    assert_eq!(subtable.kerning(6, 6), Some(30));
    assert_eq!(subtable.kerning(4, 7), None);
}

#[test]
fn unsupported_format_is_skipped() {
    let data = build::table(
        2,
        &[
            build::subtable(99, &[1, 2, 3, 4]),
            build::subtable(0, &build::format0(&[(1, 2, 3)])),
        ],
    );
    let kerx = read_kerx(&data).unwrap();
    let subtables = kerx.subtables().collect::<Vec<_>>();
    assert_eq!(subtables.len(), 2);
    assert!(matches!(
        subtables[0].body(),
        KerxSubtableBody::Unsupported(99)
    ));
    assert_eq!(subtables[1].kerning(1, 2), Some(3));
}

#[test]
fn visits_every_subtable_in_order() {
    let data = mixed_table();
    let kerx = read_kerx(&data).unwrap();
    assert_eq!(kerx.version(), 2);
    assert_eq!(kerx.subtable_count(), 5);

    let mut formats = Vec::new();
    kerx.subtables().for_each(|subtable| formats.push(subtable.format()));
    assert_eq!(formats, vec![0, 2, 99, 1, 0]);

    let subtables = kerx.subtables().collect::<Vec<_>>();
    assert!(subtables[3].is_variation());
    assert!(subtables[4].is_vertical());
    let kerning = subtables
        .iter()
        .map(|subtable| subtable.kerning(1, 2))
        .collect::<Vec<_>>();
    assert_eq!(kerning, vec![Some(-50), None, None, None, Some(15)]);
}

#[test]
fn truncation_is_out_of_bounds() {
    let data = mixed_table();
    for len in 0..data.len() {
        assert_eq!(
            read_kerx(&data[..len]).map(|_| ()),
            Err(ParseError::BadEof),
            "truncated to {} bytes",
            len
        );
    }
    assert!(read_kerx(&data).is_ok());
}

#[test]
fn trailing_data_is_ignored() {
    let mut data = mixed_table();
    data.extend_from_slice(&[0xFF; 7]);
    let kerx = read_kerx(&data).unwrap();
    assert_eq!(kerx.subtables().count(), 5);
}

#[test]
fn validation_is_repeatable() {
    let data = mixed_table();
    let copy = data.clone();
    let first = read_kerx(&data).map(|kerx| kerx.subtables().count());
    let second = read_kerx(&data).map(|kerx| kerx.subtables().count());
    assert_eq!(first, second);
    assert_eq!(data, copy);

    let mut bad = data.clone();
    bad[0..2].copy_from_slice(&[0, 0]);
    assert_eq!(
        read_kerx(&bad).map(|_| ()),
        read_kerx(&bad).map(|_| ())
    );
}

#[test]
fn corrupt_length_rejects_table() {
    let mut data = mixed_table();
    // The first subtable claims to be longer than the table
    data[8..12].copy_from_slice(&0x7FFF_FFFFu32.to_be_bytes());
    assert_eq!(read_kerx(&data).map(|_| ()), Err(ParseError::BadEof));

    let mut data = mixed_table();
    data[8..12].copy_from_slice(&4u32.to_be_bytes());
    assert_eq!(read_kerx(&data).map(|_| ()), Err(ParseError::BadLength));
}

#[test]
fn empty_table() {
    let data = build::table(3, &[]);
    let kerx = read_kerx(&data).unwrap();
    assert_eq!(kerx.subtables().next().map(|s| s.format()), None);
}
