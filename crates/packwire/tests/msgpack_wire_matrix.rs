mod common;

use common::{map, ts, ValueGen};
use packwire::{decode, decode_one, encode, Encoder, Ext, Value};

fn enc(value: &Value) -> Vec<u8> {
    encode(value).expect("encode")
}

fn with_header(header: &[u8], payload_len: usize, fill: u8) -> Vec<u8> {
    let mut out = header.to_vec();
    out.extend(std::iter::repeat(fill).take(payload_len));
    out
}

#[test]
fn scalar_wire_matrix() {
    assert_eq!(enc(&Value::Nil), [0xc0]);
    assert_eq!(enc(&Value::Bool(false)), [0xc2]);
    assert_eq!(enc(&Value::Bool(true)), [0xc3]);

    let ints: &[(i64, &[u8])] = &[
        (0, &[0x00]),
        (1, &[0x01]),
        (127, &[0x7f]),
        (128, &[0xcc, 0x80]),
        (255, &[0xcc, 0xff]),
        (256, &[0xcd, 0x01, 0x00]),
        (65_535, &[0xcd, 0xff, 0xff]),
        (65_536, &[0xce, 0x00, 0x01, 0x00, 0x00]),
        (u32::MAX as i64, &[0xce, 0xff, 0xff, 0xff, 0xff]),
        (1 << 32, &[0xcf, 0, 0, 0, 1, 0, 0, 0, 0]),
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-128, &[0xd0, 0x80]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32_768, &[0xd1, 0x80, 0x00]),
        (-32_769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (i32::MIN as i64, &[0xd2, 0x80, 0x00, 0x00, 0x00]),
        (i32::MIN as i64 - 1, &[0xd3, 0xff, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff, 0xff]),
        (i64::MIN, &[0xd3, 0x80, 0, 0, 0, 0, 0, 0, 0]),
    ];
    for (n, bytes) in ints {
        assert_eq!(enc(&Value::Int(*n)), *bytes, "int {n}");
        assert_eq!(decode_one(bytes), Ok(Value::Int(*n)), "int {n}");
    }

    assert_eq!(enc(&Value::UInt(u64::MAX)), [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    assert_eq!(enc(&Value::UInt(5)), [0x05]);

    assert_eq!(enc(&Value::F32(1.5)), [0xca, 0x3f, 0xc0, 0x00, 0x00]);
    assert_eq!(enc(&Value::F64(1.5)), [0xcb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]);
    assert_eq!(enc(&Value::F64(-0.0)), [0xcb, 0x80, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn integer_signedness_follows_format_class() {
    let unsigned: &[(&[u8], u64)] = &[
        (&[0xcc, 0x80], 128),
        (&[0xcc, 0x05], 5),
        (&[0xcd, 0x01, 0x00], 256),
        (&[0xce, 0, 1, 0, 0], 65_536),
        (&[0xcf, 0, 0, 0, 1, 0, 0, 0, 0], 1 << 32),
    ];
    for (bytes, n) in unsigned {
        let value = decode_one(bytes).expect("decode");
        assert!(matches!(value, Value::UInt(v) if v == *n), "{bytes:02x?} gave {value:?}");
    }
    let signed: &[(&[u8], i64)] = &[
        (&[0x05], 5),
        (&[0xff], -1),
        (&[0xd0, 0x05], 5),
        (&[0xd1, 0xff, 0x7f], -129),
        (&[0xd3, 0, 0, 0, 0, 0, 0, 0, 0x07], 7),
    ];
    for (bytes, n) in signed {
        let value = decode_one(bytes).expect("decode");
        assert!(matches!(value, Value::Int(v) if v == *n), "{bytes:02x?} gave {value:?}");
    }
    // An Int that needs a uint class comes back as UInt but still compares equal.
    assert_eq!(decode_one(&enc(&Value::Int(300))), Ok(Value::Int(300)));
}

#[test]
fn str_length_classes() {
    // A 16-byte string still fits a fixstr; str8 starts at 32 bytes.
    let cases: &[(usize, &[u8])] = &[
        (0, &[0xa0]),
        (16, &[0xb0]),
        (31, &[0xbf]),
        (32, &[0xd9, 0x20]),
        (255, &[0xd9, 0xff]),
        (256, &[0xda, 0x01, 0x00]),
        (65_535, &[0xda, 0xff, 0xff]),
        (65_536, &[0xdb, 0x00, 0x01, 0x00, 0x00]),
    ];
    for (len, header) in cases {
        let value = Value::Str("x".repeat(*len));
        let bytes = enc(&value);
        assert_eq!(bytes, with_header(header, *len, b'x'), "str len {len}");
        assert_eq!(decode_one(&bytes), Ok(value));
    }
}

#[test]
fn multibyte_str_counts_bytes() {
    assert_eq!(enc(&Value::from("é")), [0xa2, 0xc3, 0xa9]);
    let bytes = enc(&Value::from("😀".repeat(8)));
    assert_eq!(bytes[0], 0xd9);
    assert_eq!(bytes[1], 32);
}

#[test]
fn bin_length_classes() {
    let cases: &[(usize, &[u8])] = &[
        (0, &[0xc4, 0x00]),
        (1, &[0xc4, 0x01]),
        (255, &[0xc4, 0xff]),
        (256, &[0xc5, 0x01, 0x00]),
        (65_536, &[0xc6, 0x00, 0x01, 0x00, 0x00]),
    ];
    for (len, header) in cases {
        let value = Value::Bin(vec![7; *len]);
        let bytes = enc(&value);
        assert_eq!(bytes, with_header(header, *len, 7), "bin len {len}");
        assert_eq!(decode_one(&bytes), Ok(value));
    }
}

#[test]
fn container_length_classes() {
    let arr = |n: usize| Value::Array(vec![Value::Nil; n]);
    assert_eq!(enc(&arr(0)), [0x90]);
    assert_eq!(enc(&arr(15))[0], 0x9f);
    assert_eq!(enc(&arr(16))[..3], [0xdc, 0x00, 0x10]);
    assert_eq!(enc(&arr(65_535))[..3], [0xdc, 0xff, 0xff]);
    assert_eq!(enc(&arr(65_536))[..5], [0xdd, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(decode_one(&enc(&arr(65_536))), Ok(arr(65_536)));

    let m = |n: usize| Value::Map((0..n).map(|i| (Value::from(i as u64), Value::Nil)).collect());
    assert_eq!(enc(&m(0)), [0x80]);
    assert_eq!(enc(&m(15))[0], 0x8f);
    assert_eq!(enc(&m(16))[..3], [0xde, 0x00, 0x10]);
    assert_eq!(enc(&m(65_536))[..5], [0xdf, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(decode_one(&enc(&m(70_000))), Ok(m(70_000)));
}

#[test]
fn map_keeps_order_and_any_key_type() {
    let value = Value::Map(vec![
        (Value::from("b"), Value::Int(1)),
        (Value::Int(-3), Value::from("neg")),
        (Value::Nil, Value::Bool(true)),
        (Value::from("b"), Value::Int(2)),
    ]);
    let bytes = enc(&value);
    assert_eq!(&bytes[..4], &[0x84, 0xa1, b'b', 0x01]);
    assert_eq!(decode_one(&bytes), Ok(value));
}

#[test]
fn ext_length_classes() {
    let cases: &[(usize, &[u8])] = &[
        (1, &[0xd4, 0x05]),
        (2, &[0xd5, 0x05]),
        (4, &[0xd6, 0x05]),
        (8, &[0xd7, 0x05]),
        (16, &[0xd8, 0x05]),
        (0, &[0xc7, 0x00, 0x05]),
        (3, &[0xc7, 0x03, 0x05]),
        (17, &[0xc7, 0x11, 0x05]),
        (256, &[0xc8, 0x01, 0x00, 0x05]),
        (65_536, &[0xc9, 0x00, 0x01, 0x00, 0x00, 0x05]),
    ];
    for (len, header) in cases {
        let value = Value::Ext(Ext::new(5, vec![0xee; *len]));
        let bytes = enc(&value);
        assert_eq!(bytes, with_header(header, *len, 0xee), "ext len {len}");
        assert_eq!(decode_one(&bytes), Ok(value));
    }
    assert_eq!(enc(&Value::Ext(Ext::new(-128, vec![1]))), [0xd4, 0x80, 0x01]);
}

#[test]
fn timestamp_forms() {
    assert_eq!(enc(&ts(1, 0)), [0xd6, 0xff, 0x00, 0x00, 0x00, 0x01]);
    assert_eq!(enc(&ts(0, 1)), [0xd7, 0xff, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00]);
    let mut minus_one = vec![0xc7, 0x0c, 0xff, 0, 0, 0, 0];
    minus_one.extend_from_slice(&(-1i64).to_be_bytes());
    assert_eq!(enc(&ts(-1, 0)), minus_one);

    for v in [ts(0, 0), ts(1_700_000_000, 123), ts(-86_400, 999_999_999), ts(i64::MAX, 0)] {
        assert_eq!(decode_one(&enc(&v)), Ok(v));
    }
}

#[test]
fn decoder_accepts_non_canonical_widths() {
    let cases: &[(&[u8], Value)] = &[
        (&[0xd0, 0x05], Value::Int(5)),
        (&[0xcd, 0x00, 0x01], Value::Int(1)),
        (&[0xd3, 0, 0, 0, 0, 0, 0, 0, 0x07], Value::Int(7)),
        (&[0xd9, 0x01, b'a'], Value::from("a")),
        (&[0xdb, 0, 0, 0, 0], Value::from("")),
        (&[0xc6, 0, 0, 0, 1, 0x09], Value::Bin(vec![9])),
        (&[0xdc, 0x00, 0x01, 0xc0], Value::Array(vec![Value::Nil])),
        (&[0xdf, 0, 0, 0, 1, 0xa1, b'k', 0x01], Value::Map(vec![("k".into(), 1.into())])),
        (&[0xc8, 0x00, 0x01, 0x05, 0xaa], Value::Ext(Ext::new(5, vec![0xaa]))),
        (&[0xca, 0x3f, 0xc0, 0x00, 0x00], Value::F32(1.5)),
    ];
    for (bytes, expected) in cases {
        assert_eq!(&decode_one(bytes).expect("decode"), expected, "{bytes:02x?}");
    }
}

#[test]
fn decode_reports_consumed_bytes() {
    assert_eq!(decode(&[0x01, 0x02]), Ok((Value::Int(1), 1)));
    assert_eq!(decode(&[0x92, 0x01, 0xa1, b'x', 0xc0]), Ok((Value::Array(vec![1.into(), "x".into()]), 4)));
}

#[test]
fn nested_document_roundtrip() {
    let doc = map(&[
        ("name", "packwire".into()),
        ("version", Value::UInt(3)),
        ("ratio", Value::F64(0.25)),
        ("blob", Value::Bin(vec![0, 1, 2, 255])),
        ("when", ts(1_700_000_000, 500)),
        ("tags", Value::Array(vec!["a".into(), Value::Nil, Value::Bool(false)])),
        ("nested", map(&[("deep", map(&[("deeper", Value::Int(-77))]))])),
    ]);
    let bytes = enc(&doc);
    assert_eq!(decode_one(&bytes), Ok(doc.clone()));
    assert_eq!(enc(&doc), bytes);
}

#[test]
fn encoder_is_reusable_and_deterministic() {
    let mut encoder = Encoder::new();
    let mut gen = ValueGen::new(0x5eed);
    for _ in 0..200 {
        let value = gen.value(3);
        let first = encoder.encode(&value).expect("encode");
        let second = encoder.encode(&value).expect("encode");
        assert_eq!(first, second);
        assert_eq!(first, enc(&value));
        assert_eq!(decode_one(&first), Ok(value));
    }
}
