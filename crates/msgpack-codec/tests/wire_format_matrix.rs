use std::collections::HashMap;

use msgpack_codec::{to_vec, Bytes, Encoder, Error, ErrorCategory, Value};

fn stream(f: impl FnOnce(&mut Encoder<Vec<u8>>) -> msgpack_codec::Result<()>) -> Vec<u8> {
    let mut enc = Encoder::new(Vec::new());
    f(&mut enc).unwrap();
    enc.into_inner()
}

#[test]
fn signed_integer_stream_matrix() {
    let bytes = stream(|enc| {
        enc.encode(&-3i8)?;
        enc.encode(&16500i16)?;
        enc.encode(&(1i32 << 20))?;
        enc.encode(&0x0033_ffaa_bbcc_eeffi64)?;
        enc.encode(&(0x0033_ffaa_bbcc_eeffi64 as isize))
    });
    assert_eq!(
        bytes,
        [
            0xfd, 0xd1, 0x40, 0x74, 0xd2, 0x00, 0x10, 0x00, 0x00, 0xd3, 0x00, 0x33, 0xff, 0xaa,
            0xbb, 0xcc, 0xee, 0xff, 0xd3, 0x00, 0x33, 0xff, 0xaa, 0xbb, 0xcc, 0xee, 0xff,
        ]
    );
}

#[test]
fn unsigned_integer_stream_matrix() {
    let bytes = stream(|enc| {
        enc.encode(&255u8)?;
        enc.encode(&16500u16)?;
        enc.encode(&(1u32 << 20))?;
        enc.encode(&0x0033_ffaa_bbcc_eeffu64)
    });
    assert_eq!(
        bytes,
        [
            0xcc, 0xff, 0xcd, 0x40, 0x74, 0xce, 0x00, 0x10, 0x00, 0x00, 0xcf, 0x00, 0x33, 0xff,
            0xaa, 0xbb, 0xcc, 0xee, 0xff,
        ]
    );
}

#[test]
fn fixnum_boundary_matrix() {
    assert_eq!(to_vec(&-33i64).unwrap(), [0xd0, 0xdf]);
    assert_eq!(to_vec(&-32i64).unwrap(), [0xe0]);
    assert_eq!(to_vec(&127i64).unwrap(), [0x7f]);
    assert_eq!(to_vec(&128u64).unwrap(), [0xcc, 0x80]);
    assert_eq!(to_vec(&128i64).unwrap(), [0xd1, 0x00, 0x80]);
    assert_eq!(to_vec(&0u8).unwrap(), [0x00]);
}

#[test]
fn scalar_matrix() {
    assert_eq!(to_vec(&()).unwrap(), [0xc0]);
    assert_eq!(to_vec(&None::<u8>).unwrap(), [0xc0]);
    assert_eq!(stream(|e| { e.encode(&true)?; e.encode(&false) }), [0xc3, 0xc2]);
    assert_eq!(to_vec(&0.992f32).unwrap()[0], 0xca);
    assert_eq!(to_vec(&0.992f32).unwrap().len(), 5);
    assert_eq!(
        to_vec(&1.32342342341f64).unwrap()[1..],
        1.32342342341f64.to_be_bytes()
    );
    assert_eq!(to_vec("test").unwrap(), [0xa4, b't', b'e', b's', b't']);
}

#[test]
fn string_tier_matrix() {
    for (len, header) in [
        (31usize, vec![0xbf]),
        (32, vec![0xd9, 0x20]),
        (240, vec![0xd9, 0xf0]),
        (255, vec![0xd9, 0xff]),
        (256, vec![0xda, 0x01, 0x00]),
        (59999, vec![0xda, 0xea, 0x5f]),
        (65535, vec![0xda, 0xff, 0xff]),
        (65536, vec![0xdb, 0x00, 0x01, 0x00, 0x00]),
        (70321, vec![0xdb, 0x00, 0x01, 0x12, 0xb1]),
    ] {
        let s: String = (0..len).map(|i| char::from(0x31 + (i % 0x4e) as u8)).collect();
        let bytes = to_vec(&s).unwrap();
        assert_eq!(&bytes[..header.len()], &header[..], "len {len}");
        assert_eq!(bytes.len(), header.len() + len, "len {len}");
    }
}

#[test]
fn binary_tier_matrix() {
    assert_eq!(to_vec(&Bytes::new()).unwrap(), [0xc4, 0x00]);
    assert_eq!(to_vec(&Bytes(vec![0; 255])).unwrap()[..2], [0xc4, 0xff]);
    assert_eq!(to_vec(&Bytes(vec![0; 256])).unwrap()[..3], [0xc5, 0x01, 0x00]);
    assert_eq!(
        to_vec(&Bytes(vec![0; 65536])).unwrap()[..5],
        [0xc6, 0x00, 0x01, 0x00, 0x00]
    );
}

#[test]
fn container_tier_matrix() {
    assert_eq!(to_vec(&Vec::<u8>::new()).unwrap(), [0x90]);
    assert_eq!(to_vec(&HashMap::<String, u8>::new()).unwrap(), [0x80]);

    let fifteen: Vec<u8> = (1..=15).collect();
    let encoded = to_vec(&fifteen).unwrap();
    assert_eq!(encoded[0], 0x9f);
    assert_eq!(encoded.len(), 16);

    let sixteen: Vec<u8> = (1..=16).collect();
    let encoded = to_vec(&sixteen).unwrap();
    assert_eq!(&encoded[..3], &[0xdc, 0x00, 0x10]);
    assert_eq!(encoded.len(), 19);

    let big: Vec<()> = vec![(); 65536];
    assert_eq!(to_vec(&big).unwrap()[..5], [0xdd, 0x00, 0x01, 0x00, 0x00]);

    let map: HashMap<u16, ()> = (0..16).map(|i| (i, ())).collect();
    assert_eq!(to_vec(&map).unwrap()[..3], [0xde, 0x00, 0x10]);
    let map: HashMap<u32, ()> = (0..65536).map(|i| (i, ())).collect();
    assert_eq!(to_vec(&map).unwrap()[..5], [0xdf, 0x00, 0x01, 0x00, 0x00]);
}

#[test]
fn mixed_sequence_matrix() {
    let ints = vec![-3i64, 16500, 1 << 20, 0x0033_ffaa_bbcc_eeff];
    let bytes = to_vec(&ints).unwrap();
    assert_eq!(bytes[0], 0x94);
    assert_eq!(&bytes[1..5], &[0xfd, 0xd1, 0x40, 0x74]);
}

#[test]
fn map_pairs_in_any_order() {
    let map = HashMap::from([("test".to_string(), 4i32), ("gogo".to_string(), 4i32)]);
    let bytes = to_vec(&map).unwrap();
    let test = [0xa4, b't', b'e', b's', b't', 0x04];
    let gogo = [0xa4, b'g', b'o', b'g', b'o', 0x04];
    let a: Vec<u8> = [&[0x82][..], &test, &gogo].concat();
    let b: Vec<u8> = [&[0x82][..], &gogo, &test].concat();
    assert!(bytes == a || bytes == b, "{bytes:02x?}");
}

#[test]
fn value_writes_the_same_bytes_as_typed_data() {
    let value = Value::Array(vec![
        Value::Int(-3),
        Value::Uint(16500),
        Value::Str("x".into()),
        Value::Bin(vec![]),
        Value::Float32(1.5),
    ]);
    let typed = (-3i8, 16500u16, "x", Bytes::new(), 1.5f32);
    assert_eq!(to_vec(&value).unwrap(), to_vec(&typed).unwrap());
}

#[test]
fn out_of_range_width_is_a_range_error() {
    let mut enc = Encoder::new(Vec::new());
    let err = enc.encode_signed(1 << 40, 32).unwrap_err();
    assert!(matches!(err, Error::IntegerWidth { bit_width: 32, .. }));
    assert_eq!(err.category(), ErrorCategory::Range);
    let err = enc.encode_unsigned(0, 7).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Range);
}

#[test]
fn sink_failure_is_an_io_error() {
    struct Full;

    impl std::io::Write for Full {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let err = msgpack_codec::to_writer(Full, &"abc").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
}
