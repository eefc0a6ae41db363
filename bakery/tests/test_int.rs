mod common;
use common::test_compile_ser;
use hex_literal::hex;

#[test]
fn test_i8() {
    test_compile_ser("0", Some(&hex!("00")), 0i8);
    test_compile_ser("-1", Some(&hex!("ff")), -1i8);
    test_compile_ser("-128", Some(&hex!("80")), -128i8);
    test_compile_ser("127", Some(&hex!("7f")), 127i8);
    // Random vectors
    test_compile_ser("-4", Some(&hex!("fc")), -4i8);
    test_compile_ser("-50", Some(&hex!("ce")), -50i8);
    test_compile_ser("25", Some(&hex!("19")), 25i8);
    test_compile_ser("122", Some(&hex!("7a")), 122i8);
    test_compile_ser("116", Some(&hex!("74")), 116i8);
    test_compile_ser("111", Some(&hex!("6f")), 111i8);
    test_compile_ser("-3", Some(&hex!("fd")), -3i8);
    test_compile_ser("19", Some(&hex!("13")), 19i8);
    test_compile_ser("-98", Some(&hex!("9e")), -98i8);
    test_compile_ser("-91", Some(&hex!("a5")), -91i8);
}

#[test]
fn test_u8() {
    test_compile_ser("0", Some(&hex!("00")), 0u8);
    test_compile_ser("255", Some(&hex!("ff")), 255u8);
    // Random vectors
    test_compile_ser("134", Some(&hex!("86")), 134u8);
    test_compile_ser("156", Some(&hex!("9c")), 156u8);
    test_compile_ser("127", Some(&hex!("7f")), 127u8);
    test_compile_ser("151", Some(&hex!("97")), 151u8);
    test_compile_ser("59", Some(&hex!("3b")), 59u8);
    test_compile_ser("27", Some(&hex!("1b")), 27u8);
    test_compile_ser("78", Some(&hex!("4e")), 78u8);
    test_compile_ser("227", Some(&hex!("e3")), 227u8);
    test_compile_ser("123", Some(&hex!("7b")), 123u8);
    test_compile_ser("116", Some(&hex!("74")), 116u8);
}

#[test]
fn test_i16() {
    test_compile_ser("0", Some(&hex!("0000")), 0i16);
    test_compile_ser("-1", Some(&hex!("ffff")), -1i16);
    test_compile_ser("-32768", Some(&hex!("0080")), -32768i16);
    test_compile_ser("32767", Some(&hex!("ff7f")), 32767i16);
    // Random vectors
    test_compile_ser("15549", Some(&hex!("bd3c")), 15549i16);
    test_compile_ser("20778", Some(&hex!("2a51")), 20778i16);
    test_compile_ser("-27791", Some(&hex!("7193")), -27791i16);
    test_compile_ser("-12227", Some(&hex!("3dd0")), -12227i16);
    test_compile_ser("-13868", Some(&hex!("d4c9")), -13868i16);
    test_compile_ser("24849", Some(&hex!("1161")), 24849i16);
    test_compile_ser("-20422", Some(&hex!("3ab0")), -20422i16);
    test_compile_ser("-1105", Some(&hex!("affb")), -1105i16);
    test_compile_ser("-28220", Some(&hex!("c491")), -28220i16);
    test_compile_ser("27364", Some(&hex!("e46a")), 27364i16);
}

#[test]
fn test_u16() {
    test_compile_ser("0", Some(&hex!("0000")), 0u16);
    test_compile_ser("65535", Some(&hex!("ffff")), 65535u16);
    // Random vectors
    test_compile_ser("21581", Some(&hex!("4d54")), 21581u16);
    test_compile_ser("58867", Some(&hex!("f3e5")), 58867u16);
    test_compile_ser("32137", Some(&hex!("897d")), 32137u16);
    test_compile_ser("42782", Some(&hex!("1ea7")), 42782u16);
    test_compile_ser("38907", Some(&hex!("fb97")), 38907u16);
    test_compile_ser("60739", Some(&hex!("43ed")), 60739u16);
    test_compile_ser("41645", Some(&hex!("ada2")), 41645u16);
    test_compile_ser("24172", Some(&hex!("6c5e")), 24172u16);
    test_compile_ser("11735", Some(&hex!("d72d")), 11735u16);
    test_compile_ser("33016", Some(&hex!("f880")), 33016u16);
}

#[test]
fn test_i32() {
    test_compile_ser("0", Some(&hex!("00000000")), 0i32);
    test_compile_ser("-1", Some(&hex!("ffffffff")), -1i32);
    test_compile_ser(
        "-2147483648",
        Some(&hex!("00000080")),
        -2147483648i32,
    );
    test_compile_ser("2147483647", Some(&hex!("ffffff7f")), 2147483647i32);
    // Random vectors
    test_compile_ser("463957049", Some(&hex!("396ca71b")), 463957049i32);
    test_compile_ser(
        "-1534200772",
        Some(&hex!("3cf48da4")),
        -1534200772i32,
    );
    test_compile_ser("-655069093", Some(&hex!("5b70f4d8")), -655069093i32);
    test_compile_ser(
        "-1593580764",
        Some(&hex!("24e303a1")),
        -1593580764i32,
    );
    test_compile_ser(
        "-2011365495",
        Some(&hex!("89ff1c88")),
        -2011365495i32,
    );
    test_compile_ser("791315362", Some(&hex!("a2832a2f")), 791315362i32);
    test_compile_ser("-395676156", Some(&hex!("04766ae8")), -395676156i32);
    test_compile_ser("477225567", Some(&hex!("5fe2711c")), 477225567i32);
    test_compile_ser("1807040406", Some(&hex!("963fb56b")), 1807040406i32);
    test_compile_ser("514118409", Some(&hex!("09d3a41e")), 514118409i32);
}

#[test]
fn test_u32() {
    test_compile_ser("0", Some(&hex!("00000000")), 0u32);
    test_compile_ser("4294967295", Some(&hex!("ffffffff")), 4294967295u32);
    // Random vectors
    test_compile_ser("554524088", Some(&hex!("b85d0d21")), 554524088u32);
    test_compile_ser("3826198075", Some(&hex!("3b260fe4")), 3826198075u32);
    test_compile_ser("1446776941", Some(&hex!("6d103c56")), 1446776941u32);
    test_compile_ser("2578485596", Some(&hex!("5c91b099")), 2578485596u32);
    test_compile_ser("370701113", Some(&hex!("39731816")), 370701113u32);
    test_compile_ser("181880392", Some(&hex!("4846d70a")), 181880392u32);
    test_compile_ser("1339569466", Some(&hex!("3a35d84f")), 1339569466u32);
    test_compile_ser("1637158243", Some(&hex!("630d9561")), 1637158243u32);
    test_compile_ser("3293265353", Some(&hex!("c93d4bc4")), 3293265353u32);
    test_compile_ser("2169735811", Some(&hex!("838a5381")), 2169735811u32);
}

#[test]
fn test_integer_out_of_range() {
    let mut out = Vec::new();
    assert!(bakery::write_from_string::<i8>(&mut out, "128").is_err());
    assert!(bakery::write_from_string::<i8>(&mut out, "-129").is_err());
    assert!(bakery::write_from_string::<u8>(&mut out, "-1").is_err());
    assert!(bakery::write_from_string::<u8>(&mut out, "256").is_err());
}
