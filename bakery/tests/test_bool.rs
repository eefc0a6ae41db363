mod common;
use common::test_compile_ser;
use hex_literal::hex;

#[test]
fn test_bool() {
    test_compile_ser("false", Some(&hex!("00")), false);
    test_compile_ser("true", Some(&hex!("01")), true);
}
