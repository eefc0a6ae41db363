mod common;
use common::test_compile_ser;
use hex_literal::hex;

#[test]
fn test_list() {
    test_compile_ser(
        "{1, 2, 3, 4}",
        Some(&hex!("040000000000000001020304")),
        vec![1u8, 2, 3, 4],
    );
    test_compile_ser("{}", Some(&hex!("0000000000000000")), Vec::<u8>::new());
}

#[test]
fn test_list_nested() {
    test_compile_ser(
        "{{1, 2}, {3}}",
        None,
        vec![vec![1u8, 2], vec![3u8]],
    );
}
