mod common;
use common::{test_compile_ser, test_load_from_string};
use hex_literal::hex;

#[test]
fn test_tuple() {
    test_compile_ser(
        "{false, 3725879192}",
        Some(&hex!("00986714de")),
        (false, 3725879192u32),
    );
    test_compile_ser(
        "{true, 3017113990}",
        Some(&hex!("018681d5b3")),
        (true, 3017113990u32),
    );

    test_load_from_string("{0, 1}", (0i32, 1i32));
    test_load_from_string("{0, 1, 2}", (0i32, 1i32, 2i32));
    test_load_from_string("{99, false, {-1, 4}}", (99, false, (-1, 4)));
}
