mod common;
use bakery_derive::Recipe;
use common::test_compile_ser;
use hex_literal::hex;
use serde::{Deserialize, Serialize};

#[test]
fn test_basic_enum() {
    #[derive(Recipe, Debug, PartialEq, Serialize, Deserialize)]
    enum E {
        A,
        B,
        C,
    }
    test_compile_ser("A", Some(&hex!("00000000")), E::A);
    test_compile_ser("B", Some(&hex!("01000000")), E::B);
    test_compile_ser("C", Some(&hex!("02000000")), E::C);
}

#[test]
fn test_enum_tuple() {
    #[derive(Recipe, Debug, PartialEq, Serialize, Deserialize)]
    enum E {
        A(u32),
        B(bool),
        C(i32, bool),
    }
    test_compile_ser("A: 0", Some(&hex!("0000000000000000")), E::A(0));
    test_compile_ser("A: 1", Some(&hex!("0000000001000000")), E::A(1));
    test_compile_ser(
        "A: 887668751",
        Some(&hex!("000000000fc0e834")),
        E::A(887668751),
    );
    test_compile_ser("B: true", Some(&hex!("0100000001")), E::B(true));
    test_compile_ser("B: false", Some(&hex!("0100000000")), E::B(false));
    test_compile_ser(
        "C: {1627069767, false}",
        Some(&hex!("02000000471dfb6000")),
        E::C(1627069767, false),
    );
    test_compile_ser(
        "C: {-453981819, true}",
        Some(&hex!("0200000085c9f0e401")),
        E::C(-453981819, true),
    );
}

#[test]
fn test_enum_struct() {
    #[derive(Recipe, Debug, PartialEq, Serialize, Deserialize)]
    enum E {
        A { a: u32 },
        B { b: bool },
        C { c: i32, d: bool },
    }
    test_compile_ser(
        "A: {a = 42}",
        Some(&hex!("000000002a000000")),
        E::A { a: 42 },
    );
}

#[test]
fn test_enum_empty_struct() {
    #[derive(Recipe, Debug, PartialEq, Serialize, Deserialize)]
    enum E {
        A {},
        B {},
        C {},
    }
    test_compile_ser("A: {}", Some(&hex!("00000000")), E::A {});
    test_compile_ser("B: {}", Some(&hex!("01000000")), E::B {});
    test_compile_ser("C: {}", Some(&hex!("02000000")), E::C {});
}
