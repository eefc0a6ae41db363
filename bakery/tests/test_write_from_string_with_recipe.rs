//! `write_from_string_with_recipe` takes both the recipe and data as in-memory strings, with no
//! filesystem access at all.

use bakery::write_from_string_with_recipe;

#[test]
fn test_basic() {
    let mut out = Vec::new();
    write_from_string_with_recipe(&mut out, "int x; int y;", "x = 42; y = 84;").unwrap();
    assert_eq!(out, vec![42, 0, 0, 0, 84, 0, 0, 0]);
}

#[test]
fn test_nested_struct() {
    let mut out = Vec::new();
    write_from_string_with_recipe(
        &mut out,
        "struct Vector { int x; int y; } Vector v;",
        "v = {x = 1, y = 2};",
    )
    .unwrap();
    assert_eq!(out, vec![1, 0, 0, 0, 2, 0, 0, 0]);
}

#[test]
fn test_unresolvable_type_is_an_error() {
    let mut out = Vec::new();
    let err = write_from_string_with_recipe(&mut out, "NoSuchType x;", "x = 1;");
    assert!(err.is_err());
}
