use bakery::{decompile_to_string, load_from_string, write_from_string, Recipe};
use core::fmt::Debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Compile data against a Recipe-trait type, check the binary result, and check that
/// deserialization round-trips through both bincode and the Recipe trait path.
///
/// # Arguments
///
/// * `dat` - Data string (a single `dat_value`)
/// * `bin` - Expected binary result, or `None` if the encoding is not deterministic (a `HashMap`,
///   for instance)
/// * `val` - Expected deserialization result
pub fn test_compile_ser<T>(dat: &str, bin: Option<&[u8]>, val: T)
where
    T: Recipe + Debug + Serialize + PartialEq + DeserializeOwned,
{
    let mut out = Vec::<u8>::new();
    write_from_string::<T>(&mut out, dat).unwrap();
    if let Some(bin) = bin {
        assert_eq!(out, bin);
        assert_eq!(bincode::serialize(&val).unwrap(), bin);
    }
    assert_eq!(bincode::deserialize::<T>(&out).unwrap(), val);
    assert_eq!(load_from_string::<T>(dat), val);
}

/// Tests loading data from a string using the Recipe trait.
pub fn test_load_from_string<T>(dat: &str, expected: T)
where
    T: Recipe + Debug + PartialEq + DeserializeOwned,
{
    assert_eq!(load_from_string::<T>(dat), expected);
}

/// Decompiles a binary blob built for a Recipe-trait type and checks the resulting text.
pub fn test_decompile<T: Recipe>(bin: &[u8], expected: &str) {
    assert_eq!(decompile_to_string::<T>(bin), expected);
}
