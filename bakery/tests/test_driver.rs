//! End-to-end tests of the file-based driver: recipe text, data text, compile, decompile.

use bakery::driver;
use bakery::FileIndication;
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_primitive_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "types.rec",
        "int a; short b; char c; float d; double e; string f; \
         pair<int,float> g; tuple<int,float,string> h; \
         list<int> i; map<string,float> j; \
         enum K { first, second }; K k;",
    );
    let dat = write(
        dir.path(),
        "types.dat",
        r#"recipe "types.rec";
        a=-42; b=101; c=127; d=3.14159265; e=-3.14159265; f="Hello world!";
        g={99,2}; h={123456,-8.88,"tomato"};
        i={5,4,3,2,1,0}; j={"a"=6,"b"=7}; k=second;"#,
    );
    let bin = dir.path().join("types.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let recipe = FileIndication { path: "types.rec".to_string(), absolute: false };
    let dat2 = dir.path().join("types2.dat");
    let log = driver::decompile(&bin, &recipe, None, &dat2, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let bin2 = dir.path().join("types2.bin");
    let log = driver::compile(&dat2, &bin2, &[]);
    assert!(log.ok(), "{:?}", log.entries());
    assert_eq!(fs::read(&bin).unwrap(), fs::read(&bin2).unwrap());
}

#[test]
fn test_unsigned_rejection() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "unsigned int x;");
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; x=-1;"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(!log.ok());
    assert!(!bin.exists());
}

#[test]
fn test_default_elision() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "int x = 7; int y;");
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; y = 3;"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let recipe = FileIndication { path: "r.rec".to_string(), absolute: false };
    let dat2 = dir.path().join("d2.dat");
    let log = driver::decompile(&bin, &recipe, None, &dat2, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let text = fs::read_to_string(&dat2).unwrap();
    assert!(!text.contains("x ="));
    assert!(text.contains("y = 3;"));
}

#[test]
fn test_variant() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "variant V { int a; float b; string c; }; V v;");
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; v = b: 12.5;"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let mut expected = vec![1u8, 0, 0, 0];
    expected.extend_from_slice(&12.5f32.to_ne_bytes());
    assert_eq!(fs::read(&bin).unwrap(), expected);
}

#[test]
fn test_fixed_vs_dynamic_array() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "int[2][0] m;");
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; m = {{1,2,3},{4,5}};"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(log.ok(), "{:?}", log.entries());

    let mut expected = Vec::new();
    expected.extend_from_slice(&3usize.to_ne_bytes());
    expected.extend_from_slice(&1i32.to_ne_bytes());
    expected.extend_from_slice(&2i32.to_ne_bytes());
    expected.extend_from_slice(&3i32.to_ne_bytes());
    expected.extend_from_slice(&2usize.to_ne_bytes());
    expected.extend_from_slice(&4i32.to_ne_bytes());
    expected.extend_from_slice(&5i32.to_ne_bytes());
    assert_eq!(fs::read(&bin).unwrap(), expected);
}

#[test]
fn test_enum_assignment_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "enum E { a, b = 10, c, d = 9 }; E e;");
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; e = a;"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(!log.ok());
    assert!(log.entries().iter().any(|e| e.message.contains("predecessor")));
}

#[test]
fn test_truncated_binary_is_eof_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "r.rec", "int x; int y;");
    let bin = dir.path().join("d.bin");
    fs::write(&bin, vec![1, 0, 0, 0]).unwrap(); // only enough bytes for `x`, not `y`

    let recipe = FileIndication { path: "r.rec".to_string(), absolute: false };
    let dat = dir.path().join("d.dat");
    let log = driver::decompile(&bin, &recipe, None, &dat, &[]);
    assert!(!log.ok());
    assert!(log.entries().iter().any(|e| e.message.contains("exhausted")));
}

#[test]
fn test_namespace_merge_across_includes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.rec", "namespace ns { struct S { int x; } }");
    write(dir.path(), "b.rec", "namespace ns { struct T { int y; } }");
    write(
        dir.path(),
        "r.rec",
        r#"include "a.rec"; include "b.rec"; ns::S s; ns::T t;"#,
    );
    let dat = write(dir.path(), "d.dat", r#"recipe "r.rec"; s = {x = 1}; t = {y = 2};"#);
    let bin = dir.path().join("d.bin");
    let log = driver::compile(&dat, &bin, &[]);
    assert!(log.ok(), "{:?}", log.entries());
    assert_eq!(fs::read(&bin).unwrap(), vec![1, 0, 0, 0, 2, 0, 0, 0]);
}
