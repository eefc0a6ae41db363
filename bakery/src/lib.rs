//! Bakery is a schema-driven text-to-binary data compiler and inverse decompiler.
//!
//! A *data file* assigns values to a schema; the schema is declared in a separate *recipe
//! file*. Compiling a data file yields a compact binary cache deserializable with serde and
//! bincode; when the cache is older than its sources it is rebuilt automatically. Schemas can
//! also be declared directly in Rust with `#[derive(Recipe)]`, skipping the text recipe file
//! entirely.
//!
//! # Basic example
//!
//! ```
//! use bakery::load_from_string;
//! use bakery_derive::Recipe;
//! use serde::Deserialize;
//!
//! #[derive(Recipe, Deserialize, Debug, PartialEq)]
//! struct GameConfig {
//!     width: u32,
//!     height: u32,
//!     fullscreen: bool,
//! }
//!
//! let config: GameConfig = load_from_string("{width = 1024, height = 768, fullscreen = true}");
//! assert_eq!(config, GameConfig { width: 1024, height: 768, fullscreen: true });
//! ```
//!
//! # Recipe files
//!
//! ```no_run
//! use bakery::driver;
//! use std::path::Path;
//!
//! let log = driver::compile(Path::new("assets/level1.dat"), Path::new("assets/level1.bin"), &[]);
//! log.print();
//! assert!(log.ok());
//! ```

mod decompile;
mod emit;
mod error;
mod file;
mod ir;
mod log;
mod numeric;
mod parser;
mod resolve;
mod ser;
mod tree;

pub mod driver;

pub use error::CompileError;
pub use ir::{FileIndication, NodeTree, Path, TypeInstantiation};
pub use log::{Log, LogEntry, Severity};
pub use parser::ParseError;
pub use ser::{
    decompile_to_string, load_from_file, load_from_file_with_recipe, load_from_string, node_type_inst,
    tuple_type_inst, write_from_string, write_from_string_with_recipe, LoadError, Recipe,
};
