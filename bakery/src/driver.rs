//! Driver (spec §4.7, §6.4, C6): orchestrates parse → resolve → emit, or
//! parse-recipe → decompile, staging diagnostics into a `Log` and removing partial output on
//! failure.

use crate::decompile::Decompiler;
use crate::emit::Emitter;
use crate::error::CompileError;
use crate::file::FileResolver;
use crate::ir::{FileIndication, NodeTree, Path as RecPath, TypeInstantiation};
use crate::log::Log;
use crate::parser;
use crate::resolve;
use std::path::{Path, PathBuf};

/// Checks whether `bin_path` is missing or older than `dat_path`/`rec_path` (spec §1: "rebuilt
/// automatically" when the cache is stale).
pub fn is_compilation_required(rec_path: Option<&Path>, dat_path: &Path, bin_path: &Path) -> Result<bool, CompileError> {
    let bin_meta = match std::fs::metadata(bin_path) {
        Ok(m) => m,
        Err(_) => return Ok(true),
    };
    let dat_meta = std::fs::metadata(dat_path)?;
    let bin_modified = bin_meta.modified()?;
    let mut stale = bin_modified < dat_meta.modified()?;
    if let Some(rec_path) = rec_path {
        let rec_meta = std::fs::metadata(rec_path)?;
        stale = stale || bin_modified < rec_meta.modified()?;
    }
    Ok(stale)
}

fn load_recipe(
    tree: &mut NodeTree,
    file_resolver: &FileResolver,
    indication: &FileIndication,
    current_dir: &Path,
    log: &mut Log,
) -> Option<u32> {
    let (path, text) = match file_resolver.read(indication, current_dir) {
        Ok(v) => v,
        Err(reason) => {
            log.error_from(
                tree,
                &CompileError::Include {
                    path: indication.path.clone(),
                    reason,
                },
            );
            return None;
        }
    };
    let parsed = match parser::parse_recipe_source(tree, &text) {
        Ok(p) => p,
        Err(e) => {
            log.error_from(tree, &CompileError::Parse(e));
            return None;
        }
    };
    let dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let (root, errors) = resolve::resolve_recipe(tree, file_resolver, parsed, &dir);
    log.extend_errors(tree, &errors);
    Some(root)
}

fn identity_type_inst(root: u32) -> TypeInstantiation {
    let mut inst = TypeInstantiation::new(RecPath {
        absolute: true,
        segments: Vec::new(),
    });
    inst.type_ref = Some(root);
    inst
}

/// `compile(dat_path, bin_path, include_dirs)` (spec §4.7).
pub fn compile(dat_path: &Path, bin_path: &Path, include_dirs: &[PathBuf]) -> Log {
    let mut log = Log::new();
    let mut tree: NodeTree = NodeTree::new();
    let file_resolver = FileResolver::new(include_dirs.to_vec());

    let dat_text = match std::fs::read_to_string(dat_path) {
        Ok(t) => t,
        Err(e) => {
            log.error_from(&tree, &CompileError::Io(e.to_string()));
            return log;
        }
    };
    let parsed_data = match parser::parse_data_source(&mut tree, &dat_text) {
        Ok(p) => p,
        Err(e) => {
            log.error_from(&tree, &CompileError::Parse(e));
            return log;
        }
    };

    let dat_dir = dat_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let recipe_root = match load_recipe(&mut tree, &file_resolver, &parsed_data.recipe_file, &dat_dir, &mut log) {
        Some(r) => r,
        None => return log,
    };

    let mut root_inst = match parsed_data.recipe_type {
        Some(mut ty) => {
            let errors = resolve::resolve_standalone_type_inst(&mut tree, &file_resolver, recipe_root, &mut ty);
            log.extend_errors(&tree, &errors);
            ty
        }
        None => identity_type_inst(recipe_root),
    };
    if root_inst.type_ref.is_none() {
        root_inst = identity_type_inst(recipe_root);
    }

    if !log.ok() {
        let _ = std::fs::remove_file(bin_path);
        return log;
    }

    let mut emitter = Emitter::new(&tree);
    let mut bytes = Vec::new();
    emitter.write_root(&root_inst, parsed_data.root, &mut bytes);
    log.extend_errors(&tree, &emitter.errors);

    if !log.ok() {
        let _ = std::fs::remove_file(bin_path);
        return log;
    }

    if let Err(e) = std::fs::write(bin_path, &bytes) {
        log.error_from(&tree, &CompileError::Io(e.to_string()));
        let _ = std::fs::remove_file(bin_path);
    } else {
        log.info(format!("compiled {} -> {}", dat_path.display(), bin_path.display()));
    }
    log
}

/// `decompile(bin_path, recipe_indication, dat_path, include_dirs)` (spec §4.7).
pub fn decompile(
    bin_path: &Path,
    recipe_file: &FileIndication,
    recipe_type: Option<&str>,
    dat_path: &Path,
    include_dirs: &[PathBuf],
) -> Log {
    let mut log = Log::new();
    let mut tree: NodeTree = NodeTree::new();
    let file_resolver = FileResolver::new(include_dirs.to_vec());

    let bytes = match std::fs::read(bin_path) {
        Ok(b) => b,
        Err(e) => {
            log.error_from(&tree, &CompileError::Io(e.to_string()));
            return log;
        }
    };

    let current_dir = dat_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let recipe_root = match load_recipe(&mut tree, &file_resolver, recipe_file, &current_dir, &mut log) {
        Some(r) => r,
        None => return log,
    };

    let mut root_inst = match recipe_type {
        Some(text) => match parser::parse_type_inst_string(&mut tree, text) {
            Ok(mut ty) => {
                let errors = resolve::resolve_standalone_type_inst(&mut tree, &file_resolver, recipe_root, &mut ty);
                log.extend_errors(&tree, &errors);
                ty
            }
            Err(e) => {
                log.error_from(&tree, &CompileError::Parse(e));
                return log;
            }
        },
        None => identity_type_inst(recipe_root),
    };
    if root_inst.type_ref.is_none() {
        root_inst = identity_type_inst(recipe_root);
    }

    if !log.ok() {
        return log;
    }

    let mut decompiler = Decompiler::new(&tree);
    let body = decompiler.decompile_root(&root_inst, &bytes);
    log.extend_errors(&tree, &decompiler.errors);

    let header = format!("recipe \"{}\";\n\n", recipe_file.path);
    if let Err(e) = std::fs::write(dat_path, format!("{}{}", header, body)) {
        log.error_from(&tree, &CompileError::Io(e.to_string()));
    } else {
        log.info(format!("decompiled {} -> {}", bin_path.display(), dat_path.display()));
    }
    log
}
