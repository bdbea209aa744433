use std::{
    fs, mem,
    path::{Component, Path, PathBuf},
};

use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            utils::split_lines,
        },
        lexer::{normalize_newlines, tokenize},
        parser::core::parse,
    },
};

/// The load state of one module, keyed by its cleaned resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModuleState {
    /// The module's top level is currently executing.
    Loading,
    /// The module executed successfully; further imports are no-ops.
    Loaded,
}

impl Interpreter {
    /// Executes `import "path"`.
    ///
    /// The path is resolved against an ordered candidate list (importer
    /// directory, its `lib/`, project root, its `lib/`; `.bpl` appended when
    /// the path has no extension). A loaded module is skipped; a module
    /// already loading is a cycle error listing the import chain. The
    /// module's program runs in the same interpreter, so its functions and
    /// globals land in the caller's tables. On any failure the registry
    /// entry is cleared so a later import can retry.
    pub(crate) fn exec_import(&mut self, path: &str, span: Span) -> EvalResult<Flow> {
        let importer = self.filename.clone();
        let (resolved, tried) = resolve_import_path(path, &importer);

        match self.modules.get(&resolved) {
            Some(ModuleState::Loaded) => return Ok(Flow::Normal),
            Some(ModuleState::Loading) => {
                return Err(self.fail(RuntimeError::CircularImport { stack:
                                                                        self.module_stack.clone(),
                                                                    target: resolved,
                                                                    span }));
            },
            None => {},
        }

        if !Path::new(&resolved).exists() {
            return Err(self.fail(RuntimeError::ImportNotFound { path: path.to_string(),
                                                                tried,
                                                                span }));
        }

        self.modules.insert(resolved.clone(), ModuleState::Loading);
        self.module_stack.push(resolved.clone());

        let result = self.load_and_run(&resolved, span);

        self.module_stack.pop();

        match result {
            Ok(Flow::Normal) => {
                self.modules.insert(resolved, ModuleState::Loaded);
                Ok(Flow::Normal)
            },
            Ok(flow) => {
                self.modules.remove(&resolved);
                Ok(flow)
            },
            Err(e) => {
                self.modules.remove(&resolved);
                Err(e)
            },
        }
    }

    /// Reads, parses, and executes a module, swapping the diagnostic context
    /// to the module's own filename and source for the duration.
    fn load_and_run(&mut self, resolved: &str, span: Span) -> EvalResult<Flow> {
        let data = fs::read_to_string(resolved).map_err(|e| {
                       self.fail(RuntimeError::ImportFailed { path:    resolved.to_string(),
                                                              details: e.to_string(),
                                                              span })
                   })?;
        let source = normalize_newlines(&data);

        let program = tokenize(&source)
            .and_then(|tokens| parse(&tokens))
            .map_err(|e| {
                self.fail(RuntimeError::ImportFailed { path:    resolved.to_string(),
                                                       details: e.to_string(),
                                                       span })
            })?;

        let prev_filename = mem::replace(&mut self.filename, resolved.to_string());
        let prev_lines = mem::replace(&mut self.lines, split_lines(&source));

        let flow = self.exec_block(&program);

        self.filename = prev_filename;
        self.lines = prev_lines;

        flow
    }
}

/// Resolves an import path to the first existing candidate.
///
/// Returns the chosen path and the full candidate list (for the error
/// message when nothing exists). When no candidate exists the first one is
/// returned as the nominal resolution.
pub(crate) fn resolve_import_path(raw: &str, importer: &str) -> (String, Vec<String>) {
    let candidates = import_candidates(raw, importer);

    let resolved = candidates.iter()
                             .find(|candidate| Path::new(candidate).exists())
                             .or_else(|| candidates.first())
                             .cloned()
                             .unwrap_or_else(|| raw.to_string());

    (resolved, candidates)
}

/// Builds the ordered candidate list for an import path.
///
/// Absolute paths try the path itself, then with `.bpl` appended when there
/// is no extension. Relative paths try, in order: the importer's directory,
/// its `lib/`, then each project root (currently just `.`) and its `lib/`,
/// each with the `.bpl` variant. Duplicates are removed preserving order.
fn import_candidates(raw: &str, importer: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let needs_ext = Path::new(raw).extension().is_none();
    let with_ext = format!("{raw}.bpl");

    let mut candidates = Vec::new();

    if Path::new(raw).is_absolute() {
        candidates.push(clean_path(raw));
        if needs_ext {
            candidates.push(clean_path(&with_ext));
        }
    } else {
        let mut dirs = Vec::new();
        if !importer.is_empty() {
            dirs.push(parent_dir(importer));
        }
        dirs.push(".".to_string());

        for dir in dirs {
            let lib = join(&dir, "lib");
            for base in [dir.as_str(), lib.as_str()] {
                candidates.push(clean_path(&join(base, raw)));
                if needs_ext {
                    candidates.push(clean_path(&join(base, &with_ext)));
                }
            }
        }
    }

    // dedup preserving order
    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}

/// The directory containing `path`, with `.` for bare filenames.
fn parent_dir(path: &str) -> String {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
        _ => ".".to_string(),
    }
}

fn join(dir: &str, name: &str) -> String {
    Path::new(dir).join(name).display().to_string()
}

/// Lexically cleans a path: drops `.` segments and resolves `..` against
/// preceding normal segments. An empty result becomes `.`.
fn clean_path(path: &str) -> String {
    let mut cleaned = PathBuf::new();

    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                },
                Some(Component::RootDir) => {},
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other),
        }
    }

    if cleaned.as_os_str().is_empty() {
        ".".to_string()
    } else {
        cleaned.display().to_string()
    }
}
