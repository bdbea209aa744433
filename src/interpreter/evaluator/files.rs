use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, Write},
    path::Path,
};

use crate::{
    ast::{Expr, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

/// One entry of the file-handle table.
///
/// The reader is created lazily on the first `lineinput`/`eof` call against
/// the handle; writes through `print #` keep going to the file directly.
pub(crate) struct FileHandle {
    pub(crate) file:   File,
    pub(crate) reader: Option<BufReader<File>>,
}

impl Interpreter {
    /// Executes `open #N, path, mode`.
    ///
    /// Modes are exactly `"r"`, `"w"`, and `"a"`. For `"w"` and `"a"` a
    /// missing parent directory is created. Reopening a handle closes the
    /// prior file first.
    pub(crate) fn exec_open(&mut self,
                            handle: i64,
                            path: &Expr,
                            mode: &Expr,
                            span: Span)
                            -> EvalResult<Flow> {
        if handle <= 0 {
            return Err(self.fail(RuntimeError::InvalidHandle { what: "open", span }));
        }

        let path_value = self.eval_expr(path)?;
        let mode_value = self.eval_expr(mode)?;

        let Value::Str(path_text) = path_value else {
            return Err(self.fail(RuntimeError::Usage { message:
                                                           "open path must be a string".to_string(),
                                                       span: path.span(), }));
        };
        let Value::Str(mode_text) = mode_value else {
            return Err(self.fail(RuntimeError::Usage { message:
                                                           "open mode must be a string (\"r\", \"w\", or \"a\")".to_string(),
                                                       span: mode.span(), }));
        };

        // reopening a handle closes the prior file
        self.files.remove(&handle);

        let opened = match mode_text.as_str() {
            "w" => {
                create_parent_dirs(&path_text);
                OpenOptions::new().create(true)
                                  .truncate(true)
                                  .write(true)
                                  .open(&path_text)
            },
            "a" => {
                create_parent_dirs(&path_text);
                OpenOptions::new().create(true).append(true).open(&path_text)
            },
            "r" => File::open(&path_text),
            _ => return Err(self.fail(RuntimeError::InvalidMode { span })),
        };

        let file = opened.map_err(|e| {
                             self.fail(RuntimeError::Io { message: format!("open failed: {e}"),
                                                          span })
                         })?;

        self.files.insert(handle, FileHandle { file, reader: None });
        Ok(Flow::Normal)
    }

    /// Executes `close #N`. Closing a handle that is not open is an error.
    pub(crate) fn exec_close(&mut self, handle: i64, span: Span) -> EvalResult<Flow> {
        match self.files.remove(&handle) {
            Some(_) => Ok(Flow::Normal),
            None => Err(self.fail(RuntimeError::HandleNotOpen { op: "close",
                                                                handle,
                                                                span })),
        }
    }

    /// Executes `print #N, expr`: the canonical rendering followed by a
    /// newline, written to the file behind the handle.
    pub(crate) fn exec_print_handle(&mut self,
                                    handle: i64,
                                    value: &Expr,
                                    span: Span)
                                    -> EvalResult<Flow> {
        if !self.files.contains_key(&handle) {
            return Err(self.fail(RuntimeError::HandleNotOpen { op: "print",
                                                               handle,
                                                               span }));
        }

        let value = self.eval_expr(value)?;
        let rendered = format!("{value}\n");

        let written = self.files
                          .get_mut(&handle)
                          .map(|entry| entry.file.write_all(rendered.as_bytes()));

        match written {
            Some(Ok(())) => Ok(Flow::Normal),
            Some(Err(e)) => Err(self.fail(RuntimeError::Io { message:
                                                                 format!("print failed: {e}"),
                                                             span })),
            None => Err(self.fail(RuntimeError::HandleNotOpen { op: "print",
                                                                handle,
                                                                span })),
        }
    }

    /// Reads one line from a handle.
    ///
    /// Returns `Ok(None)` only at true end of file with no residue; a final
    /// line without a terminator is still returned. The trailing line ending
    /// is stripped. Errors are bare messages; the caller wraps them with its
    /// own operation name (`lineinput() failed: ...`).
    pub(crate) fn read_handle_line(&mut self, handle: i64) -> Result<Option<String>, String> {
        use std::io::BufRead;

        let reader = self.handle_reader(handle)?;
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Whether the next read on a handle would hit end of file.
    ///
    /// An unopened handle counts as exhausted rather than erroring, so
    /// read loops can use `eof()` as their sole guard.
    pub(crate) fn handle_at_eof(&mut self, handle: i64) -> Result<bool, String> {
        use std::io::BufRead;

        if !self.files.contains_key(&handle) {
            return Ok(true);
        }

        let reader = match self.handle_reader(handle) {
            Ok(reader) => reader,
            Err(_) => return Ok(true),
        };

        match reader.fill_buf() {
            Ok(buffer) => Ok(buffer.is_empty()),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Returns the buffered reader for a handle, creating it on first use.
    fn handle_reader(&mut self, handle: i64) -> Result<&mut BufReader<File>, String> {
        let Some(entry) = self.files.get_mut(&handle) else {
            return Err(format!("handle #{handle} is not open"));
        };

        if entry.reader.is_none() {
            let file = entry.file
                            .try_clone()
                            .map_err(|e| format!("handle #{handle}: {e}"))?;
            entry.reader = Some(BufReader::new(file));
        }

        match entry.reader.as_mut() {
            Some(reader) => Ok(reader),
            None => Err(format!("handle #{handle} is not open")),
        }
    }
}

/// Creates the parent directory of `path` if it is missing, ignoring
/// failures; the subsequent open reports the real error.
fn create_parent_dirs(path: &str) {
    if let Some(parent) = Path::new(path).parent()
       && !parent.as_os_str().is_empty()
    {
        let _ = fs::create_dir_all(parent);
    }
}
