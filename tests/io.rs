use std::{cell::RefCell, fs, io::Cursor, io::Write, path::Path, rc::Rc};

use bpl::interpreter::{
    evaluator::core::Interpreter,
    lexer::{normalize_newlines, tokenize},
    parser::core::parse,
};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Builds an interpreter for a script notionally located at `filename`
/// (which anchors relative imports), runs `source`, and returns the result
/// and captured output.
fn run_at(filename: &Path, source: &str) -> (Result<(), String>, String, Interpreter) {
    let source = normalize_newlines(source);
    let sink = SharedBuf::default();
    let mut interp = Interpreter::with_io(&filename.display().to_string(),
                                          &source,
                                          Box::new(sink.clone()),
                                          Box::new(Cursor::new(Vec::new())));

    let result = tokenize(&source).map_err(|e| e.to_string())
                                  .and_then(|tokens| parse(&tokens).map_err(|e| e.to_string()))
                                  .and_then(|program| {
                                      interp.run(&program).map_err(|e| e.to_string())
                                  });

    let output = String::from_utf8(sink.0.borrow().clone()).expect("non-UTF-8 output");
    (result, output, interp)
}

#[test]
fn import_executes_a_module_once() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("mod.bpl"), "print \"loaded\"\n").expect("write module");

    let main = dir.path().join("main.bpl");
    let (result, output, _) = run_at(&main, "import \"mod\"\nimport \"mod\"\n");

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "loaded\n");
}

#[test]
fn import_resolves_lib_subdirectory() {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("lib")).expect("mkdir lib");
    fs::write(dir.path().join("lib/math.bpl"),
              "function add(a, b)\nreturn a + b\nend\n").expect("write module");

    let main = dir.path().join("main.bpl");
    let (result, output, _) = run_at(&main, "import \"math\"\nprint add(2, 3)\n");

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "5\n");
}

#[test]
fn modules_share_the_interpreter_and_load_once() {
    // two sibling modules import the same library; it executes once and its
    // function stays callable from the entry file
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir(dir.path().join("lib")).expect("mkdir lib");
    fs::write(dir.path().join("lib/math.bpl"),
              "print \"math loaded\"\nfunction add(a, b)\nreturn a + b\nend\n")
        .expect("write lib");
    fs::write(dir.path().join("a.bpl"), "import \"math\"\n").expect("write a");
    fs::write(dir.path().join("b.bpl"), "import \"math\"\n").expect("write b");

    let main = dir.path().join("main.bpl");
    let (result, output, interp) =
        run_at(&main, "import \"a\"\nimport \"b\"\nprint add(1, 2)\n");

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "math loaded\n3\n");

    let (loading, loaded) = interp.modules_snapshot();
    assert!(loading.is_empty());
    assert_eq!(loaded.len(), 3);
}

#[test]
fn import_globals_land_in_the_callers_globals() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("config.bpl"), "retries = 3\n").expect("write module");

    let main = dir.path().join("main.bpl");
    let (result, output, _) = run_at(&main, "import \"config\"\nprint retries\n");

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "3\n");
}

#[test]
fn missing_import_lists_candidates() {
    let dir = TempDir::new().expect("temp dir");
    let main = dir.path().join("main.bpl");
    let (result, _, _) = run_at(&main, "import \"nosuch\"\n");

    let err = result.unwrap_err();
    assert!(err.contains("import failed: file not found \"nosuch\""), "got: {err}");
    assert!(err.contains("Tried:"), "got: {err}");
    assert!(err.contains("nosuch.bpl"), "got: {err}");
}

#[test]
fn circular_imports_report_the_chain() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("a.bpl"), "import \"b\"\n").expect("write a");
    fs::write(dir.path().join("b.bpl"), "import \"a\"\n").expect("write b");

    let main = dir.path().join("main.bpl");
    let (result, _, _) = run_at(&main, "import \"a\"\n");

    let err = result.unwrap_err();
    assert!(err.contains("Circular import detected:"), "got: {err}");
    assert!(err.contains("a.bpl"), "got: {err}");
    assert!(err.contains("b.bpl"), "got: {err}");
}

#[test]
fn failed_module_can_be_retried() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("mod.bpl"), "print nope\n").expect("write module");

    let main = dir.path().join("main.bpl");
    let (result, _, mut interp) = run_at(&main, "import \"mod\"\n");
    assert!(result.unwrap_err().contains("Undefined variable \"nope\""));

    // the registry entry was cleared, so a corrected module loads
    fs::write(dir.path().join("mod.bpl"), "nope = 1\n").expect("rewrite module");
    let source = "import \"mod\"\nprint nope\n";
    let tokens = tokenize(source).expect("tokenize");
    let program = parse(&tokens).expect("parse");
    interp.set_source(&main.display().to_string(), source);
    assert!(interp.run(&program).is_ok());
}

#[test]
fn module_errors_render_against_module_source() {
    let dir = TempDir::new().expect("temp dir");
    fs::write(dir.path().join("bad.bpl"), "x = 1\nprint missing\n").expect("write module");

    let main = dir.path().join("main.bpl");
    let (result, _, _) = run_at(&main, "import \"bad\"\n");

    let err = result.unwrap_err();
    assert!(err.contains("bad.bpl:2:7"), "got: {err}");
    assert!(err.contains("print missing"), "got: {err}");
}

#[test]
fn file_handles_write_and_read_back() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out.txt");
    let path_text = path.display().to_string();

    let source = format!("open #1, \"{path_text}\", \"w\"\nprint #1, \"alpha\"\nprint #1, 42\nclose #1\n\
                          open #1, \"{path_text}\", \"r\"\nwhile not eof(1)\nline = lineinput(1)\nprint line\nend\nclose #1\n");
    let (result, output, _) = run_at(&dir.path().join("main.bpl"), &source);

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "alpha\n42\n");
    assert_eq!(fs::read_to_string(&path).expect("read back"), "alpha\n42\n");
}

#[test]
fn open_creates_parent_directories() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("deep/nested/log.txt");
    let path_text = path.display().to_string();

    let source =
        format!("open #2, \"{path_text}\", \"a\"\nprint #2, \"entry\"\nclose #2\n");
    let (result, _, _) = run_at(&dir.path().join("main.bpl"), &source);

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(fs::read_to_string(&path).expect("read back"), "entry\n");
}

#[test]
fn reopening_a_handle_closes_the_prior_file() {
    let dir = TempDir::new().expect("temp dir");
    let first = dir.path().join("first.txt").display().to_string();
    let second = dir.path().join("second.txt").display().to_string();

    let source = format!("open #1, \"{first}\", \"w\"\nprint #1, \"one\"\n\
                          open #1, \"{second}\", \"w\"\nprint #1, \"two\"\nclose #1\n");
    let (result, _, _) = run_at(&dir.path().join("main.bpl"), &source);

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(fs::read_to_string(dir.path().join("first.txt")).expect("first"), "one\n");
    assert_eq!(fs::read_to_string(dir.path().join("second.txt")).expect("second"), "two\n");
}

#[test]
fn handle_misuse_is_an_error() {
    let (result, _, _) = run_at(Path::new("main.bpl"), "close #3\n");
    assert!(result.unwrap_err()
                  .contains("close failed: handle #3 is not open"));

    let (result, _, _) = run_at(Path::new("main.bpl"), "print #3, \"x\"\n");
    assert!(result.unwrap_err()
                  .contains("print failed: handle #3 is not open"));

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("f.txt").display().to_string();
    let (result, _, _) = run_at(Path::new("main.bpl"),
                                &format!("open #1, \"{path}\", \"x\"\n"));
    assert!(result.unwrap_err()
                  .contains("open mode must be \"r\", \"w\", or \"a\""));
}

#[test]
fn eof_is_true_for_unopened_handles() {
    let (result, output, _) = run_at(Path::new("main.bpl"), "print eof(9)\n");
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "true\n");
}

#[test]
fn lineinput_returns_null_at_end_of_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("partial.txt");
    fs::write(&path, "first\nlast-no-newline").expect("write");
    let path_text = path.display().to_string();

    let source = format!("open #1, \"{path_text}\", \"r\"\nprint lineinput(1)\nprint lineinput(1)\nprint lineinput(1)\nclose #1\n");
    let (result, output, _) = run_at(&dir.path().join("main.bpl"), &source);

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "first\nlast-no-newline\nnull\n");
}

#[test]
fn whole_file_builtins() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("notes.txt").display().to_string();

    let source = format!("print exists(\"{path}\")\nwritefile(\"{path}\", \"a\")\nappendfile(\"{path}\", \"b\")\n\
                          print exists(\"{path}\")\nprint readfile(\"{path}\")\n");
    let (result, output, _) = run_at(&dir.path().join("main.bpl"), &source);

    assert!(result.is_ok(), "{result:?}");
    assert_eq!(output, "false\ntrue\nab\n");

    let (result, _, _) = run_at(Path::new("main.bpl"),
                                "x = readfile(\"/no/such/file/anywhere\")\n");
    assert!(result.unwrap_err().contains("readfile() failed:"));
}

#[test]
fn snapshots_expose_interpreter_state() {
    let source = "x = 1\nys = [1, 2]\nfunction beta()\nreturn 2\nend\nfunction alpha()\nreturn 1\nend\n";
    let (result, _, interp) = run_at(Path::new("main.bpl"), source);
    assert!(result.is_ok(), "{result:?}");

    let globals = interp.globals_snapshot();
    assert!(globals.contains_key("x"));
    assert!(globals.contains_key("ys"));

    assert_eq!(interp.function_names(), vec!["alpha".to_string(), "beta".to_string()]);

    let (loading, loaded) = interp.modules_snapshot();
    assert!(loading.is_empty());
    assert!(loaded.is_empty());
}

#[test]
fn set_source_rebinds_diagnostics() {
    let (_, _, mut interp) = run_at(Path::new("first.bpl"), "x = 1\n");

    let chunk = "print boom\n";
    interp.set_source("second.bpl", chunk);
    let tokens = tokenize(chunk).expect("tokenize");
    let program = parse(&tokens).expect("parse");

    let err = interp.run(&program).unwrap_err().to_string();
    assert!(err.contains("second.bpl:1:7"), "got: {err}");
    assert!(err.contains("print boom"), "got: {err}");
}
