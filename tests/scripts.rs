use std::{cell::RefCell, fs, io::Cursor, io::Write, rc::Rc};

use bpl::interpreter::{
    evaluator::core::Interpreter,
    lexer::{normalize_newlines, tokenize},
    parser::core::parse,
};
use walkdir::WalkDir;

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

/// Every `tests/scripts/*.bpl` file runs against a sibling `.out` file
/// holding its expected stdout.
#[test]
fn scripts_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| {
                                         e.path().extension().is_some_and(|ext| ext == "bpl")
                                     })
    {
        let path = entry.path();
        count += 1;

        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                           panic!("failed to read {expected_path:?}: {e}")
                       });

        let source = normalize_newlines(&source);
        let sink = SharedBuf::default();
        let mut interp = Interpreter::with_io(&path.display().to_string(),
                                              &source,
                                              Box::new(sink.clone()),
                                              Box::new(Cursor::new(Vec::new())));

        let result = tokenize(&source).map_err(|e| e.to_string())
                                      .and_then(|tokens| {
                                          parse(&tokens).map_err(|e| e.to_string())
                                      })
                                      .and_then(|program| {
                                          interp.run(&program).map_err(|e| e.to_string())
                                      });

        if let Err(e) = result {
            panic!("script {path:?} failed: {e}");
        }

        let output = String::from_utf8(sink.0.borrow().clone()).expect("non-UTF-8 output");
        assert_eq!(output, expected, "output mismatch for {path:?}");
    }

    assert!(count > 0, "no scripts found in tests/scripts");
}
