use std::{cell::RefCell, io::Cursor, io::Write, rc::Rc};

use bpl::interpreter::{
    evaluator::core::Interpreter,
    lexer::{normalize_newlines, tokenize},
    parser::core::parse,
};

/// A `Write` sink the test keeps a handle to after handing it to the
/// interpreter.
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

/// Runs a source string against a fresh interpreter, returning the result
/// and everything the program printed.
fn run(source: &str) -> (Result<(), String>, String) {
    run_named(source, "test.bpl", "")
}

fn run_with_input(source: &str, input: &str) -> (Result<(), String>, String) {
    run_named(source, "test.bpl", input)
}

fn run_named(source: &str, filename: &str, input: &str) -> (Result<(), String>, String) {
    let source = normalize_newlines(source);
    let sink = SharedBuf::default();
    let mut interp = Interpreter::with_io(filename,
                                          &source,
                                          Box::new(sink.clone()),
                                          Box::new(Cursor::new(input.as_bytes().to_vec())));

    let result = tokenize(&source).map_err(|e| e.to_string())
                                  .and_then(|tokens| parse(&tokens).map_err(|e| e.to_string()))
                                  .and_then(|program| {
                                      interp.run(&program).map_err(|e| e.to_string())
                                  });

    let output = String::from_utf8(sink.0.borrow().clone()).expect("non-UTF-8 output");
    (result, output)
}

fn assert_output(source: &str, expected: &str) {
    let (result, output) = run(source);
    if let Err(e) = result {
        panic!("script failed:\n{source}\nerror: {e}");
    }
    assert_eq!(output, expected, "for script:\n{source}");
}

fn assert_error_contains(source: &str, needle: &str) {
    let (result, _) = run(source);
    match result {
        Ok(()) => panic!("script succeeded but was expected to fail:\n{source}"),
        Err(e) => {
            assert!(e.contains(needle),
                    "error {e:?} does not contain {needle:?} for script:\n{source}");
        },
    }
}

#[test]
fn canonical_rendering() {
    assert_output("print 3\n", "3\n");
    assert_output("print 3.0\n", "3\n");
    assert_output("print 2.5\n", "2.5\n");
    assert_output("print 0 - 2.5\n", "-2.5\n");
    assert_output("print true\nprint false\n", "true\nfalse\n");
    assert_output("print \"hi\"\n", "hi\n");
    assert_output("print [1, 2.5, \"x\", true]\n", "[1, 2.5, x, true]\n");
    assert_output("print {\"b\": 2, \"a\": 1}\n", "{\"a\": 1, \"b\": 2}\n");
    assert_output("print []\nprint {}\n", "[]\n{}\n");
    assert_output("print [[1, 2], {\"k\": [3]}]\n", "[[1, 2], {\"k\": [3]}]\n");
}

#[test]
fn arithmetic_and_precedence() {
    assert_output("print 1 + 2 * 3\n", "7\n");
    assert_output("print (1 + 2) * 3\n", "9\n");
    assert_output("print 10 / 4\n", "2.5\n");
    assert_output("print 7 - 2 - 1\n", "4\n");
    assert_error_contains("print 1 - \"a\"\n", "Operator \"-\" requires numbers");
}

#[test]
fn division_by_zero_follows_ieee() {
    assert_output("print 1 / 0\n", "inf\n");
    assert_output("print 0 - 1 / 0\n", "-inf\n");
    assert_output("print 0 / 0\n", "NaN\n");
}

#[test]
fn plus_is_overloaded() {
    assert_output("print 1 + 2\n", "3\n");
    assert_output("print \"a\" + 1\n", "a1\n");
    assert_output("print 1 + \"a\"\n", "1a\n");
    assert_output("print \"v=\" + true\n", "v=true\n");
    assert_output("print [1, 2] + [3]\n", "[1, 2, 3]\n");

    // concatenation builds a fresh array; the operands are untouched
    assert_output("a = [1]\nb = a + [2]\npush(b, 3)\nprint a\nprint b\n",
                  "[1]\n[1, 2, 3]\n");
}

#[test]
fn comparisons() {
    assert_output("print 2 < 3\nprint 3 <= 3\nprint 4 > 5\nprint 4 >= 5\n",
                  "true\ntrue\nfalse\nfalse\n");
    assert_output("print \"apple\" < \"banana\"\nprint \"b\" >= \"a\"\n", "true\ntrue\n");
    assert_error_contains("print 1 < \"a\"\n",
                          "Operator \"<\" requires two numbers or two strings");
}

#[test]
fn structural_equality() {
    assert_output("print [1, [2]] == [1, [2]]\n", "true\n");
    assert_output("print {\"a\": [1]} == {\"a\": [1]}\n", "true\n");
    assert_output("print [1] != [2]\n", "true\n");
    assert_output("print 1 == \"1\"\n", "false\n");
    assert_output("print \"x\" == \"x\"\n", "true\n");
}

#[test]
fn logic_short_circuits() {
    // the right-hand side would be an undefined-function error if evaluated
    assert_output("print false and boom()\n", "false\n");
    assert_output("print true or boom()\n", "true\n");
    assert_output("print true and false\nprint false or true\n", "false\ntrue\n");
    assert_error_contains("print 1 and true\n", "Operator \"and\" requires booleans");
    assert_error_contains("print not 1\n", "Operator \"not\" requires boolean");
    assert_output("print not false\n", "true\n");
}

#[test]
fn conditions_must_be_boolean() {
    assert_error_contains("if 1\nprint 1\nend\n", "If condition must be boolean");
    assert_error_contains("while 1\nprint 1\nend\n", "While condition must be boolean");
    assert_output("if 2 > 1\nprint \"yes\"\nelse\nprint \"no\"\nend\n", "yes\n");
    assert_output("if 2 < 1\nprint \"yes\"\nelse\nprint \"no\"\nend\n", "no\n");
}

#[test]
fn index_assignment_replaces_one_element() {
    assert_output("a = [10, 20, 30]\na[1] = 99\nprint a\n", "[10, 99, 30]\n");
    assert_error_contains("a = [1]\na[5] = 0\n", "Array index out of bounds (index 5, size 1)");
    assert_error_contains("a = [1]\na[0.5] = 0\n", "Array index must be an integer");
    assert_error_contains("x = 1\nx[0] = 0\n", "Index assignment requires an array or map");
    assert_error_contains("a[0] = 1\n", "Undefined variable \"a\"");
}

#[test]
fn push_and_pop() {
    assert_output("b = [1, 2]\npush(b, 3)\nprint b\nx = pop(b)\nprint x\nprint b\n",
                  "[1, 2, 3]\n3\n[1, 2]\n");
    assert_error_contains("a = []\nx = pop(a)\n", "pop() on empty array");
}

#[test]
fn insert_and_remove() {
    assert_output("a = [1, 3]\ninsert(a, 1, 2)\nprint a\n", "[1, 2, 3]\n");
    assert_output("a = [1]\ninsert(a, 1, 2)\nprint a\n", "[1, 2]\n");
    assert_output("a = [1, 2, 3]\nx = remove(a, 1)\nprint x\nprint a\n", "2\n[1, 3]\n");
    assert_error_contains("a = [1]\ninsert(a, 2, 0)\n", "insert() index out of range");
    assert_error_contains("a = [1]\nx = remove(a, 1)\n", "remove() index out of range");
}

#[test]
fn containers_are_shared_references() {
    assert_output("a = [1]\nb = a\npush(b, 2)\nprint a\n", "[1, 2]\n");
    assert_output("m = {\"k\": 1}\nn = m\nn[\"j\"] = 2\nprint m\n", "{\"j\": 2, \"k\": 1}\n");
    assert_output("function grow(xs)\npush(xs, 9)\nreturn xs\nend\na = [1]\nb = grow(a)\nprint a\nprint a == b\n",
                  "[1, 9]\ntrue\n");
}

#[test]
fn map_keys_sorted() {
    assert_output("m = {\"name\": \"Edward\", \"lang\": \"BPL+\", \"year\": 2026}\nprint keys(m)\n",
                  "[lang, name, year]\n");
    assert_output("m = {\"b\": 2, \"a\": 1, \"c\": 3}\nprint values(m)\nprint items(m)\n",
                  "[1, 2, 3]\n[[a, 1], [b, 2], [c, 3]]\n");
}

#[test]
fn map_operations() {
    assert_output("m = {}\nm[\"k\"] = 1\nprint has(m, \"k\")\nprint m[\"k\"]\n", "true\n1\n");
    assert_output("m = {\"k\": 1}\ndel(m, \"k\")\nprint has(m, \"k\")\ndel(m, \"k\")\n",
                  "false\n");
    assert_output("m = {\"a\": 1, \"b\": 2}\nclear(m)\nprint len(m)\n", "0\n");
    assert_output("m = {\"k\": 1}\nprint get(m, \"k\", 0)\nprint get(m, \"j\", 0)\n", "1\n0\n");
    assert_output("m = {\"a\": 1, \"a\": 2}\nprint m\n", "{\"a\": 2}\n");
    assert_error_contains("m = {\"k\": 1}\nprint m[\"j\"]\n", "Map key \"j\" not found");
    assert_error_contains("m = {}\nprint m[1]\n", "Map key must be a string");
    assert_error_contains("m = {}\nm[1] = 2\n", "Map key must be a string");
}

#[test]
fn unicode_strings_use_code_points() {
    assert_output("u = \"🙂🙃😉\"\nprint len(u)\nprint substr(u, 1, 2)\n", "3\n🙃😉\n");
    assert_output("print indexof(\"naïve\", \"ïv\")\n", "2\n");
    assert_output("print substr(\"héllo\", 1, 3)\n", "éll\n");
}

#[test]
fn string_builtins() {
    assert_output("print lower(\"AbC\")\nprint upper(\"AbC\")\n", "abc\nABC\n");
    assert_output("print trim(\"  x  \")\nprint ltrim(\"  x  \") + \"|\"\nprint rtrim(\"  x  \") + \"|\"\n",
                  "x\nx  |\n  x|\n");
    assert_output("print trim(\"xxyaxx\", \"x\")\n", "ya\n");
    assert_output("print contains(\"hello\", \"ell\")\nprint startswith(\"hello\", \"he\")\nprint endswith(\"hello\", \"lo\")\n",
                  "true\ntrue\ntrue\n");
    assert_output("print repeat(\"ab\", 3)\nprint repeat(\"ab\", 0) + \"|\"\n", "ababab\n|\n");
    assert_error_contains("print repeat(\"a\", 0 - 1)\n", "repeat() n must be >= 0");
    assert_error_contains("print substr(\"abc\", 5)\n", "substr() out of range");
    assert_output("print substr(\"abc\", 1)\n", "bc\n");
}

#[test]
fn replace_counts() {
    assert_output("print replace(\"aaa\", \"a\", \"b\")\n", "bbb\n");
    assert_output("print replace(\"aaa\", \"a\", \"b\", 2)\n", "bba\n");
    assert_output("print replace(\"aaa\", \"a\", \"b\", 0)\n", "aaa\n");
    assert_output("print replace(\"aaa\", \"a\", \"b\", 0 - 1)\n", "bbb\n");
}

#[test]
fn split_and_join() {
    assert_output("print split(\"a,b,c\", \",\")\n", "[a, b, c]\n");
    assert_output("print join(split(\"a,b,c\", \",\"), \",\")\n", "a,b,c\n");
    assert_output("print split(\"abc\", \"\")\n", "[a, b, c]\n");
    assert_output("print join([1, 2, 3], \"-\")\n", "1-2-3\n");
    assert_output("print join(split(\"x\", \",\"), \",\")\n", "x\n");
}

#[test]
fn index_of_edge_cases() {
    assert_output("print indexof(\"hello\", \"l\")\nprint lastindexof(\"hello\", \"l\")\n",
                  "2\n3\n");
    assert_output("print indexof(\"hello\", \"z\")\n", "-1\n");
    assert_output("print indexof(\"hello\", \"\")\nprint lastindexof(\"hello\", \"\")\n",
                  "0\n5\n");
}

#[test]
fn str_num_round_trip() {
    assert_output("print num(\"3.5\")\n", "3.5\n");
    assert_output("print num(\" 42 \")\n", "42\n");
    assert_output("print num(str(42))\n", "42\n");
    assert_output("print str(2.5)\n", "2.5\n");
    assert_output("print num(7)\n", "7\n");
    assert_error_contains("print num(\"abc\")\n", "num() could not parse \"abc\"");
}

#[test]
fn len_works_on_all_containers() {
    assert_output("print len(\"abc\")\nprint len([1, 2])\nprint len({\"a\": 1})\n",
                  "3\n2\n1\n");
    assert_error_contains("print len(1)\n", "len() expects a string, array, or map");
}

#[test]
fn while_loops() {
    assert_output("i = 0\nwhile i < 3\nprint i\ni = i + 1\nend\n", "0\n1\n2\n");
    assert_output("i = 0\nwhile true\ni = i + 1\nif i == 3\nbreak\nend\nend\nprint i\n",
                  "3\n");
    assert_output("i = 0\ns = 0\nwhile i < 5\ni = i + 1\nif i == 3\ncontinue\nend\ns = s + i\nend\nprint s\n",
                  "12\n");
}

#[test]
fn for_loops() {
    assert_output("for i = 1 to 5\nprint i\nend\n", "1\n2\n3\n4\n5\n");
    assert_output("for i = 5 to 1\nprint i\nend\n", "5\n4\n3\n2\n1\n");
    assert_output("for i = 1 to 10 step 3\nprint i\nend\n", "1\n4\n7\n10\n");
    assert_output("for i = 1 to 0\nprint i\nend\nprint \"done\"\n", "1\n0\ndone\n");
    assert_output("s = 0\nfor i = 1 to 10\nif i == 4\nbreak\nend\ns = s + i\nend\nprint s\n",
                  "6\n");
    assert_output("s = 0\nfor i = 1 to 5\nif i == 3\ncontinue\nend\ns = s + i\nend\nprint s\n",
                  "12\n");
    assert_error_contains("for i = 1 to 5 step 0\nprint i\nend\n",
                          "For loop step must be a non-zero number");
    assert_error_contains("for i = \"a\" to 5\nprint i\nend\n",
                          "For loop start/end must be numbers");
}

#[test]
fn for_each_over_arrays() {
    assert_output("for each x in [10, 20]\nprint x\nend\n", "10\n20\n");
    assert_output("for each x, i in [\"a\", \"b\"]\nprint str(i) + \":\" + x\nend\n",
                  "0:a\n1:b\n");

    // the loop walks the snapshot taken at entry
    assert_output("a = [1, 2]\nfor each x in a\npush(a, x)\nend\nprint a\n",
                  "[1, 2, 1, 2]\n");
}

#[test]
fn for_each_over_maps() {
    assert_output("m = {\"b\": 2, \"a\": 1}\nfor each k in m\nprint k\nend\n", "a\nb\n");
    assert_output("m = {\"b\": 2, \"a\": 1}\nfor each k, i in m\nprint str(i) + \":\" + k + \"=\" + m[k]\nend\n",
                  "0:a=1\n1:b=2\n");
    assert_error_contains("for each x in 5\nprint x\nend\n", "foreach expects an array or map");
}

#[test]
fn user_functions() {
    assert_output("function square(x)\nreturn x * x\nend\nprint square(3)\n", "9\n");
    assert_output("function add(a, b)\nreturn a + b\nend\nprint add(2, 5)\n", "7\n");
    assert_output("function fact(n)\nif n <= 1\nreturn 1\nend\nreturn n * fact(n - 1)\nend\nprint fact(5)\n",
                  "120\n");
    assert_error_contains("function f(a, b)\nreturn a\nend\nprint f(1)\n",
                          "Function \"f\" expects 2 args, got 1");
    assert_error_contains("function f()\nx = 1\nend\nprint f()\n",
                          "Function \"f\" ended without return");
    assert_error_contains("print missing()\n", "Undefined function \"missing\"");
}

#[test]
fn function_redefinition_replaces() {
    assert_output("function f()\nreturn 1\nend\nfunction f()\nreturn 2\nend\nprint f()\n",
                  "2\n");
}

#[test]
fn user_functions_shadow_builtins() {
    assert_output("function len(x)\nreturn 99\nend\nprint len(\"abc\")\n", "99\n");
}

#[test]
fn scoping_rules() {
    // writes inside a function stay in the frame
    assert_output("g = 1\nfunction f()\ng = 2\nreturn g\nend\nprint f()\nprint g\n",
                  "2\n1\n");
    // globals are readable from inside a function
    assert_output("g = 5\nfunction f()\nreturn g + 1\nend\nprint f()\n", "6\n");
    // frame-local names are gone after the call
    assert_error_contains("function f()\nlocal = 1\nreturn local\nend\nx = f()\nprint local\n",
                          "Undefined variable \"local\"");
}

#[test]
fn control_flow_signals_outside_context() {
    assert_error_contains("return 1\n", "Return is only valid inside a function");
    assert_error_contains("break\n", "Break is only valid inside a loop");
    assert_error_contains("continue\n", "Continue is only valid inside a loop");
    assert_error_contains("function f()\nbreak\nend\nprint f()\n",
                          "Break is only valid inside a loop");
}

#[test]
fn runtime_error_diagnostics() {
    let (result, _) = run("print x\n");
    let err = result.unwrap_err();
    assert!(err.contains("Runtime error at test.bpl:1:7"), "got: {err}");
    assert!(err.contains("Undefined variable \"x\""), "got: {err}");
    assert!(err.contains("  1 | print x"), "got: {err}");
    // caret under column 7: 6 chars of prefix + 6 spaces
    assert!(err.contains("\n            ^"), "got: {err}");
    assert!(!err.contains("Stack:"), "got: {err}");
}

#[test]
fn runtime_errors_carry_call_stack() {
    let source = "function inner()\nreturn nope\nend\nfunction outer()\nreturn inner()\nend\nprint outer()\n";
    let (result, _) = run(source);
    let err = result.unwrap_err();
    assert!(err.contains("Undefined variable \"nope\""), "got: {err}");
    assert!(err.contains("Stack:\n  at inner()\n  at outer()"), "got: {err}");
}

#[test]
fn parse_errors() {
    let parse_err = |source: &str| run(source).0.unwrap_err();

    assert_eq!(parse_err("print\n"), "Expected an expression at 1:6 (got NEWLINE)");
    assert_eq!(parse_err("1 + 2\n"), "Expected a statement at 1:1 (got NUMBER)");
    assert_eq!(parse_err("if true\nprint 1\n"), "Expected 'end' to close if at end of file");
    assert_eq!(parse_err("x = \"abc\n"), "Unterminated string literal at 1:5 (got ILLEGAL)");
    assert_eq!(parse_err("x = 1 @ 2\n"), "Unexpected character \"@\" at 1:7 (got ILLEGAL)");
    assert!(parse_err("print 1 < 2 < 3\n").contains("Expected a statement"));
    assert!(parse_err("x =\n").contains("Expected an expression"));
}

#[test]
fn keywords_fold_three_case_forms() {
    assert_output("PRINT \"a\"\n", "a\n");
    assert_output("Print \"a\"\n", "a\n");
    assert_output("IF TRUE\nPRINT 1\nEND\n", "1\n");
    assert_output("For i = 1 To 2\nPrint i\nEnd\n", "1\n2\n");
    // arbitrary mixed case is an identifier, not a keyword
    assert_error_contains("pRinT \"a\"\n", "Expected a statement");
}

#[test]
fn comments_and_handle_prefix_lexing() {
    assert_output("# a comment\nprint 1 # trailing\n# done\n", "1\n");
    assert_output("x = 2 # set x\nprint x\n", "2\n");
}

#[test]
fn string_escapes() {
    assert_output("print \"a\\nb\"\n", "a\nb\n");
    assert_output("print \"a\\tb\"\n", "a\tb\n");
    assert_output("print \"say \\\"hi\\\"\"\n", "say \"hi\"\n");
    assert_output("print \"back\\\\slash\"\n", "back\\slash\n");
    // unrecognized escapes keep the backslash
    assert_output("print \"a\\qb\"\n", "a\\qb\n");
}

#[test]
fn input_reads_lines() {
    let (result, output) = run_with_input("name = input(\"? \")\nprint \"hi \" + name\n",
                                          "Ada\n");
    assert!(result.is_ok());
    assert_eq!(output, "? hi Ada\n");

    // end of input yields an empty string
    let (result, output) = run_with_input("x = input()\nprint x + \"|\"\n", "");
    assert!(result.is_ok());
    assert_eq!(output, "|\n");
}

#[test]
fn nested_containers_and_indexing() {
    assert_output("grid = [[1, 2], [3, 4]]\nprint grid[1][0]\n", "3\n");
    assert_output("m = {\"xs\": [1, 2]}\nprint m[\"xs\"][1]\n", "2\n");
    assert_output("m = {\"a\": {\"b\": 7}}\nprint m[\"a\"][\"b\"]\n", "7\n");
    assert_error_contains("print 5[0]\n", "Indexing requires an array or map");
}
