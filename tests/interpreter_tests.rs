// Integration tests for the NLang interpreter
//
// These tests run complete NLang programs through the same entry point the
// REPL and file runner use, capturing print output and rendered diagnostics.
// Tests cover:
// - Arithmetic, comparison and logical operators
// - Scoping, shadowing and assignment
// - Loops, functions and early returns
// - Arrays, strings and objects with their methods
// - Error messages and source-context rendering

use nlang::errors::ErrorKind;
use nlang::interpreter::{Interpreter, Value};
use std::sync::{Arc, Mutex};

/// Runs `code` on `interp`, returning (stdout, stderr) produced by this input
fn run_on(interp: &mut Interpreter, code: &str) -> (String, String) {
    let output = Arc::new(Mutex::new(Vec::new()));
    interp.set_output(output.clone());
    let mut errors = Vec::new();
    nlang::process_input(interp, code, &mut errors);
    let out = String::from_utf8(output.lock().unwrap().clone()).unwrap();
    (out, String::from_utf8(errors).unwrap())
}

fn run_code(code: &str) -> (String, String) {
    run_on(&mut Interpreter::new(), code)
}

fn output_of(code: &str) -> String {
    let (out, err) = run_code(code);
    assert!(err.is_empty(), "unexpected error output:\n{}", err);
    out
}

fn error_of(code: &str) -> String {
    let (_, err) = run_code(code);
    assert!(!err.is_empty(), "expected an error for:\n{}", code);
    err
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(output_of("print(-1/2+5*3);"), "14.5\n");
}

#[test]
fn test_basic_addition_and_concatenated_print() {
    assert_eq!(output_of("make a = 10;\nmake b = 12;\nprint(a+b);\n"), "22\n");
    assert_eq!(output_of("make a = \"string1\";\nmake b = \"string2\";\nprint(a,b);\n"), "string1string2\n");
}

#[test]
fn test_mixed_array_elements() {
    let code = r#"
make elements = ["Ahmet","Veli",12/4,(3*5)/2];
for e in elements{
    print(e);
}
"#;
    assert_eq!(output_of(code), "Ahmet\nVeli\n3\n7.5\n");
}

#[test]
fn test_division_by_zero_follows_ieee() {
    assert_eq!(output_of("print(1/0, \" \", -1/0);"), "Infinity -Infinity\n");
}

#[test]
fn test_equality_is_deep_and_without_coercion() {
    assert_eq!(output_of("print([1,2] == [1,2], \" \", 1 == \"1\", \" \", {\"a\": 1} != {\"a\": 2});"), "true false true\n");
}

#[test]
fn test_logical_operators_short_circuit() {
    assert_eq!(output_of("make a = [];\nprint(false and a[5] == 1);"), "false\n");
    assert_eq!(output_of("print(true or 1);"), "true\n");
    assert_eq!(output_of("print(!false and 2 > 1);"), "true\n");
}

#[test]
fn test_logical_operators_require_booleans() {
    let err = error_of("print(1 and true);");
    assert!(err.contains("Operands of 'and' must be booleans, got number"), "{}", err);
}

#[test]
fn test_arithmetic_requires_numbers() {
    let err = error_of("print(1 + \"a\");");
    assert!(err.contains("Operands of '+' must be numbers"), "{}", err);
}

#[test]
fn test_block_shadowing() {
    let code = "make a = 2;\nprint(a);\n{\n    make a = 12;\n    print(a);\n}\nprint(a);\n";
    assert_eq!(output_of(code), "2\n12\n2\n");
}

#[test]
fn test_assignment_in_block_updates_outer() {
    let code = "make a = 2;\nprint(a);\n{\n    a = 12;\n    print(a);\n}\nprint(a);\n";
    assert_eq!(output_of(code), "2\n12\n12\n");
}

#[test]
fn test_undeclared_assignment_reports_context() {
    let err = error_of("make a = 2;\n{\n    b = 12;\n}\n");
    assert_eq!(err, "{\n    b = 12;\n    ^\n}\nError: Undefined variable: b at line 3:5\n");
}

#[test]
fn test_undeclared_assignment_has_no_side_effect() {
    let (out, err) = run_code("func f() {\n    print(\"called\");\n    return 1;\n}\nzzz = f();\n");
    assert_eq!(out, "");
    assert!(err.contains("Undefined variable: zzz at line 5:1"), "{}", err);
}

#[test]
fn test_undefined_variable_suggests_name() {
    let err = error_of("make result = 1;\nprint(reslt);");
    assert!(err.contains("Error: Undefined variable: reslt at line 2:7"), "{}", err);
    assert!(err.ends_with("help: did you mean 'result'?\n"), "{}", err);
}

#[test]
fn test_array_aliasing() {
    assert_eq!(output_of("make a = [1,2,3];\nmake b = a;\nb.add(4);\nprint(a);"), "[1, 2, 3, 4]\n");
}

#[test]
fn test_array_auto_extension() {
    assert_eq!(output_of("make a = [];\na[4] = 101;\nprint(a);\n"), "[null, null, null, null, 101]\n");
}

#[test]
fn test_array_methods() {
    assert_eq!(output_of("make a = [1,2,3];\nmake b = a.reverse();\nprint(b);"), "[3, 2, 1]\n");
    assert_eq!(output_of("make a = [1,2,3];\na.add(12);\nprint(a);"), "[1, 2, 3, 12]\n");
    assert_eq!(output_of("make a = [1,2,3];\na.remove(2);\nprint(a);"), "[1, 3]\n");
    assert_eq!(output_of("make a = [1,2,3];\nprint(a.first(), a.last());"), "13\n");
    assert_eq!(output_of("make a = [1,2,3];\na[2] = 12;\nprint(a);"), "[1, 2, 12]\n");
    assert_eq!(output_of("make a = [1,2,3];\nprint(a.reverse().reverse().reverse());"), "[3, 2, 1]\n");
}

#[test]
fn test_field_style_array_methods() {
    assert_eq!(output_of("make a = [1,2];\nprint(a.first, a.last, a.reverse);"), "12[2, 1]\n");
}

#[test]
fn test_first_on_empty_array_fails() {
    let err = error_of("make a = [];\nprint(a.first());");
    assert!(err.contains("Error: empty container at line 2:9"), "{}", err);
}

#[test]
fn test_method_on_number_is_rejected() {
    let err = error_of("make a = 2;\na.reverse();\n");
    assert_eq!(err, "make a = 2;\na.reverse();\n^\nError: Can not make array operation 'reverse' at line 2:1\n");
}

#[test]
fn test_nested_arrays() {
    let code = r#"
make a = [[1,2,3],[4,5,6],[7,8,9]];
for x in a {
    a[i][1]=5;
}
for x in a {
    print(a[i][1]);
}
"#;
    assert_eq!(output_of(code), "5\n5\n5\n");
}

#[test]
fn test_index_errors() {
    let err = error_of("make a = [1];\nprint(a[3]);");
    assert!(err.contains("Index out of bounds"), "{}", err);
    let err = error_of("make a = [];\na[-1] = 1;");
    assert!(err.contains("Index out of bounds"), "{}", err);
    let err = error_of("make n = 5;\nprint(n[0]);");
    assert!(err.contains("Error: Parent is not iterable at line 2:7"), "{}", err);
}

#[test]
fn test_huge_index_assignment_is_reported() {
    let mut interp = Interpreter::new();
    let (_, err) = run_on(&mut interp, "make a = [];\na[100000000000000000000000000000] = 1;\n");
    assert!(err.contains("Error: Index out of bounds"), "{}", err);

    let (_, err) = run_on(&mut interp, "make b = [1];\nb[10000000000] = 1;\n");
    assert!(err.contains("Error: Index out of bounds"), "{}", err);

    // The session is still usable and the arrays are untouched
    let (out, err) = run_on(&mut interp, "print(a, b);");
    assert!(err.is_empty(), "{}", err);
    assert_eq!(out, "[][1]\n");
}

#[test]
fn test_string_methods() {
    assert_eq!(output_of("make a = \"123\";\na.remove(\"2\");\nprint(a);"), "13\n");
    assert_eq!(output_of("make s = \"n\";\ns.add(\"lang\", 2);\nprint(s);"), "nlang2\n");
    assert_eq!(output_of("make s = \"abc\";\nprint(s.reverse(), s.first(), s.last(), s[1]);"), "cbaacb\n");
}

#[test]
fn test_len_builtin() {
    assert_eq!(output_of("print(len(\"hello\"), \" \", len([1,2,3]));"), "5 3\n");
    let err = error_of("print(len(5));");
    assert!(err.contains("Can not call len() on number"), "{}", err);
}

#[test]
fn test_time_builtin() {
    assert_eq!(output_of("make t = time();\nassert t > 0;\nprint(\"ok\");"), "ok\n");
}

#[test]
fn test_range_loops() {
    assert_eq!(output_of("for 1..=3 {\n    print(i);\n}\n"), "1\n2\n3\n");
    assert_eq!(output_of("for 1..3 {\n    print(i);\n}\n"), "1\n2\n");
}

#[test]
fn test_inclusive_range_at_numeric_limit() {
    let code = "for 100000000000000000000000000000..=100000000000000000000000000000 {\n    print(i);\n}\n";
    assert_eq!(output_of(code), "9223372036854775808\n");
    assert_eq!(output_of("for 3..=1 {\n    print(i);\n}\nprint(\"done\");"), "done\n");
}

#[test]
fn test_nested_range_loops_with_named_index() {
    let code = r#"
make a = [1,2,3];
make b = ["a","b","c"];

for 0..len(a) : x {
    for x..len(b) : y{
        print(a[x],b[y]);
    }
}
"#;
    assert_eq!(output_of(code), "1a\n1b\n1c\n2b\n2c\n3c\n");
}

#[test]
fn test_for_in_with_default_and_named_index() {
    let names = "make a = [\"Omer\",\"Ali\",\"Osman\"];\n";
    assert_eq!(output_of(&format!("{}for x in a {{\n    print(a[i]);\n}}\n", names)), "Omer\nAli\nOsman\n");
    assert_eq!(
        output_of(&format!("{}for x in a : special {{\n    print(a[special]);\n}}\n", names)),
        "Omer\nAli\nOsman\n"
    );
    assert_eq!(
        output_of(&format!("{}for x, n in a {{\n    print(n, \":\", x);\n}}\n", names)),
        "0:Omer\n1:Ali\n2:Osman\n"
    );
}

#[test]
fn test_for_in_index_and_value() {
    let code = "make a = [2,4,6,8];\nfor x in a{\n    print(\"index: \",i,\" value: \",x*x);\n}\n";
    assert_eq!(
        output_of(code),
        "index: 0 value: 4\nindex: 1 value: 16\nindex: 2 value: 36\nindex: 3 value: 64\n"
    );
}

#[test]
fn test_for_in_visits_appended_elements() {
    let code = "make a = [1];\nfor x in a {\n    if (x < 3) {\n        a.add(x + 1);\n    }\n}\nprint(a);";
    assert_eq!(output_of(code), "[1, 2, 3]\n");
}

#[test]
fn test_for_in_over_string() {
    assert_eq!(output_of("for c in \"abc\" {\n    print(c);\n}"), "a\nb\nc\n");
}

#[test]
fn test_non_iterable_reports_variable_and_position() {
    let err = error_of("make a = 2;\nfor x in a {\n    print(x);\n}\n");
    assert_eq!(err, "make a = 2;\nfor x in a {\n         ^\n    print(x);\nError: variable a is not iterable. at line 2:10\n");
}

#[test]
fn test_functions() {
    let code = "func add(x,y){\n    return x+y;\n}\nmake result = add(2,3) + add(5,7);\nprint(result);\n";
    assert_eq!(output_of(code), "17\n");
}

#[test]
fn test_function_returning_array() {
    let code = r#"
func square_in_reverse_order(nums){
    make result = [];
    for 0..len(nums){
        result.add(nums[i]*nums[i]);
    }
    return result.reverse();
}
print(square_in_reverse_order([1,2,3]));
"#;
    assert_eq!(output_of(code), "[9, 4, 1]\n");
}

#[test]
fn test_recursive_fibonacci() {
    let code = "func fib(n){\n    if(n<2){\n        return n;\n    }\n    return fib(n-1) + fib(n-2);\n}\nprint(fib(20));\n";
    assert_eq!(output_of(code), "6765\n");
}

#[test]
fn test_iterative_fibonacci() {
    let code = r#"
func fib(n){
    make result = [0,1];
    for 2..n+1{
        result.add(result[i-1]+result[i-2]);
    }
    return result.last();
}
print(fib(20));
"#;
    assert_eq!(output_of(code), "6765\n");
}

#[test]
fn test_return_from_inside_loop() {
    let code = r#"
func find(arr, target) {
    for x in arr {
        if (x == target) {
            return i;
        }
    }
    return -1;
}
print(find([5,6,7], 7));
print(find([5,6,7], 9));
"#;
    assert_eq!(output_of(code), "2\n-1\n");
}

#[test]
fn test_function_without_return_yields_null() {
    assert_eq!(output_of("func f() {\n    make x = 1;\n}\nprint(f());"), "null\n");
}

#[test]
fn test_calls_see_call_site_scope() {
    let code = "func show() {\n    print(secret);\n}\nfunc outer() {\n    make secret = 42;\n    show();\n}\nouter();\n";
    assert_eq!(output_of(code), "42\n");
}

#[test]
fn test_call_errors() {
    let err = error_of("func f(a){\n    return a;\n}\nf(1,2);");
    assert!(err.contains("Error: Argument count mismatch in function call: f at line 4:1"), "{}", err);
    let err = error_of("nope();");
    assert!(err.contains("Error: Undefined function: nope at line 1:1"), "{}", err);
}

#[test]
fn test_top_level_return_ends_input() {
    assert_eq!(output_of("print(1);\nreturn;\nprint(2);"), "1\n");
}

#[test]
fn test_assert() {
    let err = error_of("assert 1 == 2, \"math is broken\";");
    assert!(err.ends_with("Error: math is broken at line 1:1\n"), "{}", err);
    let err = error_of("assert false;");
    assert!(err.contains("Error: Assertion failed at line 1:1"), "{}", err);
    assert_eq!(output_of("assert 1 < 2;\nprint(\"passed\");"), "passed\n");
}

#[test]
fn test_if_requires_boolean() {
    let err = error_of("if (1) {\n    print(1);\n}");
    assert!(err.contains("If condition must be a boolean"), "{}", err);
}

#[test]
fn test_object_printing() {
    assert_eq!(output_of("make obj = { };\nprint(obj);"), "{}\n\n");
    assert_eq!(output_of("print({\"a\": 1});"), "{ a : 1 }\n\n");

    let code = r#"
make one = { "name":"Ali" , "job":"cifti"};
make two = { "name":"Veli", "job":"tuccar" };
make people = [one,two];
for p in people{
    print(p);
}
"#;
    assert_eq!(output_of(code), "{\n\tname : Ali,\n\tjob : cifti,\n}\n\n{\n\tname : Veli,\n\tjob : tuccar,\n}\n\n");
}

#[test]
fn test_object_field_access_forms() {
    let code = r#"
make obj = {
"key1":"val1",
"key2":"val2",
"inner": { "last":"Veli", "first":"Ali" }
};

print(obj["key2"]);
print(obj.inner.last);
print(obj["inner"]["last"]);
print(obj["inner"].last);
print(obj.inner["last"]);
print(obj.inner);
"#;
    assert_eq!(output_of(code), "val2\nVeli\nVeli\nVeli\nVeli\n{\n\tlast : Veli,\n\tfirst : Ali,\n}\n\n");
}

#[test]
fn test_object_keys_and_index_set() {
    assert_eq!(output_of("make o = {name: \"x\", 1: \"one\"};\nprint(o[\"1\"], o.name);"), "onex\n");
    assert_eq!(
        output_of("make o = {};\no[\"k\"] = 1;\no[2] = \"two\";\nprint(o);"),
        "{\n\tk : 1,\n\t2 : two,\n}\n\n"
    );
    assert_eq!(output_of("make o = {\"size\": 3};\nprint(o.size());"), "3\n");
}

#[test]
fn test_missing_key_reports_context() {
    let code = "make obj = {\n\"key1\":\"value1\",\n\"inner\": { \"innerKey\":\"innerValue\"}\n};\nprint(obj.inner1);\n";
    assert_eq!(
        error_of(code),
        "};\nprint(obj.inner1);\n               ^\nError: Key doesn't exist: inner1 at line 5:11\n"
    );
}

#[test]
fn test_comments_are_ignored() {
    assert_eq!(output_of("// setup\nprint(1); // trailing\n"), "1\n");
}

#[test]
fn test_missing_semicolon_diagnostic() {
    let (out, err) = run_code("make a = 10\nmake b = 12;\nprint(a+b);\n");
    assert_eq!(out, "");
    assert_eq!(err, "make a = 10\n          ^\nmake b = 12;\nError: Expected ';' at line 1:10\n");
}

#[test]
fn test_unclosed_array_diagnostic() {
    assert_eq!(
        error_of("make numbers = [1,2,3,4,5;\n"),
        format!("make numbers = [1,2,3,4,5;\n{}^\nError: Expecting ] for array at line 1:25\n", " ".repeat(24))
    );
}

#[test]
fn test_unterminated_string_diagnostic() {
    assert_eq!(
        error_of("make name = \"java;"),
        format!("make name = \"java;\n{}^\nError: Unterminated string. at line 1:18\n", " ".repeat(17))
    );
}

#[test]
fn test_invalid_assignment_target() {
    let err = error_of("make a = {};\na.b = 1;");
    assert!(err.contains("Error: can only assign to the variable at line 2:3"), "{}", err);
}

#[test]
fn test_error_aborts_rest_of_input_but_keeps_state() {
    let mut interp = Interpreter::new();
    let (_, err) = run_on(&mut interp, "make a = 1;");
    assert!(err.is_empty());

    let (out, err) = run_on(&mut interp, "a = 2;\nmissing = 3;\na = 5;\nprint(a);");
    assert_eq!(out, "");
    assert!(err.contains("Undefined variable: missing"), "{}", err);

    let (out, _) = run_on(&mut interp, "print(a);");
    assert_eq!(out, "2\n");
    assert_eq!(interp.env.get("a"), Some(Value::Number(2.0)));
}

#[test]
fn test_error_inside_block_leaves_global_scope_current() {
    let mut interp = Interpreter::new();
    run_on(&mut interp, "{\n    make inner = 1;\n    boom();\n}");
    let (out, err) = run_on(&mut interp, "make g = 7;\nprint(g);");
    assert!(err.is_empty(), "{}", err);
    assert_eq!(out, "7\n");
    assert!(interp.env.globals().iter().any(|(name, _)| name == "g"));
    assert!(interp.env.get("inner").is_none());
}

#[test]
fn test_run_source_returns_error_kind() {
    let mut interp = Interpreter::new();
    let err = nlang::run_source(&mut interp, "make a = [1];\nprint(a[\"x\"]);").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    let err = nlang::run_source(&mut interp, "make a = @;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Lexical);
    let err = nlang::run_source(&mut interp, "print(1)").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Syntax);
}
