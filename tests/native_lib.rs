mod common;

use common::{native_lib_path, native_lib_signatures};
use native_invoker::{Bindings, InvokerError, Library, Operation, SignatureFile, ValueKind};
use std::ffi::c_char;

fn load() -> Library {
    Library::load(native_lib_path().to_str().unwrap()).unwrap()
}

#[test]
fn say_hello_returns_nothing() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    let () = bindings.say_hello();
}

#[test]
fn compute_all_operations() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    let expected = [
        (Operation::Add, 7.0),
        (Operation::Subtract, -1.0),
        (Operation::Multiply, 12.0),
        (Operation::Divide, 0.75),
    ];

    for (op, want) in expected {
        assert_eq!(bindings.compute_op(3.0, 4.0, op), want, "{}", op);
        assert_eq!(bindings.compute(3.0, 4.0, op.as_str()).unwrap(), want, "{}", op);
    }
}

#[test]
fn calls_do_not_depend_on_order() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    let forward: Vec<f64> = Operation::ALL
        .into_iter()
        .map(|op| bindings.compute_op(3.0, 4.0, op))
        .collect();

    let mut backward: Vec<f64> = Operation::ALL
        .into_iter()
        .rev()
        .map(|op| {
            bindings.transform(&mut [1.0, 2.0]);
            bindings.compute_op(3.0, 4.0, op)
        })
        .collect();
    backward.reverse();

    assert_eq!(forward, backward);
}

#[test]
fn unknown_operation_is_left_to_the_library() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    assert_eq!(bindings.compute(3.0, 4.0, "modulo").unwrap(), 0.0);
}

#[test]
fn interior_nul_is_rejected_before_the_call() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    let err = bindings.compute(3.0, 4.0, "add\0extra").unwrap_err();
    assert!(matches!(err, InvokerError::Marshal { ref value, .. } if value == "add\0extra"));
}

#[test]
fn transform_reverses_in_place() {
    let library = load();
    let bindings = unsafe { Bindings::bind(&library) }.unwrap();

    let mut values = [1.0, 2.0, 3.0, 4.0, 5.0];
    bindings.transform(&mut values);
    assert_eq!(values, [5.0, 4.0, 3.0, 2.0, 1.0]);

    let mut empty: [f64; 0] = [];
    bindings.transform(&mut empty);
}

#[test]
fn missing_symbol_is_reported() {
    let library = load();

    let err = unsafe { library.get_function::<(), ()>("does_not_exist") }.unwrap_err();
    match err {
        InvokerError::SymbolNotFound { symbol, .. } => assert_eq!(symbol, "does_not_exist"),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn raw_function_reports_its_signature() {
    let library = load();

    let compute = unsafe { library.get_function::<(f64, f64, *const c_char), f64>("compute") }.unwrap();
    assert_eq!(compute.name(), "compute");
    assert_eq!(
        compute.signature().args,
        vec![ValueKind::F64, ValueKind::F64, ValueKind::CString]
    );

    let res = unsafe { compute.call((6.0, 3.0, c"divide".as_ptr())) };
    assert_eq!(res, 2.0);
}

#[test]
fn matching_descriptor_binds() {
    let signatures = SignatureFile::from_file(native_lib_signatures()).unwrap();
    let library = load().with_signatures(signatures);

    let bindings = unsafe { Bindings::bind(&library) }.unwrap();
    assert_eq!(bindings.compute_op(3.0, 4.0, Operation::Add), 7.0);
}

#[test]
fn mismatching_descriptor_refuses_to_bind() {
    let json = r#"{
        "spec-version": "1.0.0",
        "symbols": { "compute": { "args": ["f64", "f64"], "returns": "f64" } }
    }"#;
    let signatures = SignatureFile::parse(json, "test").unwrap();
    let library = load().with_signatures(signatures);

    let err = unsafe { Bindings::bind(&library) }.unwrap_err();
    match err {
        InvokerError::SignatureMismatch {
            symbol,
            declared,
            expected,
        } => {
            assert_eq!(symbol, "compute");
            assert_eq!(declared, "fn(f64, f64, c_string) -> f64");
            assert_eq!(expected, "fn(f64, f64) -> f64");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn sidecar_descriptor_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(native_lib_path().file_name().unwrap());
    std::fs::copy(native_lib_path(), &path).unwrap();

    let sidecar = SignatureFile::sidecar_path(&path);
    let json = r#"{
        "spec-version": "1.0.0",
        "symbols": { "transform": { "args": ["pointer"], "returns": "void" } }
    }"#;
    std::fs::write(&sidecar, json).unwrap();

    let library = Library::load(path.to_str().unwrap()).unwrap();
    assert!(library.signatures().is_some());
    assert_eq!(library.path(), Some(path.canonicalize().unwrap().as_path()));

    let err = unsafe { Bindings::bind(&library) }.unwrap_err();
    assert!(matches!(err, InvokerError::SignatureMismatch { ref symbol, .. } if symbol == "transform"));
}

#[test]
fn bind_reports_each_symbol_before_lookup() {
    let library = load();

    let mut seen = Vec::new();
    unsafe { Bindings::bind_with(&library, |symbol| seen.push(symbol.to_string())) }.unwrap();
    assert_eq!(seen, ["say_hello", "compute", "transform"]);
}

#[test]
fn bind_stops_at_the_first_failing_symbol() {
    let json = r#"{
        "spec-version": "1.0.0",
        "symbols": { "say_hello": { "args": ["f64"] } }
    }"#;
    let library = load().with_signatures(SignatureFile::parse(json, "test").unwrap());

    let mut seen = Vec::new();
    let err = unsafe { Bindings::bind_with(&library, |symbol| seen.push(symbol.to_string())) }
        .unwrap_err();
    assert!(matches!(err, InvokerError::SignatureMismatch { .. }));
    assert_eq!(seen, ["say_hello"]);
}

#[test]
fn close_after_bindings_are_dropped() {
    let library = load();
    {
        let bindings = unsafe { Bindings::bind(&library) }.unwrap();
        bindings.say_hello();
    }

    library.close().unwrap();
}
