use std::ffi::{c_char, c_double, CStr};

#[no_mangle]
pub extern "C" fn say_hello() {
    println!("Hello from native_lib!");
}

/// Unknown operations yield `0.0`.
#[no_mangle]
pub unsafe extern "C" fn compute(x: c_double, y: c_double, operation: *const c_char) -> c_double {
    if operation.is_null() {
        return 0.0;
    }

    let operation = CStr::from_ptr(operation).to_string_lossy();

    match operation.as_ref() {
        "add" => x + y,
        "subtract" => x - y,
        "multiply" => x * y,
        "divide" => x / y,
        _ => 0.0,
    }
}

/// Reverses `data[..len]` in place.
#[no_mangle]
pub unsafe extern "C" fn transform(data: *mut c_double, len: usize) {
    if data.is_null() {
        return;
    }

    let values = std::slice::from_raw_parts_mut(data, len);
    values.reverse();
    println!("{:?}", values);
}
