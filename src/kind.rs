use serde::{Deserialize, Serialize};
use std::ffi::{c_char, c_void};
use std::fmt::{Display, Formatter};

/// The native representation of a single argument or return value.
///
/// Kinds are what a signature descriptor records, and what a Rust
/// function-pointer type is reduced to before it is compared against one.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Void,
    I32,
    U32,
    I64,
    U64,
    Isize,
    Usize,
    F32,
    F64,
    /// A NUL-terminated byte string.
    CString,
    /// Any other raw pointer, buffers included.
    Pointer,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Void => "void",
            ValueKind::I32 => "i32",
            ValueKind::U32 => "u32",
            ValueKind::I64 => "i64",
            ValueKind::U64 => "u64",
            ValueKind::Isize => "isize",
            ValueKind::Usize => "usize",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::CString => "c_string",
            ValueKind::Pointer => "pointer",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rust types that can cross the foreign boundary by value.
pub trait NativeKind {
    const KIND: ValueKind;
}

macro_rules! impl_native_kind {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl NativeKind for $ty {
                const KIND: ValueKind = ValueKind::$kind;
            }
        )*
    };
}

impl_native_kind! {
    () => Void,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    isize => Isize,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    *const c_char => CString,
    *const c_void => Pointer,
    *const f64 => Pointer,
    *const f32 => Pointer,
}

impl<T> NativeKind for *mut T {
    const KIND: ValueKind = ValueKind::Pointer;
}

/// Renders a signature the way it reads in error messages: `fn(f64, f64) -> f64`.
pub fn format_signature(args: &[ValueKind], returns: ValueKind) -> String {
    let args = args
        .iter()
        .map(ValueKind::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    match returns {
        ValueKind::Void => format!("fn({})", args),
        r => format!("fn({}) -> {}", args, r),
    }
}
