use crate::error::InvokerError;
use crate::load::{Function, Library};
use log::trace;
use std::ffi::{c_char, CStr, CString};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The selector `compute` understands.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    fn as_c_str(&self) -> &'static CStr {
        match self {
            Operation::Add => c"add",
            Operation::Subtract => c"subtract",
            Operation::Multiply => c"multiply",
            Operation::Divide => c"divide",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown operation: {}", s))
    }
}

pub const SAY_HELLO: &str = "say_hello";
pub const COMPUTE: &str = "compute";
pub const TRANSFORM: &str = "transform";

/// The three entry points the harness drives, looked up once and reused.
#[derive(Debug)]
pub struct Bindings<'lib> {
    say_hello: Function<'lib, (), ()>,
    compute: Function<'lib, (f64, f64, *const c_char), f64>,
    transform: Function<'lib, (*mut f64, usize), ()>,
}

impl<'lib> Bindings<'lib> {
    /// Binds `say_hello`, `compute` and `transform`, failing on the first one
    /// that is missing or contradicts the library's signature descriptor.
    ///
    /// # Safety
    ///
    /// The library must export these symbols with the C signatures
    /// `void say_hello(void)`, `double compute(double, double, const char *)`
    /// and `void transform(double *, size_t)`.
    pub unsafe fn bind(library: &'lib Library) -> Result<Self, InvokerError> {
        Self::bind_with(library, |_| {})
    }

    /// Like [`Bindings::bind`], calling `accessing` with each symbol name
    /// right before it is looked up.
    ///
    /// # Safety
    ///
    /// Same as [`Bindings::bind`].
    pub unsafe fn bind_with(
        library: &'lib Library,
        mut accessing: impl FnMut(&str),
    ) -> Result<Self, InvokerError> {
        accessing(SAY_HELLO);
        let say_hello: Function<'lib, (), ()> = library.get_function(SAY_HELLO)?;

        accessing(COMPUTE);
        let compute: Function<'lib, (f64, f64, *const c_char), f64> = library.get_function(COMPUTE)?;

        accessing(TRANSFORM);
        let transform: Function<'lib, (*mut f64, usize), ()> = library.get_function(TRANSFORM)?;

        Ok(Bindings {
            say_hello,
            compute,
            transform,
        })
    }

    pub fn say_hello(&self) {
        trace!("calling {}", self.say_hello.name());
        unsafe { self.say_hello.call(()) }
    }

    /// Calls `compute` with an arbitrary selector. What the library does with
    /// a selector it does not know is up to the library.
    pub fn compute(&self, a: f64, b: f64, op: &str) -> Result<f64, InvokerError> {
        let op = CString::new(op).map_err(|source| InvokerError::Marshal {
            value: op.to_string(),
            source,
        })?;

        Ok(self.compute_c_str(a, b, &op))
    }

    pub fn compute_op(&self, a: f64, b: f64, op: Operation) -> f64 {
        self.compute_c_str(a, b, op.as_c_str())
    }

    fn compute_c_str(&self, a: f64, b: f64, op: &CStr) -> f64 {
        trace!("calling {}({}, {}, {:?})", self.compute.name(), a, b, op);
        // `op` outlives the call, and the library only reads it.
        unsafe { self.compute.call((a, b, op.as_ptr())) }
    }

    /// Hands `values` to `transform`, which may rewrite it in place.
    pub fn transform(&self, values: &mut [f64]) {
        trace!("calling {}(<{} values>)", self.transform.name(), values.len());
        unsafe { self.transform.call((values.as_mut_ptr(), values.len())) }
    }
}
