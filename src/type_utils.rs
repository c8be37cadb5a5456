use crate::kind::{NativeKind, ValueKind};

macro_rules! for_each_function_signature {
    ($mac:ident) => {
        $mac!(0);
        $mac!(1 A1);
        $mac!(2 A1 A2);
        $mac!(3 A1 A2 A3);
        $mac!(4 A1 A2 A3 A4);
        $mac!(5 A1 A2 A3 A4 A5);
        $mac!(6 A1 A2 A3 A4 A5 A6);
        $mac!(7 A1 A2 A3 A4 A5 A6 A7);
        $mac!(8 A1 A2 A3 A4 A5 A6 A7 A8);
    };
}

/// Maps an `(Args, Res)` pair to the `extern "C"` function pointer it describes.
///
/// `Args` is a tuple of argument types, so `((f64, f64), f64)` stands for
/// `unsafe extern "C" fn(f64, f64) -> f64`.
pub trait Signature {
    type Args;
    type Output;
    type Pointer: Copy;

    fn arg_kinds() -> Vec<ValueKind>;

    fn return_kind() -> ValueKind;

    /// # Safety
    ///
    /// `pointer` must refer to a native function with exactly this signature,
    /// and `args` must satisfy whatever that function expects of them.
    unsafe fn invoke(pointer: Self::Pointer, args: Self::Args) -> Self::Output;
}

macro_rules! impl_signature {
    ($num:tt $($args:ident)*) => {
        #[allow(non_snake_case)]
        impl<$($args: NativeKind,)* Res: NativeKind> Signature for (($($args,)*), Res) {
            type Args = ($($args,)*);
            type Output = Res;
            type Pointer = unsafe extern "C" fn($($args),*) -> Res;

            fn arg_kinds() -> Vec<ValueKind> {
                vec![$(<$args as NativeKind>::KIND),*]
            }

            fn return_kind() -> ValueKind {
                Res::KIND
            }

            unsafe fn invoke(pointer: Self::Pointer, ($($args,)*): Self::Args) -> Res {
                pointer($($args),*)
            }
        }
    };
}

for_each_function_signature!(impl_signature);
