//! Glue for writing builtins as plain Rust functions. Each argument is checked
//! through a [`ValueUnwrapper`], so a builtin taking an `i64` reports a bad
//! argument exactly like any other integer check.

pub mod function;
pub mod type_name;

use crate::{
    error::Result,
    unwrap::ValueUnwrapper,
    value::{Callable, Iterable, Value},
};

pub trait FromArg: Sized {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self>;
}

/// An integer argument that must not be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FdOrClose {
    Fd(u64),
    Close,
}

impl FromArg for Value {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        Ok(arg.any().clone())
    }
}
impl FromArg for String {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        arg.string()
    }
}
impl FromArg for i64 {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        arg.int()
    }
}
impl FromArg for NonNegative {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        arg.non_negative_int().map(|i| NonNegative(i.unsigned_abs()))
    }
}
impl FromArg for FdOrClose {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        Ok(match arg.fd_or_close()? {
            -1 => FdOrClose::Close,
            fd => FdOrClose::Fd(fd.unsigned_abs()),
        })
    }
}
impl FromArg for Callable {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        arg.callable()
    }
}
impl FromArg for Iterable {
    fn from_arg(arg: &ValueUnwrapper) -> Result<Self> {
        arg.iterable()
    }
}

/// What a builtin's return value turns into on the output side.
pub trait IntoValues {
    fn into_values(self) -> Vec<Value>;
}

impl IntoValues for () {
    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! impl_into_values {
    ($($type: ty),*) => {
        $(
            impl IntoValues for $type {
                fn into_values(self) -> Vec<Value> {
                    vec![self.into()]
                }
            }
        )*
    };
}

impl_into_values!(Value, String, i64, bool, Callable, Iterable);

impl<T: Into<Value>> IntoValues for Vec<T> {
    fn into_values(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}
impl<T: IntoValues> IntoValues for Option<T> {
    fn into_values(self) -> Vec<Value> {
        self.map_or_else(Vec::new, IntoValues::into_values)
    }
}
