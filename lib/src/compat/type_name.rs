use crate::value::{Callable, Iterable, Value};

use super::{FdOrClose, NonNegative};

pub trait TypeName {
    fn type_name() -> String;
}

macro_rules! impl_type_name {
    ($($type: ty = $name: literal),*) => {
        $(
            impl TypeName for $type {
                fn type_name() -> String {
                    String::from($name)
                }
            }
        )*
    };
}

impl_type_name!(
    Value = "value",

    String = "string",
    i64 = "integer",
    NonNegative = "non-negative int",
    FdOrClose = "fd or \"-\"",
    Callable = "callable",
    Iterable = "iterable"
);
