use std::{iter::Enumerate, marker::PhantomData, rc::Rc, vec};
use variadics_please::all_tuples;

use super::{FromArg, IntoValues, type_name::TypeName};
use crate::{
    context::EvalCtx,
    error::Result,
    span::{Chunk, Span},
    value::{Call, Value},
};

/// A Rust function exposed as a builtin.
pub struct RsFunction<Fn, Marker> {
    name: String,
    function: Fn,
    parameters: Vec<String>,
    phantom: PhantomData<Marker>,
}

impl<Fn, Marker> RsFunction<Fn, Marker> {
    pub fn name(&self) -> &str {
        &self.name
    }
    /// e.g. `close fd or "-"` or `range integer integer`
    pub fn signature(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.parameters.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait IntoCallable<Marker>: Sized {
    fn into_builtin(self, name: impl Into<String>) -> RsFunction<Self, Marker>;
}

fn plural(n: usize) -> String {
    match n {
        1 => String::from("1 value"),
        n => format!("{n} values"),
    }
}

/// Checks the next argument, addressed at the expression that produced it.
fn next_arg<T: FromArg>(
    ctx: &EvalCtx,
    name: &str,
    arity: usize,
    span: Span,
    args: &mut Enumerate<vec::IntoIter<Chunk<Value>>>,
) -> Result<T> {
    let (i, arg) = args
        .next()
        .ok_or_else(|| ctx.error(span, format!("{name} expected more arguments")))?;
    let description = match arity {
        1 => format!("argument to {name}"),
        _ => format!("argument {} to {name}", i + 1),
    };
    T::from_arg(&ctx.unwrap(description, arg.span, vec![arg.data]).one()?)
}

macro_rules! impl_fn {
    ($(($generic: ident, $var: ident)),*) => {
        impl<
            T: Fn($($generic),*) -> Result<R>,
            R: IntoValues,
            $($generic: TypeName + FromArg),*
        > Call for RsFunction<T, (R, $($generic),*)> {
            #[allow(unused)]
            fn call(
                &self,
                ctx: &EvalCtx,
                args: Vec<Chunk<Value>>,
                span: Span,
            ) -> Result<Vec<Value>> {
                let arity = self.parameters.len();
                if args.len() != arity {
                    return Err(ctx.mismatch(
                        format!("arguments to {}", self.name),
                        span,
                        plural(arity),
                        plural(args.len()),
                    ));
                }
                let mut iter = args.into_iter().enumerate();
                $(
                    let $var: $generic = next_arg(ctx, &self.name, arity, span, &mut iter)?;
                )*
                (self.function)($($var),*).map(IntoValues::into_values)
            }
            fn kind(&self) -> &str {
                "builtin"
            }
            fn name(&self) -> Option<&str> {
                Some(&self.name)
            }
        }

        impl<
            T: Fn($($generic),*) -> Result<R>,
            R: IntoValues,
            $($generic: TypeName + FromArg),*
        > IntoCallable<(R, $($generic),*)> for T {
            fn into_builtin(self, name: impl Into<String>) -> RsFunction<T, (R, $($generic),*)> {
                RsFunction {
                    name: name.into(),
                    function: self,
                    parameters: vec![$($generic::type_name()),*],
                    phantom: PhantomData,
                }
            }
        }

        impl<
            T: Fn($($generic),*) -> Result<R> + 'static,
            R: IntoValues + 'static,
            $($generic: TypeName + FromArg + 'static),*
        > From<RsFunction<T, (R, $($generic),*)>> for Value {
            fn from(function: RsFunction<T, (R, $($generic),*)>) -> Value {
                Value::Function(Rc::new(function))
            }
        }
    };
}

all_tuples!(impl_fn, 0, 12, A, a);
