//! Unwrappers assert properties of the values an expression produced, turning
//! any violation into an error that points at the expression.
//!
//! ```ignore
//! let fd = ctx.unwrap("argument to close", span, values).one()?.fd_or_close()?;
//! ```

use std::rc::Rc;

use crate::{
    context::{EvalCtx, ValuesOp},
    error::{Error, Result},
    span::{Chunk, Span},
    value::{Callable, Iterable, Value},
};

struct UnwrapperInner<'a> {
    ctx: &'a EvalCtx,
    /// What is being unwrapped, e.g. "argument to close".
    description: String,
    span: Span,
    values: Vec<Value>,
}

impl UnwrapperInner<'_> {
    fn error(&self, expected: &str, got: impl Into<String>) -> Error {
        self.ctx
            .mismatch(self.description.as_str(), self.span, expected, got)
    }
}

impl EvalCtx {
    pub fn unwrap(
        &self,
        description: impl Into<String>,
        span: Span,
        values: Vec<Value>,
    ) -> ValuesUnwrapper<'_> {
        ValuesUnwrapper(Rc::new(UnwrapperInner {
            ctx: self,
            description: description.into(),
            span,
            values,
        }))
    }

    /// Runs `op` and unwraps what it produced, addressed at the op's span.
    pub fn exec_and_unwrap<T: ValuesOp>(
        &self,
        description: impl Into<String>,
        op: &Chunk<T>,
    ) -> Result<ValuesUnwrapper<'_>> {
        let values = op.exec(self)?;
        Ok(self.unwrap(description, op.span, values))
    }
}

/// Unwraps a sequence of values.
#[derive(Clone)]
pub struct ValuesUnwrapper<'a>(Rc<UnwrapperInner<'a>>);

impl<'a> ValuesUnwrapper<'a> {
    pub fn description(&self) -> &str {
        &self.0.description
    }
    pub fn span(&self) -> Span {
        self.0.span
    }
    pub fn values(&self) -> &[Value] {
        &self.0.values
    }
    pub fn len(&self) -> usize {
        self.0.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.values.is_empty()
    }

    /// Gives the values back without checking them.
    pub fn into_values(self) -> Vec<Value> {
        match Rc::try_unwrap(self.0) {
            Ok(inner) => inner.values,
            Err(shared) => shared.values.clone(),
        }
    }

    pub fn one(&self) -> Result<ValueUnwrapper<'a>> {
        match self.0.values.len() {
            1 => Ok(ValueUnwrapper(self.0.clone())),
            n => Err(self.0.error("a single value", format!("{n} values"))),
        }
    }
}

/// Unwraps a single value. Only [`ValuesUnwrapper::one`] creates these.
#[derive(Clone)]
pub struct ValueUnwrapper<'a>(Rc<UnwrapperInner<'a>>);

impl ValueUnwrapper<'_> {
    fn value(&self) -> &Value {
        // `one` has checked there is exactly one value.
        &self.0.values[0]
    }

    pub fn description(&self) -> &str {
        &self.0.description
    }
    pub fn span(&self) -> Span {
        self.0.span
    }

    pub fn any(&self) -> &Value {
        self.value()
    }
    pub fn into_any(self) -> Value {
        self.value().clone()
    }

    pub fn string(&self) -> Result<String> {
        let value = self.value();
        value
            .as_string()
            .map(str::to_string)
            .ok_or_else(|| self.0.error("string", value.kind()))
    }

    /// Decimal integer in the signed 64-bit range: an optional sign followed
    /// by digits, nothing else.
    pub fn int(&self) -> Result<i64> {
        let s = self.string()?;
        s.parse().map_err(|_| self.0.error("integer", s))
    }

    pub fn non_negative_int(&self) -> Result<i64> {
        let i = self.int()?;
        if i < 0 {
            return Err(self.0.error("non-negative int", i.to_string()));
        }
        Ok(i)
    }

    /// A file descriptor, or -1 for "-", which means close. Anything else
    /// that is not a non-negative integer is reported as such, including
    /// text that does not parse at all.
    pub fn fd_or_close(&self) -> Result<i64> {
        let s = self.string()?;
        if s == "-" {
            return Ok(-1);
        }
        match s.parse::<i64>() {
            Ok(i) if i >= 0 => Ok(i),
            Ok(i) => Err(self.0.error("non-negative int", i.to_string())),
            Err(_) => Err(self.0.error("non-negative int", s)),
        }
    }

    pub fn callable(&self) -> Result<Callable> {
        let value = self.value();
        value
            .as_callable()
            .ok_or_else(|| self.0.error("callable", value.kind()))
    }

    pub fn iterable(&self) -> Result<Iterable> {
        let value = self.value();
        value
            .as_iterable()
            .ok_or_else(|| self.0.error("iterable", value.kind()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        context::{FnOp, Literal},
        value::Call,
    };
    use pretty_assertions::assert_eq;

    struct Nop;
    impl Call for Nop {
        fn call(&self, _: &EvalCtx, _: Vec<Chunk<Value>>, _: Span) -> Result<Vec<Value>> {
            Ok(vec![])
        }
    }

    fn ctx() -> EvalCtx {
        EvalCtx::new("test", "")
    }

    fn message<T>(result: Result<T>) -> String {
        match result {
            Ok(_) => String::from("<ok>"),
            Err(err) => err.message().to_string(),
        }
    }

    #[test]
    fn one_rejects_other_counts() {
        let ctx = ctx();
        let u = ctx.unwrap("operand", Span::new(5, 9), vec![]);
        let err = u.one().err().unwrap();
        assert_eq!(err.message(), "operand must be a single value; got 0 values");
        assert_eq!(err.span(), Span::new(5, 9));
        let two = ctx.unwrap("operand", Span::default(), vec!["a".into(), "b".into()]);
        assert_eq!(
            message(two.one()),
            "operand must be a single value; got 2 values"
        );
    }

    #[test]
    fn narrowing_leaves_the_sequence_untouched() {
        let ctx = ctx();
        let seq = ctx.unwrap("x", Span::new(1, 2), vec!["7".into()]);
        let one = seq.one().unwrap();
        assert_eq!(one.int(), Ok(7));
        assert_eq!(seq.values(), &[Value::from("7")]);
        assert_eq!(one.description(), "x");
        assert_eq!(one.span(), Span::new(1, 2));
        assert_eq!(seq.into_values(), vec![Value::from("7")]);
    }

    #[test]
    fn any_never_fails() {
        let ctx = ctx();
        let list = Value::from(vec!["a"]);
        let one = ctx
            .unwrap("x", Span::default(), vec![list.clone()])
            .one()
            .unwrap();
        assert_eq!(one.any(), &list);
        assert_eq!(one.into_any(), list);
    }

    #[test]
    fn string_reports_kind() {
        let ctx = ctx();
        let one = |v: Value| {
            ctx.unwrap("argument", Span::default(), vec![v])
                .one()
                .unwrap()
        };
        assert_eq!(one("hi".into()).string(), Ok(String::from("hi")));
        assert_eq!(
            message(one(vec!["a"].into()).string()),
            "argument must be string; got list"
        );
        assert_eq!(
            message(one(true.into()).string()),
            "argument must be string; got bool"
        );
    }

    #[test]
    fn int_grammar() {
        let ctx = ctx();
        let int = |s: &str| {
            ctx.unwrap("n", Span::default(), vec![s.into()])
                .one()
                .unwrap()
                .int()
        };
        assert_eq!(int("42"), Ok(42));
        assert_eq!(int("+42"), Ok(42));
        assert_eq!(int("-42"), Ok(-42));
        assert_eq!(int("007"), Ok(7));
        assert_eq!(int("9223372036854775807"), Ok(i64::MAX));
        assert_eq!(int("-9223372036854775808"), Ok(i64::MIN));
        for bad in [
            "",
            "-",
            "+",
            " 1",
            "1 ",
            "1_000",
            "1,000",
            "0x10",
            "1.5",
            "9223372036854775808",
        ] {
            assert_eq!(message(int(bad)), format!("n must be integer; got {bad}"));
        }
    }

    #[test]
    fn int_requires_a_string_first() {
        let ctx = ctx();
        let one = ctx
            .unwrap("n", Span::default(), vec![Value::Map(BTreeMap::new())])
            .one()
            .unwrap();
        assert_eq!(message(one.int()), "n must be string; got map");
        assert_eq!(message(one.fd_or_close()), "n must be string; got map");
    }

    #[test]
    fn non_negative_int() {
        let ctx = ctx();
        let nn = |s: &str| {
            ctx.unwrap("n", Span::default(), vec![s.into()])
                .one()
                .unwrap()
                .non_negative_int()
        };
        assert_eq!(nn("0"), Ok(0));
        assert_eq!(nn("-0"), Ok(0));
        assert_eq!(message(nn("-3")), "n must be non-negative int; got -3");
        assert_eq!(message(nn("-03")), "n must be non-negative int; got -3");
        assert_eq!(message(nn("x")), "n must be integer; got x");
    }

    #[test]
    fn fd_or_close() {
        let ctx = ctx();
        let fd = |s: &str| {
            ctx.unwrap("argument to close", Span::default(), vec![s.into()])
                .one()
                .unwrap()
                .fd_or_close()
        };
        assert_eq!(fd("-"), Ok(-1));
        assert_eq!(fd("3"), Ok(3));
        assert_eq!(
            message(fd("-1")),
            "argument to close must be non-negative int; got -1"
        );
        assert_eq!(
            message(fd("x")),
            "argument to close must be non-negative int; got x"
        );
        assert_eq!(
            message(fd("--")),
            "argument to close must be non-negative int; got --"
        );
    }

    #[test]
    fn callable_and_iterable() {
        let ctx = ctx();
        let one = |v: Value| ctx.unwrap("arg", Span::default(), vec![v]).one().unwrap();
        let f = Value::Function(Rc::new(Nop));
        assert_eq!(one(f.clone()).callable().map(Value::from), Ok(f.clone()));
        assert_eq!(message(one("x".into()).callable()), "arg must be callable; got string");
        assert_eq!(
            one(vec!["a", "b"].into()).iterable().map(|it| it.len()),
            Ok(2)
        );
        assert_eq!(message(one(f).iterable()), "arg must be iterable; got fn");
        assert_eq!(message(one("x".into()).iterable()), "arg must be iterable; got string");
    }

    #[test]
    fn exec_and_unwrap_uses_the_op_span() {
        let ctx = ctx();
        let op = Chunk::new(Literal(vec!["a".into(), "b".into()]), Span::new(3, 8));
        let err = ctx
            .exec_and_unwrap("redirection source", &op)
            .and_then(|u| u.one())
            .err()
            .unwrap();
        assert_eq!(err.span(), Span::new(3, 8));
        assert_eq!(
            err.message(),
            "redirection source must be a single value; got 2 values"
        );
    }

    #[test]
    fn exec_and_unwrap_propagates_op_failure() {
        let ctx = ctx();
        let op = Chunk::new(
            FnOp(|ctx: &EvalCtx, span: Span| -> Result<Vec<Value>> {
                Err(ctx.error(span, "boom"))
            }),
            Span::new(1, 4),
        );
        let err = ctx.exec_and_unwrap("x", &op).err().unwrap();
        assert_eq!(err.message(), "boom");
        assert_eq!(err.span(), Span::new(1, 4));
    }
}
