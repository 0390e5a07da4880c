use std::{cell::RefCell, collections::HashMap};

use tracing::{debug, trace};

use crate::{
    error::{Error, Mismatch, Result},
    span::{Chunk, Span},
    value::Value,
};

/// The evaluation session checks run in. Owns the source text that spans point
/// into, and the variables producers can read.
#[derive(Debug, Default)]
pub struct EvalCtx {
    src_name: String,
    src: String,
    variables: RefCell<HashMap<String, Value>>,
}

impl EvalCtx {
    pub fn new(src_name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            src_name: src_name.into(),
            src: src.into(),
            variables: RefCell::new(HashMap::new()),
        }
    }

    pub fn set_var(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.borrow_mut().insert(name.into(), value.into());
    }
    pub fn var(&self, name: &str) -> Option<Value> {
        self.variables.borrow().get(name).cloned()
    }

    /// Builds the fatal error for `span`. Callers return it straight away;
    /// evaluation of the current expression does not continue.
    pub fn error(&self, span: Span, message: impl Into<String>) -> Error {
        let err = Error::new(message, span);
        debug!(src = %self.src_name, ?span, error = err.message(), "evaluation error");
        err
    }

    pub fn mismatch(
        &self,
        description: impl Into<String>,
        span: Span,
        expected: impl Into<String>,
        got: impl Into<String>,
    ) -> Error {
        let mismatch = Mismatch {
            description: description.into(),
            expected: expected.into(),
            got: got.into(),
        };
        debug!(
            src = %self.src_name,
            ?span,
            description = %mismatch.description,
            expected = %mismatch.expected,
            got = %mismatch.got,
            "unwrap mismatch"
        );
        Error::mismatch(mismatch, span)
    }

    pub fn render(&self, err: &Error) -> String {
        err.render(&self.src_name, &self.src)
    }
}

/// Something that evaluates to a sequence of values. The span is where the
/// producer sits in the source.
pub trait ValuesOp {
    fn exec(&self, ctx: &EvalCtx, span: Span) -> Result<Vec<Value>>;
}

impl<T: ValuesOp + ?Sized> ValuesOp for Box<T> {
    fn exec(&self, ctx: &EvalCtx, span: Span) -> Result<Vec<Value>> {
        (**self).exec(ctx, span)
    }
}

impl<T: ValuesOp> Chunk<T> {
    pub fn exec(&self, ctx: &EvalCtx) -> Result<Vec<Value>> {
        self.data.exec(ctx, self.span)
    }
}

pub type BoxedOp = Chunk<Box<dyn ValuesOp>>;

pub fn boxed(op: impl ValuesOp + 'static, span: Span) -> BoxedOp {
    let op: Box<dyn ValuesOp> = Box::new(op);
    Chunk::new(op, span)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal(pub Vec<Value>);

impl ValuesOp for Literal {
    fn exec(&self, _: &EvalCtx, _: Span) -> Result<Vec<Value>> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable(pub String);

impl ValuesOp for Variable {
    fn exec(&self, ctx: &EvalCtx, span: Span) -> Result<Vec<Value>> {
        trace!(name = %self.0, "variable lookup");
        ctx.var(&self.0)
            .map(|value| vec![value])
            .ok_or_else(|| ctx.error(span, format!("variable ${} not found", self.0)))
    }
}

/// Concatenates the outputs of its parts.
pub struct Compound(pub Vec<BoxedOp>);

impl ValuesOp for Compound {
    fn exec(&self, ctx: &EvalCtx, _: Span) -> Result<Vec<Value>> {
        let mut values = Vec::new();
        for part in &self.0 {
            values.extend(part.exec(ctx)?);
        }
        Ok(values)
    }
}

pub struct CallOp {
    pub callee: BoxedOp,
    pub args: Vec<BoxedOp>,
}

impl ValuesOp for CallOp {
    fn exec(&self, ctx: &EvalCtx, span: Span) -> Result<Vec<Value>> {
        let callee = ctx
            .exec_and_unwrap("callee", &self.callee)?
            .one()?
            .callable()?;
        let mut args = Vec::new();
        for arg in &self.args {
            let values = arg.exec(ctx)?;
            args.extend(values.into_iter().map(|value| Chunk::new(value, arg.span)));
        }
        trace!(kind = callee.kind(), name = ?callee.name(), args = args.len(), "call");
        callee.call(ctx, args, span)
    }
}

/// Adapts a closure into a producer.
pub struct FnOp<F>(pub F);

impl<F: Fn(&EvalCtx, Span) -> Result<Vec<Value>>> ValuesOp for FnOp<F> {
    fn exec(&self, ctx: &EvalCtx, span: Span) -> Result<Vec<Value>> {
        (self.0)(ctx, span)
    }
}
