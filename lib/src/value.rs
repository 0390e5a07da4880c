use std::{collections::BTreeMap, fmt, rc::Rc};

use crate::{
    context::EvalCtx,
    error::Result,
    span::{Chunk, Span},
};

#[derive(Clone)]
pub enum Value {
    String(String),
    Bool(bool),
    List(Vec<Self>),
    Map(BTreeMap<String, Self>),
    Function(Rc<dyn Call>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(arg0) => f.debug_tuple("String").field(arg0).finish(),
            Self::Bool(arg0) => f.debug_tuple("Bool").field(arg0).finish(),
            Self::List(arg0) => f.debug_tuple("List").field(arg0).finish(),
            Self::Map(arg0) => f.debug_tuple("Map").field(arg0).finish(),
            Self::Function(func) => {
                f.debug_tuple("Function").field(&func.kind()).finish()
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(string) => f.write_str(string),
            Value::Bool(b) => write!(f, "${b}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) if map.is_empty() => f.write_str("[&]"),
            Value::Map(map) => {
                f.write_str("[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "&{key}={value}")?;
                }
                f.write_str("]")
            }
            Value::Function(func) => match func.name() {
                Some(name) => write!(f, "<{} {}>", func.kind(), name),
                None => write!(f, "<{}>", func.kind()),
            },
        }
    }
}

impl Value {
    /// Name of the value's kind, as shown in error messages.
    pub fn kind(&self) -> &str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Function(func) => func.kind(),
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }
    pub fn as_callable(&self) -> Option<Callable> {
        match self {
            Value::Function(func) => Some(Callable(func.clone())),
            _ => None,
        }
    }
    pub fn as_iterable(&self) -> Option<Iterable> {
        match self {
            Value::List(items) => Some(Iterable::List(items.clone())),
            Value::Map(map) => Some(Iterable::Map(map.clone())),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::List(items1), Value::List(items2)) => items1 == items2,
            (Value::Map(map1), Value::Map(map2)) => map1 == map2,
            (Value::Function(f1), Value::Function(f2)) => Rc::ptr_eq(f1, f2),
            _ => false,
        }
    }
}

/// Each argument carries the span of the expression that produced it; `span`
/// covers the whole call.
pub trait Call {
    fn call(&self, ctx: &EvalCtx, args: Vec<Chunk<Value>>, span: Span) -> Result<Vec<Value>>;
    fn kind(&self) -> &str {
        "fn"
    }
    fn name(&self) -> Option<&str> {
        None
    }
}

/// A value known to be callable.
#[derive(Clone)]
pub struct Callable(Rc<dyn Call>);

impl Callable {
    pub fn call(&self, ctx: &EvalCtx, args: Vec<Chunk<Value>>, span: Span) -> Result<Vec<Value>> {
        self.0.call(ctx, args, span)
    }
    pub fn kind(&self) -> &str {
        self.0.kind()
    }
    pub fn name(&self) -> Option<&str> {
        self.0.name()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callable").field(&self.kind()).finish()
    }
}

impl From<Callable> for Value {
    fn from(callable: Callable) -> Self {
        Value::Function(callable.0)
    }
}

/// A value known to be iterable. Lists yield their elements, maps their keys.
#[derive(Debug, Clone, PartialEq)]
pub enum Iterable {
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Iterable {
    pub fn iter(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        match self {
            Iterable::List(items) => Box::new(items.iter().cloned()),
            Iterable::Map(map) => Box::new(map.keys().cloned().map(Value::String)),
        }
    }
    pub fn len(&self) -> usize {
        match self {
            Iterable::List(items) => items.len(),
            Iterable::Map(map) => map.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Iterable> for Value {
    fn from(iterable: Iterable) -> Self {
        match iterable {
            Iterable::List(items) => Value::List(items),
            Iterable::Map(map) => Value::Map(map),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
/// Numbers have no kind of their own; they live as their decimal text.
impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::String(value.to_string())
    }
}
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Self::List(vec.into_iter().map(Into::into).collect())
    }
}
impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}
