pub mod error;

pub mod compat;
pub mod context;
pub mod span;
pub mod unwrap;
pub mod value;

pub use context::{EvalCtx, ValuesOp};
pub use unwrap::{ValueUnwrapper, ValuesUnwrapper};
