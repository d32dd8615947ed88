//! Abstract Syntax Tree definitions
//!
//! Node kinds only. Nodes are built through the checked constructors in
//! [`crate::semantic`], which are the only place validation happens, and
//! are turned into IR by [`crate::codegen`].

pub mod ops;
pub mod expressions;
pub mod statements;

pub use ops::{BinaryOp, XcrementOp};
pub use expressions::{Constant, Expression, ExpressionKind};
pub use statements::{FunctionDefinition, Statement, StatementKind, TopLevelItem};
