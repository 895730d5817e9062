pub mod error;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod value;
pub mod environment;
pub mod evaluator;
pub mod natives;
pub mod diagnostic;
#[allow(clippy::module_inception)]
pub mod interpreter;
