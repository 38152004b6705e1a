mod builtin;
mod context;
mod environment;
mod error;
mod interpreter;
mod output;
mod parser;

#[cfg(test)]
mod test_utils;

pub use context::{Interpreter, InterpreterBuilder};
pub use environment::Environment;
pub use error::{EggError, ErrorKind, RuntimeError, SyntaxError};
pub use interpreter::{Arity, Closure, EvaluationResult, Evaluator, HostFunction, SpecialForms, Value};
pub use output::PrintHandler;
pub use parser::{parse, parse_expression, skip, Expression, Literal};

/// Parses and evaluates `source` with the default root bindings.
pub fn run(source: &str) -> Result<Value, EggError> {
    Interpreter::new().run(source)
}
