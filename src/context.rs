use std::rc::Rc;

use crate::{
    builtin::builtin_bindings,
    environment::Environment,
    error::EggError,
    interpreter::{Arity, EvaluationResult, Evaluator, HostFunction, SpecialForms, Value},
    output::PrintHandler,
    parser::{parse, Expression},
};


/// Runs Egg programs against a shared, frozen root frame.
///
/// Every program gets a fresh child of the root, so nothing a program
/// defines is visible to the next one. The root itself is never written to
/// after [`InterpreterBuilder::build`].
pub struct Interpreter {
    root: Rc<Environment>,
    forms: SpecialForms,
}

impl Interpreter {
    /// An interpreter with the default root bindings, printing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&self, source: &str) -> Result<Value, EggError> {
        let expression = parse(source)?;
        self.evaluate(&expression)
    }

    /// Evaluates an already parsed program in a fresh top-level frame.
    pub fn evaluate(&self, expression: &Expression) -> Result<Value, EggError> {
        Evaluator::new(&self.forms)
            .evaluate(expression, &self.root.child())
            .inspect(|value| tracing::debug!(%value, "program finished"))
            .map_err(|error| {
                tracing::debug!(%error, "program failed");
                error.into()
            })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects host additions to the root frame before it is frozen.
#[derive(Default)]
pub struct InterpreterBuilder {
    output: PrintHandler,
    bindings: Vec<(String, Value)>,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, output: PrintHandler) -> Self {
        self.output = output;
        self
    }

    /// Adds a root binding, replacing a builtin of the same name.
    pub fn bind(mut self, name: &str, value: Value) -> Self {
        self.bindings.push((name.to_owned(), value));
        self
    }

    pub fn host_function(self, name: &str, arity: Arity, function: impl Fn(Vec<Value>) -> EvaluationResult + 'static) -> Self {
        let function = Value::HostFunction(HostFunction::new(name, arity, function));
        self.bind(name, function)
    }

    pub fn build(self) -> Interpreter {
        let mut bindings = builtin_bindings(self.output);
        bindings.extend(self.bindings);
        tracing::debug!(bindings = bindings.len(), "root frame ready");

        Interpreter {
            root: Environment::root(bindings),
            forms: SpecialForms::new(),
        }
    }
}
