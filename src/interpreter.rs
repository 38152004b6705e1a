use core::fmt;
use std::{collections::HashMap, rc::Rc};

use itertools::Itertools;

use crate::{environment::Environment, error::RuntimeError, parser::{Expression, Literal}};

pub type EvaluationResult = Result<Value, RuntimeError>;


/// Any value an Egg program can produce.
#[derive(Clone)]
pub enum Value {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
    Array(Rc<[Value]>),
    Closure(Rc<Closure>),
    HostFunction(HostFunction),
}

impl Value {
    /// Everything except `false` is truthy, including `0` and `""`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Array(_) => "array",
            Self::Closure(_) | Self::HostFunction(_) => "function",
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Number(number) => Self::Number(*number),
            Literal::String(string) => Self::String(Rc::clone(string)),
        }
    }
}

// Functions compare by identity, everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Closure(a), Self::Closure(b)) => Rc::ptr_eq(a, b),
            (Self::HostFunction(a), Self::HostFunction(b)) => Rc::ptr_eq(&a.function, &b.function),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => fmt_number(*number, f),
            Self::String(string) => f.write_str(string),
            Self::Boolean(boolean) => boolean.fmt(f),
            Self::Array(values) => write!(f, "[{}]", values.iter().join(", ")),
            Self::Closure(closure) => write!(f, "fun({})", closure.parameters().iter().join(", ")),
            Self::HostFunction(function) => write!(f, "<builtin {}>", function.name),
        }
    }
}

// Zero prints without a sign; infinities and NaN are spelled out.
fn fmt_number(number: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match number {
        n if n.is_nan() => f.write_str("NaN"),
        n if n.is_infinite() => f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" }),
        n if n == 0.0 => f.write_str("0"),
        n => fmt::Display::fmt(&n, f),
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(string) => write!(f, "{:?}", string),
            other => (other as &dyn fmt::Display).fmt(f),
        }
    }
}

/// A user function together with the frame it was defined in.
pub struct Closure {
    parameters: Vec<String>,
    body: Rc<Expression>,
    environment: Rc<Environment>,
}

impl Closure {
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => expected == count,
            Self::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(count) => write!(f, "exactly {}", count),
            Self::Variadic => write!(f, "any number of"),
        }
    }
}

type HostFn = dyn Fn(Vec<Value>) -> EvaluationResult;

/// A function provided by the embedding program. Host functions receive
/// their arguments already evaluated.
#[derive(Clone)]
pub struct HostFunction {
    name: Rc<str>,
    arity: Arity,
    function: Rc<HostFn>,
}

impl HostFunction {
    pub fn new(name: &str, arity: Arity, function: impl Fn(Vec<Value>) -> EvaluationResult + 'static) -> Self {
        Self { name: Rc::from(name), arity, function: Rc::new(function) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: Vec<Value>) -> EvaluationResult {
        if !self.arity.accepts(args.len()) {
            return Err(RuntimeError::ArityMismatch {
                callee: self.name.to_string(),
                expected: self.arity.to_string(),
                found: args.len(),
            });
        }
        (self.function)(args)
    }
}

type SpecialForm = fn(&Evaluator, &[Rc<Expression>], &Rc<Environment>) -> EvaluationResult;

/// The fixed table of forms that receive their arguments unevaluated.
pub struct SpecialForms(HashMap<&'static str, SpecialForm>);

impl SpecialForms {
    pub fn new() -> Self {
        Self(HashMap::from([
            ("do", evaluate_do as SpecialForm),
            ("define", evaluate_define),
            ("fun", evaluate_fun),
            ("if", evaluate_if),
            ("while", evaluate_while),
        ]))
    }

    fn get(&self, name: &str) -> Option<SpecialForm> {
        self.0.get(name).copied()
    }
}

impl Default for SpecialForms {
    fn default() -> Self {
        Self::new()
    }
}

fn expect_arity(form: &str, args: &[Rc<Expression>], expected: usize) -> Result<(), RuntimeError> {
    if args.len() != expected {
        return Err(RuntimeError::ArityMismatch {
            callee: form.to_owned(),
            expected: Arity::Exact(expected).to_string(),
            found: args.len(),
        });
    }
    Ok(())
}

fn evaluate_do(evaluator: &Evaluator, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
    let mut value = Value::Boolean(false);
    for arg in args {
        value = evaluator.evaluate(arg, environment)?;
    }
    Ok(value)
}

fn evaluate_define(evaluator: &Evaluator, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
    expect_arity("define", args, 2)?;

    let name = match args[0].as_ref() {
        Expression::Word(name) => name,
        other => return Err(RuntimeError::MalformedForm {
            form: "define",
            message: format!("expected a word to bind, found `{}`", other),
        }),
    };

    let value = evaluator.evaluate(&args[1], environment)?;
    tracing::trace!(name = %name, value = ?value, "define");
    environment.bind(name, value.clone());
    Ok(value)
}

fn evaluate_fun(_evaluator: &Evaluator, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
    let Some((body, parameters)) = args.split_last() else {
        return Err(RuntimeError::ArityMismatch {
            callee: "fun".to_owned(),
            expected: "at least 1".to_owned(),
            found: 0,
        });
    };

    let parameters = parameters.iter()
        .map(|parameter| match parameter.as_ref() {
            Expression::Word(name) => Ok(name.clone()),
            other => Err(RuntimeError::MalformedForm {
                form: "fun",
                message: format!("parameter `{}` is not a word", other),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Value::Closure(Rc::new(Closure {
        parameters,
        body: Rc::clone(body),
        environment: Rc::clone(environment),
    })))
}

fn evaluate_if(evaluator: &Evaluator, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
    expect_arity("if", args, 3)?;

    if evaluator.evaluate(&args[0], environment)?.is_truthy() {
        evaluator.evaluate(&args[1], environment)
    } else {
        evaluator.evaluate(&args[2], environment)
    }
}

fn evaluate_while(evaluator: &Evaluator, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
    expect_arity("while", args, 2)?;

    while evaluator.evaluate(&args[0], environment)?.is_truthy() {
        evaluator.evaluate(&args[1], environment)?;
    }
    Ok(Value::Boolean(false))
}

/// Tree-walking evaluator. Holds only the special form table; all program
/// state lives in the environment chain.
pub struct Evaluator<'f> {
    forms: &'f SpecialForms,
}

impl<'f> Evaluator<'f> {
    pub fn new(forms: &'f SpecialForms) -> Self {
        Self { forms }
    }

    pub fn evaluate(&self, expression: &Expression, environment: &Rc<Environment>) -> EvaluationResult {
        match expression {
            Expression::Literal(literal) => Ok(literal.into()),
            Expression::Word(name) => environment.lookup(name),
            Expression::Apply { operator, args } => self.evaluate_apply(operator, args, environment),
        }
    }

    fn evaluate_apply(&self, operator: &Expression, args: &[Rc<Expression>], environment: &Rc<Environment>) -> EvaluationResult {
        if let Expression::Word(name) = operator {
            if let Some(form) = self.forms.get(name) {
                return form(self, args, environment);
            }
        }

        let function = self.evaluate(operator, environment)?;
        if !matches!(function, Value::Closure(_) | Value::HostFunction(_)) {
            return Err(RuntimeError::NotCallable(operator.to_string()));
        }

        let values = args.iter()
            .map(|arg| self.evaluate(arg, environment))
            .collect::<Result<Vec<_>, _>>()?;

        self.apply(&function, values)
    }

    /// Calls `function` with already evaluated arguments.
    pub fn apply(&self, function: &Value, args: Vec<Value>) -> EvaluationResult {
        match function {
            Value::Closure(closure) => self.call_closure(closure, args),
            Value::HostFunction(host) => host.call(args),
            other => Err(RuntimeError::NotCallable(other.to_string())),
        }
    }

    fn call_closure(&self, closure: &Rc<Closure>, args: Vec<Value>) -> EvaluationResult {
        if args.len() != closure.parameters.len() {
            return Err(RuntimeError::ArityMismatch {
                callee: Value::Closure(Rc::clone(closure)).to_string(),
                expected: Arity::Exact(closure.parameters.len()).to_string(),
                found: args.len(),
            });
        }

        tracing::trace!(parameters = ?closure.parameters, "calling closure");
        let frame = closure.environment.child();
        for (parameter, value) in closure.parameters.iter().zip(args) {
            frame.bind(parameter, value);
        }

        self.evaluate(&closure.body, &frame)
    }
}
