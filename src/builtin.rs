use std::{cmp::Ordering, collections::HashMap, rc::Rc};

use crate::{error::RuntimeError, interpreter::{Arity, EvaluationResult, HostFunction, Value}, output::PrintHandler};


fn operands<const N: usize>(operation: &str, values: Vec<Value>) -> Result<[Value; N], RuntimeError> {
    let found = values.len();
    values.try_into().map_err(|_| RuntimeError::ArityMismatch {
        callee: operation.to_owned(),
        expected: Arity::Exact(N).to_string(),
        found,
    })
}

fn type_mismatch(operation: &str, expected: &'static str, found: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        operation: operation.to_owned(),
        expected,
        found: found.type_name(),
    }
}

fn numeric_operands(operation: &str, values: Vec<Value>) -> Result<(f64, f64), RuntimeError> {
    match operands::<2>(operation, values)? {
        [Value::Number(a), Value::Number(b)] => Ok((a, b)),
        [Value::Number(_), other] | [other, _] => Err(type_mismatch(operation, "two numbers", &other)),
    }
}

fn builtin_add(values: Vec<Value>) -> EvaluationResult {
    // `+` also joins two strings
    match operands::<2>("+", values)? {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a + b)),
        [Value::String(a), Value::String(b)] => Ok(Value::String(Rc::from(format!("{}{}", a, b)))),
        [Value::Number(_), other] | [Value::String(_), other] | [other, _]
            => Err(type_mismatch("+", "two numbers or two strings", &other)),
    }
}

fn builtin_sub(values: Vec<Value>) -> EvaluationResult {
    let (a, b) = numeric_operands("-", values)?;
    Ok(Value::Number(a - b))
}

fn builtin_mul(values: Vec<Value>) -> EvaluationResult {
    let (a, b) = numeric_operands("*", values)?;
    Ok(Value::Number(a * b))
}

fn builtin_rem(values: Vec<Value>) -> EvaluationResult {
    let (a, b) = numeric_operands("%", values)?;
    Ok(Value::Number(a % b))
}

fn builtin_compare(operation: &str, values: Vec<Value>, f: impl Fn(Ordering) -> bool) -> EvaluationResult {
    let ordering = match operands::<2>(operation, values)? {
        [Value::Number(a), Value::Number(b)] => a.partial_cmp(&b),
        [Value::String(a), Value::String(b)] => Some(a.cmp(&b)),
        [Value::Number(_), other] | [Value::String(_), other] | [other, _]
            => return Err(type_mismatch(operation, "two numbers or two strings", &other)),
    };
    Ok(Value::Boolean(ordering.is_some_and(f)))
}

fn builtin_less(values: Vec<Value>) -> EvaluationResult {
    builtin_compare("<", values, Ordering::is_lt)
}

fn builtin_less_eq(values: Vec<Value>) -> EvaluationResult {
    builtin_compare("<=", values, Ordering::is_le)
}

fn builtin_greater(values: Vec<Value>) -> EvaluationResult {
    builtin_compare(">", values, Ordering::is_gt)
}

fn builtin_greater_eq(values: Vec<Value>) -> EvaluationResult {
    builtin_compare(">=", values, Ordering::is_ge)
}

fn builtin_eq(values: Vec<Value>) -> EvaluationResult {
    let [a, b] = operands::<2>("==", values)?;
    Ok(Value::Boolean(a == b))
}

fn builtin_not_eq(values: Vec<Value>) -> EvaluationResult {
    let [a, b] = operands::<2>("!=", values)?;
    Ok(Value::Boolean(a != b))
}

fn builtin_array(values: Vec<Value>) -> EvaluationResult {
    Ok(Value::Array(Rc::from(values)))
}

fn builtin_length(values: Vec<Value>) -> EvaluationResult {
    match operands::<1>("length", values)? {
        [Value::Array(array)] => Ok(Value::Number(array.len() as f64)),
        [other] => Err(type_mismatch("length", "an array", &other)),
    }
}

fn builtin_element(values: Vec<Value>) -> EvaluationResult {
    match operands::<2>("element", values)? {
        [Value::Array(array), Value::Number(index)] => {
            let in_bounds = index >= 0.0 && index.fract() == 0.0 && (index as usize) < array.len();
            if !in_bounds {
                return Err(RuntimeError::IndexOutOfBounds { index, length: array.len() });
            }
            Ok(array[index as usize].clone())
        }
        [Value::Array(_), other] => Err(type_mismatch("element", "a number index", &other)),
        [other, _] => Err(type_mismatch("element", "an array", &other)),
    }
}

fn builtin_print(output: PrintHandler) -> HostFunction {
    HostFunction::new("print", Arity::Exact(1), move |values| {
        let [value] = operands::<1>("print", values)?;
        output.println(&value.to_string());
        Ok(value)
    })
}

/// The bindings every program starts from.
pub(crate) fn builtin_bindings(output: PrintHandler) -> HashMap<String, Value> {
    let binary: [(&str, fn(Vec<Value>) -> EvaluationResult); 10] = [
        ("+", builtin_add),
        ("-", builtin_sub),
        ("*", builtin_mul),
        ("%", builtin_rem),
        ("<", builtin_less),
        ("<=", builtin_less_eq),
        (">", builtin_greater),
        (">=", builtin_greater_eq),
        ("==", builtin_eq),
        ("!=", builtin_not_eq),
    ];

    let mut bindings: HashMap<String, Value> = binary.into_iter()
        .map(|(name, function)| (name.to_owned(), Value::HostFunction(HostFunction::new(name, Arity::Exact(2), function))))
        .collect();

    bindings.extend([
        ("true".to_owned(), Value::Boolean(true)),
        ("false".to_owned(), Value::Boolean(false)),
        ("print".to_owned(), Value::HostFunction(builtin_print(output))),
        ("array".to_owned(), Value::HostFunction(HostFunction::new("array", Arity::Variadic, builtin_array))),
        ("length".to_owned(), Value::HostFunction(HostFunction::new("length", Arity::Exact(1), builtin_length))),
        ("element".to_owned(), Value::HostFunction(HostFunction::new("element", Arity::Exact(2), builtin_element))),
    ]);

    bindings
}
