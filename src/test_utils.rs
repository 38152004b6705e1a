use std::{io::BufRead, path::{Path, PathBuf}};

use anyhow::bail;
use itertools::Itertools;
use serde::{de::{Error, Visitor}, Deserialize};

use crate::error::ErrorKind;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TestOutput {
    Anything, // `null`: any value is accepted
    Text(String),
    Number(f64),
    Boolean(bool),
    List(Vec<TestOutput>)
}

/// One expected outcome: `{"ok": true, "output": ...}` or
/// `{"ok": false, "type": "<ErrorKind>"}`.
pub struct EvaluationResult(Result<TestOutput, ErrorKind>);

impl EvaluationResult {
    pub fn into_result(self) -> Result<TestOutput, ErrorKind> {
        self.0
    }
}

struct EvaluationResultVisitor;

impl<'de> Deserialize<'de> for EvaluationResult {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de> {

        deserializer.deserialize_map(EvaluationResultVisitor)
    }
}

impl<'de> Visitor<'de> for EvaluationResultVisitor {
    type Value = EvaluationResult;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "A structure containing the boolean key 'ok'. If it's okay, contains the key 'output', otherwise the key 'type'")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::MapAccess<'de>, {

        if map.next_key::<String>()?.as_deref() != Some("ok") {
            return Err(A::Error::custom("First key should be 'ok'"))
        }

        let ok: bool = map.next_value()?;
        let second_key = if ok { "output" } else { "type" };
        if map.next_key::<String>()?.as_deref() != Some(second_key) {
            return Err(A::Error::custom(format!("Second key should be '{}'", second_key)))
        }

        let result = if ok {
            EvaluationResult(Ok(map.next_value::<TestOutput>()?))
        } else {
            EvaluationResult(Err(map.next_value::<ErrorKind>()?))
        };

        if map.next_key::<String>()?.is_some() {
            return Err(A::Error::custom("Only two keys should be present"));
        }

        Ok(result)
    }
}

fn load_input_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<String>> {
    let source = std::fs::read(path)?;
    Ok(source.lines().collect::<Result<Vec<String>, _>>()?)
}

fn load_output_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<EvaluationResult>> {
    let source = std::fs::read(path)?;
    Ok(serde_json::from_slice(&source)?)
}

const TESTCASES: usize = 4;

/// Loads `test_inputs/N.egg` (one program per line) with its expectations
/// from `test_outputs/N.json`.
pub fn load_test_pair(testcase: usize) -> anyhow::Result<Vec<(String, EvaluationResult)>> {
    if testcase < 1 || testcase > TESTCASES { bail!("Testcase out of bounds"); }

    let base_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let input = load_input_file(base_path.join("test_inputs").join(format!("{}.egg", testcase)))?;
    let output = load_output_file(base_path.join("test_outputs").join(format!("{}.json", testcase)))?;

    if input.len() != output.len() { bail!("Input and output of testcase {} do not match", testcase); }
    Ok(input.into_iter().zip(output).collect_vec())
}

pub fn all_testcases() -> impl Iterator<Item = usize> {
    1..=TESTCASES
}
