#![no_main]

use core::fmt;

use itertools::Itertools;
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};

// Builtins and load from variables
#[derive(Arbitrary, Debug)]
enum EggAtom {
    Add, Sub, Mul, Rem,
    True, False,
    Greater, GreaterEq,
    Less, LessEq, Eq, NotEq,

    Array, Length, Element,

    Identifier(String),
    Number(u32),
    Text(String),
}

impl fmt::Display for EggAtom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", match self {
            EggAtom::Add => "+",
            EggAtom::Sub => "-",
            EggAtom::Mul => "*",
            EggAtom::Rem => "%",
            EggAtom::True => "true",
            EggAtom::False => "false",
            EggAtom::Greater => ">",
            EggAtom::GreaterEq => ">=",
            EggAtom::Less => "<",
            EggAtom::LessEq => "<=",
            EggAtom::Eq => "==",
            EggAtom::NotEq => "!=",
            EggAtom::Array => "array",
            EggAtom::Length => "length",
            EggAtom::Element => "element",
            EggAtom::Identifier(identifier) => identifier,
            EggAtom::Number(value) => return write!(f, "{}", value),
            EggAtom::Text(text) => return write!(f, "\"{}\"", text.replace('"', "")),
        })
    }
}

// `while` is left out, a fuzzer finds endless loops far too easily
#[derive(Arbitrary, Debug)]
enum EggCommand {
    Do(Vec<EggCommand>),
    Define(Vec<EggCommand>),
    Fun(Vec<EggCommand>),
    If(Vec<EggCommand>),
    Call(Box<EggCommand>, Vec<EggCommand>),

    Atom(EggAtom),
}

fn stringify_arguments(values: &[EggCommand]) -> String {
    values.iter()
        .map(EggCommand::to_string)
        .join(", ")
}

impl fmt::Display for EggCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EggCommand::Atom(atom) => atom.fmt(f),
            EggCommand::Call(operator, args) => write!(f, "{}({})", operator, stringify_arguments(args)),
            EggCommand::Do(args) => write!(f, "do({})", stringify_arguments(args)),
            EggCommand::Define(args) => write!(f, "define({})", stringify_arguments(args)),
            EggCommand::Fun(args) => write!(f, "fun({})", stringify_arguments(args)),
            EggCommand::If(args) => write!(f, "if({})", stringify_arguments(args)),
        }
    }
}

fuzz_target!(|commands: Vec<EggCommand>| {
    let interpreter = egg::Interpreter::builder()
        .with_output(egg::PrintHandler::buffer())
        .build();

    for command in commands {
        let _ = interpreter.run(&command.to_string());
    }
});
