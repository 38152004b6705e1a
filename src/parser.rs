use core::fmt;
use std::rc::Rc;

use itertools::Itertools;
use logos::{Logos, Span};

use crate::error::SyntaxError;


// A digit run only forms an integer when no word character follows it,
// otherwise the whole run belongs to a word (`12abc`). Words may not
// contain any of `(),"#` or whitespace.
#[derive(Debug, Clone, PartialEq, Logos)]
#[logos(skip r"\s+")]
enum Token<'a> {
    // Only a comment closed by a newline is trivia
    #[regex(r"#[^\n]*\n", logos::skip)]
    Comment,

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token(",")]
    Comma,

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Integer(f64),

    #[regex(r#""[^"]*""#, |lex| { let slice = lex.slice(); &slice[1..slice.len() - 1] })]
    String(&'a str),

    #[regex(r##"[^(),\s"#0-9][^(),\s"#]*"##, |lex| lex.slice())]
    #[regex(r##"[0-9]+[A-Za-z_][^(),\s"#]*"##, |lex| lex.slice())]
    Word(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(Rc<str>),
}

/// A parsed Egg expression. Trees are immutable once built; subtrees are
/// shared so that a closure can keep its body alive past the program that
/// defined it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Word(String),
    Apply {
        operator: Rc<Expression>,
        args: Vec<Rc<Expression>>,
    },
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => number.fmt(f),
            Self::String(string) => write!(f, "\"{}\"", string),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => literal.fmt(f),
            Self::Word(name) => f.write_str(name),
            Self::Apply { operator, args } => write!(f, "{}({})", operator, args.iter().join(", ")),
        }
    }
}

type ParseResult<O> = Result<O, SyntaxError>;

struct Lexeme<'a> {
    token: Result<Token<'a>, ()>,
    span: Span,
}

// Lexing stops at the first unrecognised input. The failing lexeme is kept
// so the parser reports it only if it actually reaches it.
fn lexer(input: &str) -> Vec<Lexeme<'_>> {
    let mut lexemes = vec![];
    let mut tokenizer = Token::lexer(input);

    while let Some(token) = tokenizer.next() {
        let failed = token.is_err();
        lexemes.push(Lexeme { token, span: tokenizer.span() });
        if failed { break; }
    }

    lexemes
}

/// Strips leading whitespace and `#` comments. A comment only counts as one
/// once it is terminated by a newline.
pub fn skip(text: &str) -> &str {
    match Token::lexer(text).spanned().next() {
        Some((_, span)) => &text[span.start..],
        None => "",
    }
}

#[derive(Clone, Copy)]
struct Tokens<'s, 't> {
    source: &'s str,
    lexemes: &'t [Lexeme<'s>],
}

impl<'s, 't> Tokens<'s, 't> {
    fn peek(&self) -> Option<&'t Result<Token<'s>, ()>> {
        self.lexemes.first().map(|lexeme| &lexeme.token)
    }

    fn advance(self) -> Self {
        Self { source: self.source, lexemes: &self.lexemes[1..] }
    }

    fn offset(&self) -> usize {
        self.lexemes.first().map_or(self.source.len(), |lexeme| lexeme.span.start)
    }

    fn remainder(&self) -> &'s str {
        &self.source[self.offset()..]
    }

    fn error(&self, message: &str) -> SyntaxError {
        let remainder = self.remainder();
        let found = if remainder.is_empty() {
            "end of input".to_owned()
        } else {
            format!("`{}`", remainder.chars().take(24).collect::<String>())
        };
        SyntaxError::new(format!("{}, found {}", message, found), self.offset())
    }
}

fn parse_atom<'s, 't>(tokens: Tokens<'s, 't>) -> ParseResult<(Tokens<'s, 't>, Expression)> {
    let expression = match tokens.peek() {
        Some(Ok(Token::Integer(number))) => Expression::Literal(Literal::Number(*number)),
        Some(Ok(Token::String(string))) => Expression::Literal(Literal::String(Rc::from(*string))),
        Some(Ok(Token::Word(word))) => Expression::Word(word.to_string()),
        _ => return Err(tokens.error("expected an expression")),
    };
    Ok((tokens.advance(), expression))
}

fn parse_arguments<'s, 't>(mut tokens: Tokens<'s, 't>) -> ParseResult<(Tokens<'s, 't>, Vec<Rc<Expression>>)> {
    let mut args = vec![];

    while tokens.peek() != Some(&Ok(Token::RightParen)) {
        let (rest, arg) = parse_tokens(tokens)?;
        args.push(Rc::new(arg));
        tokens = rest;

        match tokens.peek() {
            Some(Ok(Token::Comma)) => {
                tokens = tokens.advance();
                if tokens.peek() == Some(&Ok(Token::RightParen)) {
                    return Err(tokens.error("expected an expression after ','"));
                }
            }
            Some(Ok(Token::RightParen)) => {}
            _ => return Err(tokens.error("expected ',' or ')'")),
        }
    }

    Ok((tokens.advance(), args))
}

fn parse_application<'s, 't>(expression: Expression, tokens: Tokens<'s, 't>) -> ParseResult<(Tokens<'s, 't>, Expression)> {
    if tokens.peek() != Some(&Ok(Token::LeftParen)) {
        return Ok((tokens, expression));
    }

    let (tokens, args) = parse_arguments(tokens.advance())?;
    parse_application(Expression::Apply { operator: Rc::new(expression), args }, tokens)
}

fn parse_tokens<'s, 't>(tokens: Tokens<'s, 't>) -> ParseResult<(Tokens<'s, 't>, Expression)> {
    let (tokens, atom) = parse_atom(tokens)?;
    parse_application(atom, tokens)
}

/// Parses one expression from the front of `text`, returning it together
/// with the unconsumed source (leading trivia already skipped).
pub fn parse_expression(text: &str) -> ParseResult<(Expression, &str)> {
    let lexemes = lexer(text);
    let (tokens, expression) = parse_tokens(Tokens { source: text, lexemes: &lexemes })?;
    Ok((expression, tokens.remainder()))
}

/// Parses a whole program, which must be exactly one expression.
pub fn parse(text: &str) -> ParseResult<Expression> {
    let lexemes = lexer(text);
    let (tokens, expression) = parse_tokens(Tokens { source: text, lexemes: &lexemes })?;
    if tokens.peek().is_some() {
        return Err(tokens.error("unexpected input after the program"));
    }

    Ok(expression)
}

#[cfg(test)]
mod tests {
    use anyhow::bail;

    use crate::{error::{EggError, ErrorKind}, test_utils::{all_testcases, load_test_pair}};

    use super::*;

    fn word(name: &str) -> Rc<Expression> {
        Rc::new(Expression::Word(name.to_owned()))
    }

    fn number(value: f64) -> Rc<Expression> {
        Rc::new(Expression::Literal(Literal::Number(value)))
    }

    #[test]
    fn skip_strips_whitespace_and_comments() {
        assert_eq!(skip("  \t\n x"), "x");
        assert_eq!(skip("# one\n   # two\nrest"), "rest");
        assert_eq!(skip(""), "");
        assert_eq!(skip("   "), "");
    }

    #[test]
    fn skip_keeps_unterminated_comment() {
        assert_eq!(skip("  # dangling"), "# dangling");
    }

    #[test]
    fn skip_is_idempotent() {
        for input in ["  # a\n\tfoo(1)", "bar", "\n\n", "# x\n# y\n\"s\""] {
            assert_eq!(skip(skip(input)), skip(input));
        }
    }

    #[test]
    fn comment_before_word() {
        assert_eq!(parse("# hello\nx").unwrap(), Expression::Word("x".to_owned()));
    }

    #[test]
    fn comments_between_operator_and_arguments() {
        assert_eq!(
            parse("a # one\n   # two\n()").unwrap(),
            Expression::Apply { operator: word("a"), args: vec![] }
        );
    }

    #[test]
    fn chained_application() {
        let expected = Expression::Apply {
            operator: Rc::new(Expression::Apply { operator: word("f"), args: vec![number(1.0)] }),
            args: vec![word("b")],
        };
        assert_eq!(parse("f(1)(b)").unwrap(), expected);
    }

    #[test]
    fn literals() {
        assert_eq!(parse("42").unwrap(), Expression::Literal(Literal::Number(42.0)));
        assert_eq!(
            parse("\"hi there\"").unwrap(),
            Expression::Literal(Literal::String(Rc::from("hi there")))
        );
    }

    #[test]
    fn digits_followed_by_word_characters_form_a_word() {
        assert_eq!(parse("12abc").unwrap(), Expression::Word("12abc".to_owned()));
        assert_eq!(parse("x1").unwrap(), Expression::Word("x1".to_owned()));
    }

    #[test]
    fn integer_then_symbol_is_trailing_input() {
        let (expression, rest) = parse_expression("12+").unwrap();
        assert_eq!(expression, Expression::Literal(Literal::Number(12.0)));
        assert_eq!(rest, "+");
        assert!(parse("12+").is_err());
    }

    #[test]
    fn parse_expression_returns_remainder() {
        let (expression, rest) = parse_expression("  f(x)  # c\n g").unwrap();
        assert_eq!(expression.to_string(), "f(x)");
        assert_eq!(rest, "g");
    }

    #[test]
    fn syntax_errors() {
        for input in ["foo(1,2", "f(1,)", "f(1 2)", "f(,)", "", "\"open", "a b", "(x)", "# comment only"] {
            assert!(parse(input).is_err(), "{:?} should not parse", input);
        }
    }

    #[test]
    fn error_reports_offset() {
        let error = parse("f(1 2)").unwrap_err();
        assert_eq!(error.offset, 4);
        assert!(error.message.contains("`2)`"), "{}", error.message);
    }

    #[test]
    fn display_renders_source() {
        let source = "do(define(x, \"a\"), print(f(x)(1, 2)))";
        assert_eq!(parse(source).unwrap().to_string(), source);
    }

    #[test]
    fn parse_testcases() -> anyhow::Result<()> {
        for testcase in all_testcases() {
            println!("Running testcase {}", testcase);
            for (lineno, (input, expected)) in load_test_pair(testcase)?.into_iter().enumerate() {
                let result = parse(&input).map_err(EggError::from);
                let expected_syntax_error = matches!(expected.into_result(), Err(ErrorKind::SyntaxError));
                match (result, expected_syntax_error) {
                    (Ok(expression), true) => bail!("Testcase {}:{} - expected a syntax error but got {}", testcase, lineno, expression),
                    (Err(error), false) => bail!("Testcase {}:{} - unexpected {}", testcase, lineno, error),
                    _ => {}
                }
            }
        }

        Ok(())
    }
}
