//! Recursive descent parser that turns source text into the box-tree
//! expression representation.
//!
//! Grammar, with words separated by single ASCII spaces:
//!
//! ```text
//! expr        ::= constant | abstraction | application | variable
//! constant    ::= "(const" SP integer ")"
//! abstraction ::= "(lambda" SP "(" name ")" SP expr ")"
//! application ::= "(" expr SP expr ")"
//! variable    ::= name
//! ```
//!
//! The production is picked from the leading word alone, see
//! [`SourceCursor::classify_leading_token`].

use num::BigInt;
use tracing::{debug, trace};

use crate::box_tree_impl::box_tree_ast::Expr;
use crate::lexical_analysis::{
    find_foreign_whitespace, is_integer_literal, LeadingToken, SourceCursor,
};

/// Represents a parsing error.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected end of input. Expected: {expected}.")]
    UnexpectedEndOfInput { expected: String },

    #[error("Unmatched closing paren at position {position}.")]
    UnmatchedClosingParen { position: usize },

    #[error("Unexpected word at position {position}. Expected: {expected}, found: {found:?}.")]
    UnexpectedWord {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected space at position {position}. Expected: {expected}.")]
    UnexpectedSpace { expected: String, position: usize },

    #[error("Malformed integer literal {literal:?} at position {position}.")]
    MalformedInteger { literal: String, position: usize },

    #[error("Missing name at position {position}.")]
    EmptyName { position: usize },

    #[error("Unsupported whitespace at position {position}. Only spaces separate words.")]
    UnsupportedWhitespace { position: usize },

    #[error("Trailing input {found:?} at position {position}.")]
    TrailingInput { found: String, position: usize },
}

// Builds the error for input that does not continue with `expected`. Looks
// past spaces so the message names the offending word rather than a
// separator. Spaces before a closing paren are themselves the offence.
fn unexpected_input(cursor: &SourceCursor, expected: &str) -> ParseError {
    let mut lookahead = cursor.clone();
    lookahead.eat_spaces();

    if lookahead.is_exhausted() {
        return ParseError::UnexpectedEndOfInput {
            expected: String::from(expected),
        };
    }

    if lookahead.position() > cursor.position() && lookahead.peek_char() == Some(')') {
        return ParseError::UnexpectedSpace {
            expected: String::from(expected),
            position: cursor.position(),
        };
    }

    let found = match lookahead.peek_word() {
        Some(word) => String::from(word),
        None => lookahead.peek_char().map(String::from).unwrap_or_default(),
    };

    if let Some(offset) = find_foreign_whitespace(found.as_str()) {
        return ParseError::UnsupportedWhitespace {
            position: lookahead.position() + offset,
        };
    }

    return ParseError::UnexpectedWord {
        expected: String::from(expected),
        found: found,
        position: lookahead.position(),
    };
}

/// Tries to consume the character `expected` at the cursor.
fn try_char(cursor: &mut SourceCursor, expected: char) -> Result<(), ParseError> {
    if cursor.eat_char(expected) {
        return Ok(());
    }

    return Err(unexpected_input(cursor, format!("{:?}", expected).as_str()));
}

/// Tries to consume a word that contains no foreign whitespace.
fn try_word<'a>(cursor: &mut SourceCursor<'a>, what: &str) -> Result<(&'a str, usize), ParseError> {
    let position = cursor.position();

    match cursor.eat_word() {
        Some(word) => {
            if let Some(offset) = find_foreign_whitespace(word) {
                return Err(ParseError::UnsupportedWhitespace {
                    position: position + offset,
                });
            }
            return Ok((word, position));
        }
        None if cursor.is_exhausted() => {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: String::from(what),
            });
        }
        None => return Err(unexpected_input(cursor, what)),
    }
}

/// Tries to parse a name: the formal parameter of a lambda or a variable.
fn try_name<'a>(cursor: &mut SourceCursor<'a>) -> Result<&'a str, ParseError> {
    if cursor.peek_char() == Some(')') {
        return Err(ParseError::EmptyName {
            position: cursor.position(),
        });
    }

    let (name, _) = try_word(cursor, "a name")?;
    return Ok(name);
}

/// Tries to parse an expression that looks like `(const N)`.
fn try_constant_rule(cursor: &mut SourceCursor) -> Result<Expr, ParseError> {
    cursor.eat_word();
    cursor.eat_spaces();

    if cursor.peek_char() == Some(')') {
        return Err(ParseError::MalformedInteger {
            literal: String::new(),
            position: cursor.position(),
        });
    }

    let (literal, position) = try_word(cursor, "an integer literal")?;

    if !is_integer_literal(literal) {
        return Err(ParseError::MalformedInteger {
            literal: String::from(literal),
            position: position,
        });
    }

    let value: BigInt = literal
        .parse()
        .map_err(|_| ParseError::MalformedInteger {
            literal: String::from(literal),
            position: position,
        })?;

    try_char(cursor, ')')?;

    return Ok(Expr::Constant { value: value });
}

/// Tries to parse an expression that looks like `(lambda (X) BODY)`.
fn try_abstraction_rule(cursor: &mut SourceCursor, depth: usize) -> Result<Expr, ParseError> {
    cursor.eat_word();
    cursor.eat_spaces();

    try_char(cursor, '(')?;
    let parameter = try_name(cursor)?;
    try_char(cursor, ')')?;

    let body = try_expr_rule(cursor, depth + 1)?;
    try_char(cursor, ')')?;

    return Ok(Expr::abstraction(parameter, body));
}

/// Tries to parse an expression that looks like `(L R)`. Application is
/// strictly binary, so a third operand is an error.
fn try_application_rule(cursor: &mut SourceCursor, depth: usize) -> Result<Expr, ParseError> {
    try_char(cursor, '(')?;

    let function = try_expr_rule(cursor, depth + 1)?;
    let argument = try_expr_rule(cursor, depth + 1)?;
    try_char(cursor, ')')?;

    return Ok(Expr::application(function, argument));
}

/// Tries to parse an expression that looks like `X`.
fn try_variable_rule(cursor: &mut SourceCursor) -> Result<Expr, ParseError> {
    let name = try_name(cursor)?;
    return Ok(Expr::variable(name));
}

/// Tries to parse according to the production
/// `e -> constant | abstraction | application | variable`.
fn try_expr_rule(cursor: &mut SourceCursor, depth: usize) -> Result<Expr, ParseError> {
    cursor.eat_spaces();

    let leading_token = cursor.classify_leading_token();
    trace!(?leading_token, position = cursor.position(), depth, "try_expr_rule");

    match leading_token {
        LeadingToken::Const => return try_constant_rule(cursor),
        LeadingToken::Lambda => return try_abstraction_rule(cursor, depth),
        LeadingToken::OpenParen => return try_application_rule(cursor, depth),
        LeadingToken::Name => return try_variable_rule(cursor),
        LeadingToken::CloseParen if depth == 0 => {
            return Err(ParseError::UnmatchedClosingParen {
                position: cursor.position(),
            });
        }
        LeadingToken::CloseParen => return Err(unexpected_input(cursor, "an expression")),
        LeadingToken::End => {
            return Err(ParseError::UnexpectedEndOfInput {
                expected: String::from("an expression"),
            });
        }
    }
}

/// Parses a complete program into an expression tree. Spaces may surround the
/// expression; any other leftover input is an error.
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    debug!(source_len = source.len(), "parsing");

    let mut cursor = SourceCursor::new(source);
    let expr = try_expr_rule(&mut cursor, 0)?;

    cursor.eat_spaces();

    if !cursor.is_exhausted() {
        if cursor.peek_char() == Some(')') {
            return Err(ParseError::UnmatchedClosingParen {
                position: cursor.position(),
            });
        }

        return Err(match unexpected_input(&cursor, "end of input") {
            ParseError::UnexpectedWord {
                found, position, ..
            } => ParseError::TrailingInput {
                found: found,
                position: position,
            },
            other_error => other_error,
        });
    }

    debug!(%expr, "parsed");
    return Ok(expr);
}
