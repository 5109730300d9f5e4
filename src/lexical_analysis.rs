//! Character-level scanning over lambda-calculus source text.
//!
//! The surface syntax has no separate token stream: the parser looks at the
//! leading *word* of the remaining input (a maximal run of characters that
//! are neither a space nor a closing paren) and decides which production to
//! take from it. Only the single ASCII space separates words.

use lazy_static::lazy_static;
use regex::Regex;

/// Keyword that opens an integer constant.
pub const CONST_KEYWORD: &str = "(const";

/// Keyword that opens a lambda abstraction.
pub const LAMBDA_KEYWORD: &str = "(lambda";

// Patterns used to recognize words and separators at the cursor.
lazy_static! {
    static ref WORD_REGEX: Regex =
        Regex::new(r"^[^ )]+").expect("Unable to compile word regex.");
    static ref SPACES_REGEX: Regex =
        Regex::new(r"^ +").expect("Unable to compile spaces regex.");
    static ref FOREIGN_WHITESPACE_REGEX: Regex =
        Regex::new(r"[\s&&[^ ]]").expect("Unable to compile foreign whitespace regex.");
    static ref INTEGER_REGEX: Regex =
        Regex::new(r"^[+-]?[0-9]+$").expect("Unable to compile integer regex.");
}

/// The classes of leading token that select a grammar production.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum LeadingToken {
    Const,
    Lambda,
    OpenParen,
    Name,
    CloseParen,
    End,
}

/// A read position inside a source string.
#[derive(Debug, Clone)]
pub struct SourceCursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> SourceCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        return SourceCursor {
            source: source,
            position: 0,
        };
    }

    /// Byte offset of the cursor into the original source.
    pub fn position(&self) -> usize {
        return self.position;
    }

    /// The not-yet-consumed input.
    pub fn rest(&self) -> &'a str {
        return &self.source[self.position..];
    }

    pub fn is_exhausted(&self) -> bool {
        return self.position >= self.source.len();
    }

    pub fn peek_char(&self) -> Option<char> {
        return self.rest().chars().next();
    }

    /// Returns the word at the cursor without consuming it.
    pub fn peek_word(&self) -> Option<&'a str> {
        return WORD_REGEX.find(self.rest()).map(|word| word.as_str());
    }

    /// Consumes `expected` if it is the next character.
    pub fn eat_char(&mut self, expected: char) -> bool {
        match self.peek_char() {
            Some(found) if found == expected => {
                self.position += found.len_utf8();
                return true;
            }
            _ => return false,
        }
    }

    /// Consumes and returns the word at the cursor.
    pub fn eat_word(&mut self) -> Option<&'a str> {
        let word = self.peek_word()?;
        self.position += word.len();
        return Some(word);
    }

    /// Consumes a run of ASCII spaces, returning how many were eaten.
    pub fn eat_spaces(&mut self) -> usize {
        let eaten = SPACES_REGEX
            .find(self.rest())
            .map_or(0, |spaces| spaces.len());
        self.position += eaten;
        return eaten;
    }

    /// Decides which production the input at the cursor starts.
    pub fn classify_leading_token(&self) -> LeadingToken {
        match self.peek_word() {
            Some(CONST_KEYWORD) => return LeadingToken::Const,
            Some(LAMBDA_KEYWORD) => return LeadingToken::Lambda,
            Some(word) if word.starts_with('(') => return LeadingToken::OpenParen,
            Some(_) => return LeadingToken::Name,
            None => {}
        }

        match self.peek_char() {
            Some(')') => return LeadingToken::CloseParen,
            // WORD_REGEX only fails on a space, a paren or the end of input,
            // and callers eat spaces before classifying.
            Some(_) => return LeadingToken::Name,
            None => return LeadingToken::End,
        }
    }
}

/// Finds the byte offset of the first whitespace character in `word` that is
/// not the ASCII space separator.
pub fn find_foreign_whitespace(word: &str) -> Option<usize> {
    return FOREIGN_WHITESPACE_REGEX
        .find(word)
        .map(|whitespace| whitespace.start());
}

/// Checks that `word` is a signed decimal integer literal.
pub fn is_integer_literal(word: &str) -> bool {
    return INTEGER_REGEX.is_match(word);
}
