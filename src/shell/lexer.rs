use std::{iter::Peekable, str::Chars};

use crate::{
    column_family::Properties,
    util::{Result, Status},
};

/// Lexical token of a command's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `'...'` with escapes resolved
    Str(String),
    /// Bare word or number, e.g. `NAME` or `3`
    Word(String),
    Comma,
    LBrace,
    RBrace,
    /// `=>`
    Arrow,
}

/// One top-level argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Str(String),
    /// `{KEY => 'value', ...}` in source order
    Map(Properties),
}

impl Arg {
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Str(_) => "a quoted string",
            Arg::Map(_) => "a {...} map",
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')
}

/// Split `input` into tokens.
///
/// Inside a quoted string `\'` yields a quote and `\\` a backslash; any
/// other backslash is kept literally.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '{' => {
                chars.next();
                tokens.push(Token::LBrace);
            }
            '}' => {
                chars.next();
                tokens.push(Token::RBrace);
            }
            '=' => {
                chars.next();
                if chars.next_if_eq(&'>').is_none() {
                    return Err(Status::invalid_argument("Expected '=>' after '='"));
                }
                tokens.push(Token::Arrow);
            }
            '\'' => {
                chars.next();
                tokens.push(Token::Str(quoted(&mut chars)?));
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|c| is_word_char(*c)) {
                    word.push(c);
                }
                tokens.push(Token::Word(word));
            }
            other => {
                return Err(Status::invalid_argument(format!(
                    "Unexpected character '{other}'"
                )));
            }
        }
    }

    Ok(tokens)
}

/// Read the rest of a quoted string; the opening quote is consumed.
fn quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(Status::invalid_argument("Unterminated quoted string")),
            Some('\'') => return Ok(out),
            Some('\\') => match chars.next_if(|&c| matches!(c, '\'' | '\\')) {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            },
            Some(c) => out.push(c),
        }
    }
}

/// Parse a comma-separated argument list.
///
/// ```text
/// args  := ε | arg (',' arg)*
/// arg   := STR | map
/// map   := '{' (pair (',' pair)*)? '}'
/// pair  := (WORD | STR) '=>' (STR | WORD)
/// ```
pub fn parse_args(input: &str) -> Result<Vec<Arg>> {
    let tokens = tokenize(input)?;
    let mut iter = tokens.into_iter().peekable();
    let mut args = Vec::new();

    if iter.peek().is_none() {
        return Ok(args);
    }
    loop {
        let arg = match iter.next() {
            Some(Token::Str(s)) => Arg::Str(s),
            Some(Token::LBrace) => Arg::Map(parse_map(&mut iter)?),
            Some(Token::Word(w)) => {
                return Err(Status::invalid_argument(format!(
                    "Expected a quoted string, found '{w}'"
                )));
            }
            Some(token) => return Err(unexpected(&token)),
            None => return Err(Status::invalid_argument("Expected an argument after ','")),
        };
        args.push(arg);

        match iter.next() {
            None => return Ok(args),
            Some(Token::Comma) => {}
            Some(token) => return Err(unexpected(&token)),
        }
    }
}

fn parse_map(iter: &mut Peekable<impl Iterator<Item = Token>>) -> Result<Properties> {
    let mut pairs = Properties::new();
    if iter.next_if_eq(&Token::RBrace).is_some() {
        return Ok(pairs);
    }

    loop {
        let key = match iter.next() {
            Some(Token::Word(w)) | Some(Token::Str(w)) => w,
            Some(token) => return Err(unexpected(&token)),
            None => return Err(unterminated_map()),
        };
        match iter.next() {
            Some(Token::Arrow) => {}
            Some(token) => return Err(unexpected(&token)),
            None => return Err(unterminated_map()),
        }
        let value = match iter.next() {
            Some(Token::Str(v)) | Some(Token::Word(v)) => v,
            Some(token) => return Err(unexpected(&token)),
            None => return Err(unterminated_map()),
        };
        pairs.push((key, value));

        match iter.next() {
            Some(Token::Comma) => {}
            Some(Token::RBrace) => return Ok(pairs),
            Some(token) => return Err(unexpected(&token)),
            None => return Err(unterminated_map()),
        }
    }
}

fn unexpected(token: &Token) -> Status {
    let shown = match token {
        Token::Str(s) => format!("'{s}'"),
        Token::Word(w) => w.clone(),
        Token::Comma => ",".to_string(),
        Token::LBrace => "{".to_string(),
        Token::RBrace => "}".to_string(),
        Token::Arrow => "=>".to_string(),
    };
    Status::invalid_argument(format!("Unexpected token {shown}"))
}

fn unterminated_map() -> Status {
    Status::invalid_argument("Unterminated '{' map")
}
