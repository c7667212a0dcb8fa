//! Tokenizer for schema source text
//!
//! Never fails: bytes that do not start a known token become
//! single-character [`TokenKind::Other`] tokens for the parser to wrap.

use super::language::{Keyword, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Keyword(Keyword),
    Number,
    Str,
    Comment,
    Colon,
    Pipe,
    Hash,
    Star,
    Equals,
    Plus,
    Amp,
    Minus,
    Arrow,
    Dot,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }

    /// Identifier or non-statement keyword, i.e. something usable as a name.
    pub fn is_name(&self) -> bool {
        match self.kind {
            TokenKind::Ident => true,
            TokenKind::Keyword(keyword) => !keyword.starts_statement(),
            _ => false,
        }
    }
}

pub(crate) fn tokenize(source: &str, language: &Language) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];

        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let kind = match b {
            b'/' if bytes.get(pos + 1) == Some(&b'/') => {
                pos = line_end(bytes, pos);
                TokenKind::Comment
            }
            b'/' if bytes.get(pos + 1) == Some(&b'*') => {
                pos = match find(bytes, pos + 2, b"*/") {
                    Some(close) => close + 2,
                    None => bytes.len(),
                };
                TokenKind::Comment
            }
            b'"' | b'\'' => {
                pos = scan_string(bytes, pos, b);
                TokenKind::Str
            }
            b if is_ident_start(b) => {
                pos = scan_identifier(bytes, pos);
                match language.keyword(&source[start..pos]) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Ident,
                }
            }
            b if b.is_ascii_digit() => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                TokenKind::Number
            }
            b'-' if bytes.get(pos + 1) == Some(&b'>') => {
                pos += 2;
                TokenKind::Arrow
            }
            _ => {
                pos += 1;
                match b {
                    b':' => TokenKind::Colon,
                    b'|' => TokenKind::Pipe,
                    b'#' => TokenKind::Hash,
                    b'*' => TokenKind::Star,
                    b'=' => TokenKind::Equals,
                    b'+' => TokenKind::Plus,
                    b'&' => TokenKind::Amp,
                    b'-' => TokenKind::Minus,
                    b'.' => TokenKind::Dot,
                    b',' => TokenKind::Comma,
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b'{' => TokenKind::LBrace,
                    b'}' => TokenKind::RBrace,
                    _ => {
                        // Keep multi-byte characters whole so spans stay on char boundaries
                        while pos < bytes.len() && !source.is_char_boundary(pos) {
                            pos += 1;
                        }
                        TokenKind::Other
                    }
                }
            }
        };

        tokens.push(Token {
            kind,
            start,
            end: pos,
        });
    }

    tokens
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Identifiers may carry namespace prefixes: `org/team/document`.
fn scan_identifier(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < bytes.len() && is_ident_continue(bytes[pos]) {
            pos += 1;
        }
        let continues_namespace = bytes.get(pos) == Some(&b'/')
            && bytes.get(pos + 1).is_some_and(|&next| is_ident_start(next));
        if !continues_namespace {
            return pos;
        }
        pos += 1;
    }
}

/// Strings end at the matching quote or, when unterminated, at end of line.
fn scan_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return pos,
            b if b == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |offset| from + offset)
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| from + offset)
}
