//! Lightweight C header scanner.
//!
//! Finds the names a header makes visible without running a preprocessor:
//! `#define` targets, enumerators, and functions declared or defined at file scope.
//! Conditional blocks are not evaluated, so a name defined under any branch counts.

use std::collections::BTreeSet;

const NOT_FUNCTIONS: &[&str] = &[
    "if",
    "for",
    "while",
    "switch",
    "return",
    "sizeof",
    "typeof",
    "__typeof__",
    "alignof",
    "_Alignof",
    "__attribute__",
    "_Static_assert",
    "static_assert",
    "defined",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Punct(char),
    Literal,
}

/// Every symbol name the header text defines, sorted and deduplicated.
#[must_use]
pub fn symbols(text: &str) -> BTreeSet<String> {
    let stripped = strip_comments(text).replace("\\\r\n", " ").replace("\\\n", " ");
    let mut found = BTreeSet::new();
    let mut code = String::with_capacity(stripped.len());

    for line in stripped.lines() {
        match line.trim_start().strip_prefix('#') {
            Some(directive) => found.extend(defined_name(directive)),
            None => {
                code.push_str(line);
                code.push('\n');
            },
        }
    }

    scan_code(&tokenize(&code), &mut found);
    found
}

fn defined_name(directive: &str) -> Option<String> {
    let rest = directive.trim_start().strip_prefix("define")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    let name = &rest[..end];
    name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_').then(|| name.to_owned())
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replaces comments with a single space, keeping line breaks and string literals.
fn strip_comments(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let (mut i, mut copied) = (0, 0);

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => i = skip_quoted(bytes, i),
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&text[copied..i]);
                let end = text[i + 2..].find("*/").map_or(text.len(), |p| i + 2 + p + 2);
                out.push(' ');
                out.extend(text[i..end].chars().filter(|c| *c == '\n'));
                (i, copied) = (end, end);
            },
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&text[copied..i]);
                let end = text[i..].find('\n').map_or(text.len(), |p| i + p);
                (i, copied) = (end, end);
            },
            _ => i += 1,
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Index just past the literal starting at `start`; unterminated literals end at the line.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn tokenize(code: &str) -> Vec<Token<'_>> {
    let bytes = code.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
        } else if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && is_ident_char(char::from(bytes[i])) {
                i += 1;
            }
            tokens.push(Token::Ident(&code[start..i]));
        } else if b.is_ascii_digit() {
            while i < bytes.len() && (is_ident_char(char::from(bytes[i])) || bytes[i] == b'.') {
                i += 1;
            }
            tokens.push(Token::Literal);
        } else if b == b'"' || b == b'\'' {
            i = skip_quoted(bytes, i);
            tokens.push(Token::Literal);
        } else {
            tokens.push(Token::Punct(char::from(b)));
            i += 1;
        }
    }

    tokens
}

fn scan_code(tokens: &[Token<'_>], found: &mut BTreeSet<String>) {
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Punct('{') => depth += 1,
            Token::Punct('}') => depth = depth.saturating_sub(1),
            Token::Ident("enum") => {
                let mut open = i + 1;
                if matches!(tokens.get(open), Some(Token::Ident(_))) {
                    open += 1;
                }
                if tokens.get(open) == Some(&Token::Punct('{')) {
                    i = enumerators(tokens, open, found);
                    continue;
                }
            },
            Token::Ident(name) if depth == 0 && is_declaration(tokens, i) => {
                found.insert(name.to_owned());
            },
            _ => {},
        }
        i += 1;
    }
}

/// `type name(...)` followed by `;` or a body, at file scope.
fn is_declaration(tokens: &[Token<'_>], at: usize) -> bool {
    let Token::Ident(name) = tokens[at] else {
        return false;
    };
    if NOT_FUNCTIONS.contains(&name) || tokens.get(at + 1) != Some(&Token::Punct('(')) {
        return false;
    }
    let typed = at > 0 && matches!(tokens[at - 1], Token::Ident(_) | Token::Punct('*'));
    let Some(close) = closing(tokens, at + 1) else {
        return false;
    };

    typed && matches!(tokens.get(close + 1), Some(Token::Punct(';' | '{')))
}

/// Index of the bracket closing the one at `open`.
fn closing(tokens: &[Token<'_>], open: usize) -> Option<usize> {
    let mut nesting = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token {
            Token::Punct('(' | '[' | '{') => nesting += 1,
            Token::Punct(')' | ']' | '}') => {
                nesting -= 1;
                if nesting == 0 {
                    return Some(open + offset);
                }
            },
            _ => {},
        }
    }
    None
}

/// Collects enumerator names from the body opening at `open`; returns the index after it.
fn enumerators(tokens: &[Token<'_>], open: usize, found: &mut BTreeSet<String>) -> usize {
    let Some(close) = closing(tokens, open) else {
        return tokens.len();
    };

    let mut nesting = 0usize;
    let mut expect_name = true;
    for token in &tokens[open + 1..close] {
        match token {
            Token::Punct('(' | '[' | '{') => nesting += 1,
            Token::Punct(')' | ']' | '}') => nesting = nesting.saturating_sub(1),
            Token::Punct(',') if nesting == 0 => expect_name = true,
            Token::Ident(name) if nesting == 0 && expect_name => {
                found.insert((*name).to_owned());
                expect_name = false;
            },
            _ => {},
        }
    }

    close + 1
}
