use logos::{Logos, SpannedIter};

pub(super) struct Token {
    pub(super) kind: TokenKind,
    pub(super) span: logos::Span,
}

pub(super) struct TokenIter<'a> {
    iter: SpannedIter<'a, LogosTokenKind>,
}

impl<'a> TokenIter<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            iter: LogosTokenKind::lexer(input).spanned(),
        }
    }
}

impl<'a> Iterator for TokenIter<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let (kind, span) = match self.iter.next()? {
            (Ok(LogosTokenKind::LParen), span) => (TokenKind::LParen, span),
            (Ok(LogosTokenKind::RParen), span) => (TokenKind::RParen, span),
            // Strip the quotes, the parser only sees the contents
            (Ok(LogosTokenKind::QuotedString), span) => {
                (TokenKind::String, (span.start + 1)..(span.end - 1))
            }
            (Ok(LogosTokenKind::String), span) => (TokenKind::String, span),
            (Ok(LogosTokenKind::WS), _) => unreachable!(),
            (Err(_), span) => (TokenKind::Error, span),
        };
        Some(Token { kind, span })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum TokenKind {
    LParen,
    RParen,
    String,
    Error,
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
enum LogosTokenKind {
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[regex(r#""([^"\\]|\\["\\bnfrt])*""#)]
    QuotedString,
    #[regex(r#"[^"() \t\r\f\n]+"#)]
    String,
    #[regex(r"[ \t\r\f\n]+", logos::skip)]
    WS,
}

/// Resolves the backslash escapes of a quoted string
pub(super) fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
