//! Logos-based lexer for Go source.
//!
//! Produces a flat token vector with Go's automatic semicolon insertion
//! already applied, so the parser never sees newlines or comments.

use logos::Logos;
use std::path::Path;

use crate::error::{GoenumError, GoenumResult};

/// A token with its kind, text, and 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: GoToken,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// Logos token enum for the Go lexical grammar.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\f]+")]
pub enum GoToken {
    // =========================================================================
    // TRIVIA (consumed by `tokenize`)
    // =========================================================================
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // =========================================================================
    // IDENTIFIERS AND LITERALS
    // =========================================================================
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?[pP][+-]?[0-9_]+")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    Float,

    #[regex(r"[0-9][0-9_]*(\.[0-9_]*)?([eE][+-]?[0-9_]+)?i")]
    #[regex(r"0[xX][0-9a-fA-F_]*(\.[0-9a-fA-F_]*)?[pP][+-]?[0-9_]+i")]
    Imag,

    #[regex(r"'(\\[^\n]|[^\\'\n])+'")]
    Rune,

    #[regex(r#""(\\[^\n]|[^\\"\n])*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    // =========================================================================
    // OPERATORS AND PUNCTUATION (longest match wins)
    // =========================================================================
    #[token("...")]
    Ellipsis,
    #[token("&^=")]
    AndNotAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    QuoAssign,
    #[token("%=")]
    RemAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,
    #[token("&^")]
    AndNot,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&&")]
    LogicalAnd,
    #[token("||")]
    LogicalOr,
    #[token("<-")]
    Arrow,
    #[token("++")]
    Inc,
    #[token("--")]
    Dec,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token(":=")]
    Define,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
}

impl GoToken {
    /// Whether a line ending right after this token gets an implicit `;`.
    fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Int
                | Self::Float
                | Self::Imag
                | Self::Rune
                | Self::String
                | Self::RawString
                | Self::Break
                | Self::Continue
                | Self::Fallthrough
                | Self::Return
                | Self::Inc
                | Self::Dec
                | Self::RParen
                | Self::RBracket
                | Self::RBrace
        )
    }
}

/// Consume a block comment body up to and including the closing `*/`.
/// An unterminated comment is a lex error.
fn block_comment(lex: &mut logos::Lexer<GoToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Maps byte offsets to 1-based line/column pairs.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = Vec::with_capacity(source.len() / 32 + 1);
        starts.push(0);
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn position(&self, source: &str, offset: usize) -> (usize, usize) {
        let line = match self.starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.starts[line];
        let column = source[line_start..offset].chars().count() + 1;
        (line + 1, column)
    }
}

/// Tokenize Go source, applying automatic semicolon insertion.
///
/// The returned vector has no trivia. An implicit `;` token has empty
/// text and sits at the position of the newline (or end of input) that
/// produced it.
///
/// A leading byte order mark is ignored, as the Go toolchain does.
pub fn tokenize(path: &Path, source: &str) -> GoenumResult<Vec<Token>> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let index = LineIndex::new(source);
    let mut lexer = GoToken::lexer(source);
    let mut tokens: Vec<Token> = Vec::with_capacity(source.len() / 4);

    let needs_semicolon = |tokens: &Vec<Token>| {
        tokens
            .last()
            .is_some_and(|t| t.kind.ends_statement())
    };

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let (line, column) = index.position(source, span.start);
        let kind = match result {
            Ok(kind) => kind,
            Err(()) => {
                return Err(GoenumError::parse_at(
                    path,
                    format!("unexpected character sequence {:?}", lexer.slice()),
                    line,
                    column,
                ));
            }
        };

        match kind {
            GoToken::LineComment => {}
            GoToken::BlockComment if !lexer.slice().contains('\n') => {}
            GoToken::Newline | GoToken::BlockComment => {
                if needs_semicolon(&tokens) {
                    tokens.push(Token {
                        kind: GoToken::Semicolon,
                        text: String::new(),
                        line,
                        column,
                    });
                }
            }
            _ => tokens.push(Token {
                kind,
                text: lexer.slice().to_string(),
                line,
                column,
            }),
        }
    }

    if needs_semicolon(&tokens) {
        let (line, column) = index.position(source, source.len());
        tokens.push(Token {
            kind: GoToken::Semicolon,
            text: String::new(),
            line,
            column,
        });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn kinds(src: &str) -> Vec<GoToken> {
        tokenize(&PathBuf::from("test.go"), src)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("const Foo"),
            vec![GoToken::Const, GoToken::Ident, GoToken::Semicolon]
        );
        assert_eq!(kinds("constant"), vec![GoToken::Ident, GoToken::Semicolon]);
    }

    #[test]
    fn test_semicolon_insertion() {
        let src = "const (\n\tA Kind = iota\n\tB\n)\n";
        assert_eq!(
            kinds(src),
            vec![
                GoToken::Const,
                GoToken::LParen,
                GoToken::Ident,
                GoToken::Ident,
                GoToken::Assign,
                GoToken::Ident,
                GoToken::Semicolon,
                GoToken::Ident,
                GoToken::Semicolon,
                GoToken::RParen,
                GoToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        assert_eq!(
            kinds("a +\nb"),
            vec![GoToken::Ident, GoToken::Plus, GoToken::Ident, GoToken::Semicolon]
        );
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(
            kinds("A // trailing\n/* inline */ B"),
            vec![GoToken::Ident, GoToken::Semicolon, GoToken::Ident, GoToken::Semicolon]
        );
        // a block comment spanning lines acts as a newline
        assert_eq!(
            kinds("A /* one\ntwo */ B"),
            vec![GoToken::Ident, GoToken::Semicolon, GoToken::Ident, GoToken::Semicolon]
        );
    }

    #[test]
    fn test_license_header_and_starred_comments() {
        let src = "/*\n * Copyright 2024 Example\n */\npackage p\n/** doc **/\nconst A = 1 /* first */\n";
        assert_eq!(
            kinds(src),
            vec![
                GoToken::Package,
                GoToken::Ident,
                GoToken::Semicolon,
                GoToken::Const,
                GoToken::Ident,
                GoToken::Assign,
                GoToken::Int,
                GoToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_unterminated_block_comment_is_error() {
        let err = tokenize(&PathBuf::from("bad.go"), "package p\n/* open").unwrap_err();
        assert!(matches!(err, GoenumError::Parse { line: Some(2), .. }));
    }

    #[test]
    fn test_leading_bom_ignored() {
        let tokens = tokenize(&PathBuf::from("bom.go"), "\u{feff}package p\nconst X = 1").unwrap();
        assert_eq!(tokens[0].kind, GoToken::Package);
        let x = tokens.iter().find(|t| t.text == "X").unwrap();
        assert_eq!((x.line, x.column), (2, 7));
    }

    #[test]
    fn test_hex_floats() {
        assert_eq!(
            kinds("0x1p-2 0X.8P+1 0x1.fp3i 0x1F"),
            vec![
                GoToken::Float,
                GoToken::Float,
                GoToken::Imag,
                GoToken::Int,
                GoToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"0x1F 0o17 0b101 1_000 1.5 'a' "s\"q" `raw`"#),
            vec![
                GoToken::Int,
                GoToken::Int,
                GoToken::Int,
                GoToken::Int,
                GoToken::Float,
                GoToken::Rune,
                GoToken::String,
                GoToken::RawString,
                GoToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            kinds("a &^ b << 2"),
            vec![
                GoToken::Ident,
                GoToken::AndNot,
                GoToken::Ident,
                GoToken::Shl,
                GoToken::Int,
                GoToken::Semicolon,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize(&PathBuf::from("test.go"), "package p\n\nconst X = 1").unwrap();
        let x = tokens.iter().find(|t| t.text == "X").unwrap();
        assert_eq!((x.line, x.column), (3, 7));
    }

    #[test]
    fn test_unknown_character_is_error() {
        let err = tokenize(&PathBuf::from("bad.go"), "package p\nvar x = @").unwrap_err();
        match err {
            GoenumError::Parse { line, column, .. } => {
                assert_eq!(line, Some(2));
                assert_eq!(column, Some(9));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
