//! Recursive-descent parser for the top level of a Go file.
//!
//! Constant declarations are parsed completely (identifier lists, type
//! references and full expressions). Everything the extractor never looks
//! at is skipped structurally by bracket matching: function bodies, var
//! initializers, and composite type bodies.

use std::path::{Path, PathBuf};

use super::ast::*;
use super::lexer::{GoToken, Token};
use crate::error::{GoenumError, GoenumResult};

/// Parse a token stream produced by [`super::lexer::tokenize`].
///
/// The returned file has an empty scope; see [`super::resolve`].
pub fn parse_file(path: &Path, tokens: Vec<Token>) -> GoenumResult<GoFile> {
    Parser::new(path, tokens).parse_file()
}

struct Parser {
    path: PathBuf,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(path: &Path, tokens: Vec<Token>) -> Self {
        Self {
            path: path.to_path_buf(),
            tokens,
            pos: 0,
        }
    }

    // ------------------------------------------------------------------
    // Token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<GoToken> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_nth(&self, n: usize) -> Option<GoToken> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    fn bump(&mut self) -> GoenumResult<Token> {
        match self.tokens.get(self.pos) {
            Some(tok) => {
                self.pos += 1;
                Ok(tok.clone())
            }
            None => Err(self.error_here("unexpected end of file")),
        }
    }

    fn eat(&mut self, kind: GoToken) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: GoToken, what: &str) -> GoenumResult<Token> {
        if self.peek() == Some(kind) {
            self.bump()
        } else {
            Err(self.error_here(&format!("expected {}", what)))
        }
    }

    fn error_here(&self, message: &str) -> GoenumError {
        let tok = self.tokens.get(self.pos).or_else(|| self.tokens.last());
        match tok {
            Some(t) => {
                let found = if self.pos >= self.tokens.len() {
                    "end of file".to_string()
                } else if t.text.is_empty() {
                    "newline".to_string()
                } else {
                    format!("'{}'", t.text)
                };
                GoenumError::parse_at(
                    &self.path,
                    format!("{}, found {}", message, found),
                    t.line,
                    t.column,
                )
            }
            None => GoenumError::parse(&self.path, message),
        }
    }

    /// Statement terminator: `;` or end of file.
    fn expect_terminator(&mut self) -> GoenumResult<()> {
        match self.peek() {
            Some(GoToken::Semicolon) => {
                self.pos += 1;
                Ok(())
            }
            None => Ok(()),
            _ => Err(self.error_here("expected ';'")),
        }
    }

    // ------------------------------------------------------------------
    // File structure
    // ------------------------------------------------------------------

    fn parse_file(mut self) -> GoenumResult<GoFile> {
        self.expect(GoToken::Package, "'package'")?;
        let package = self.expect(GoToken::Ident, "package name")?.text;
        self.expect_terminator()?;

        let mut decls = Vec::new();
        let mut imports = Vec::new();

        while let Some(kind) = self.peek() {
            let decl = match kind {
                GoToken::Semicolon => {
                    self.pos += 1;
                    continue;
                }
                GoToken::Import => self.parse_gen_decl(DeclKeyword::Import)?,
                GoToken::Const => self.parse_gen_decl(DeclKeyword::Const)?,
                GoToken::Var => self.parse_gen_decl(DeclKeyword::Var)?,
                GoToken::Type => self.parse_gen_decl(DeclKeyword::Type)?,
                GoToken::Func => self.parse_func_decl()?,
                _ => return Err(self.error_here("non-declaration statement outside function body")),
            };
            self.expect_terminator()?;

            if let Decl::Gen(g) = &decl {
                for spec in &g.specs {
                    if let Spec::Import(i) = spec {
                        imports.push(i.clone());
                    }
                }
            }
            decls.push(decl);
        }

        Ok(GoFile {
            path: self.path,
            package,
            imports,
            decls,
            scope: Scope::default(),
        })
    }

    fn parse_gen_decl(&mut self, keyword: DeclKeyword) -> GoenumResult<Decl> {
        let line = self.bump()?.line;
        let mut specs = Vec::new();
        let grouped = self.eat(GoToken::LParen);

        if grouped {
            loop {
                if self.eat(GoToken::RParen) {
                    break;
                }
                specs.push(self.parse_spec(keyword)?);
                if !self.eat(GoToken::Semicolon) {
                    self.expect(GoToken::RParen, "')'")?;
                    break;
                }
            }
        } else {
            specs.push(self.parse_spec(keyword)?);
        }

        Ok(Decl::Gen(GenDecl {
            keyword,
            specs,
            grouped,
            line,
        }))
    }

    fn parse_spec(&mut self, keyword: DeclKeyword) -> GoenumResult<Spec> {
        match keyword {
            DeclKeyword::Import => self.parse_import_spec().map(Spec::Import),
            DeclKeyword::Type => self.parse_type_spec().map(Spec::Type),
            DeclKeyword::Const => self.parse_value_spec(true).map(Spec::Value),
            DeclKeyword::Var => self.parse_value_spec(false).map(Spec::Value),
        }
    }

    fn parse_import_spec(&mut self) -> GoenumResult<ImportSpec> {
        let alias = match self.peek() {
            Some(GoToken::Ident) | Some(GoToken::Dot) => Some(self.bump()?.text),
            _ => None,
        };
        let path = match self.peek() {
            Some(GoToken::String) => {
                let tok = self.bump()?;
                self.decode_string(&tok)?
            }
            Some(GoToken::RawString) => raw_string_body(&self.bump()?.text),
            _ => return Err(self.error_here("expected import path")),
        };
        Ok(ImportSpec { alias, path })
    }

    fn parse_type_spec(&mut self) -> GoenumResult<TypeSpec> {
        let name = self.parse_ident()?;
        if self.peek() == Some(GoToken::LBracket) {
            // Generic parameter list or array type; either way the
            // underlying type is not a basic one.
            let text = self.collect_type_text(Vec::new());
            return Ok(TypeSpec {
                name,
                alias: false,
                ty: TypeExpr::Other(text),
            });
        }
        let alias = self.eat(GoToken::Assign);
        let ty = self.parse_type()?;
        Ok(TypeSpec { name, alias, ty })
    }

    fn parse_value_spec(&mut self, is_const: bool) -> GoenumResult<ValueSpec> {
        let line = self
            .tokens
            .get(self.pos)
            .map(|t| t.line)
            .unwrap_or_default();
        let names = self.parse_ident_list()?;

        let ty = match self.peek() {
            Some(GoToken::Assign) | Some(GoToken::Semicolon) | Some(GoToken::RParen) | None => None,
            _ => Some(self.parse_type()?),
        };

        let mut values = Vec::new();
        if self.eat(GoToken::Assign) {
            if is_const {
                values = self.parse_expr_list()?;
            } else {
                self.skip_to_spec_end();
            }
        }

        Ok(ValueSpec {
            names,
            ty,
            values,
            line,
        })
    }

    fn parse_func_decl(&mut self) -> GoenumResult<Decl> {
        let line = self.bump()?.line;

        let receiver = if self.peek() == Some(GoToken::LParen) {
            Some(self.parse_receiver()?)
        } else {
            None
        };
        let name = self.expect(GoToken::Ident, "function name")?.text;

        // Signature, then an optional body.
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => break,
                Some(GoToken::Semicolon) if depth == 0 => break,
                Some(GoToken::LBrace) if depth == 0 => {
                    self.skip_braces()?;
                    break;
                }
                Some(GoToken::Struct) | Some(GoToken::Interface) => {
                    self.pos += 1;
                    if self.peek() == Some(GoToken::LBrace) {
                        self.skip_braces()?;
                    }
                }
                Some(GoToken::LParen) | Some(GoToken::LBracket) => {
                    depth += 1;
                    self.pos += 1;
                }
                Some(GoToken::RParen) | Some(GoToken::RBracket) => {
                    depth = depth.saturating_sub(1);
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }

        Ok(Decl::Func(FuncDecl {
            name,
            receiver,
            line,
        }))
    }

    /// `( [name] [*]Type[TypeParams] )`, returning the receiver type name.
    fn parse_receiver(&mut self) -> GoenumResult<String> {
        self.expect(GoToken::LParen, "'('")?;
        let mut bracket_depth = 0usize;
        let mut last_ident = None;
        loop {
            let tok = self.bump()?;
            match tok.kind {
                GoToken::RParen if bracket_depth == 0 => break,
                GoToken::LBracket => bracket_depth += 1,
                GoToken::RBracket => bracket_depth = bracket_depth.saturating_sub(1),
                GoToken::Ident if bracket_depth == 0 => last_ident = Some(tok.text),
                _ => {}
            }
        }
        last_ident.ok_or_else(|| self.error_here("expected receiver type"))
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type(&mut self) -> GoenumResult<TypeExpr> {
        if self.peek() != Some(GoToken::Ident) {
            if self.at_type_end(0) {
                return Err(self.error_here("expected type"));
            }
            return Ok(TypeExpr::Other(self.collect_type_text(Vec::new())));
        }

        let first = self.bump()?.text;
        let ty = if self.peek() == Some(GoToken::Dot) && self.peek_nth(1) == Some(GoToken::Ident) {
            self.pos += 1;
            let name = self.bump()?.text;
            TypeExpr::Qualified {
                package: first,
                name,
            }
        } else {
            TypeExpr::Named(first)
        };

        if self.peek() == Some(GoToken::LBracket) {
            // Instantiated generic type such as `Set[int]`.
            let prefix = vec![ty.to_string()];
            return Ok(TypeExpr::Other(self.collect_type_text(prefix)));
        }
        Ok(ty)
    }

    fn at_type_end(&self, depth: usize) -> bool {
        depth == 0
            && matches!(
                self.peek(),
                None | Some(GoToken::Semicolon)
                    | Some(GoToken::RParen)
                    | Some(GoToken::Assign)
                    | Some(GoToken::Comma)
            )
    }

    /// Consume a type expression of arbitrary shape, returning its text.
    fn collect_type_text(&mut self, mut parts: Vec<String>) -> String {
        let mut depth = 0usize;
        while !self.at_type_end(depth) {
            let Some(tok) = self.tokens.get(self.pos) else {
                break;
            };
            match tok.kind {
                GoToken::LParen | GoToken::LBracket | GoToken::LBrace => depth += 1,
                GoToken::RParen | GoToken::RBracket | GoToken::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            if !tok.text.is_empty() {
                parts.push(tok.text.clone());
            }
            self.pos += 1;
        }
        parts.join(" ")
    }

    // ------------------------------------------------------------------
    // Skipping
    // ------------------------------------------------------------------

    /// Skip a `{ ... }` block, the cursor sitting on `{`.
    fn skip_braces(&mut self) -> GoenumResult<()> {
        self.expect(GoToken::LBrace, "'{'")?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump()?.kind {
                GoToken::LBrace => depth += 1,
                GoToken::RBrace => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip the rest of a var spec up to `;` or the group's `)`.
    fn skip_to_spec_end(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            match kind {
                GoToken::Semicolon | GoToken::RParen if depth == 0 => return,
                GoToken::LParen | GoToken::LBracket | GoToken::LBrace => depth += 1,
                GoToken::RParen | GoToken::RBracket | GoToken::RBrace => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    // ------------------------------------------------------------------
    // Identifiers and expressions
    // ------------------------------------------------------------------

    fn parse_ident(&mut self) -> GoenumResult<Ident> {
        let tok = self.expect(GoToken::Ident, "identifier")?;
        Ok(Ident {
            name: tok.text,
            line: tok.line,
            column: tok.column,
        })
    }

    fn parse_ident_list(&mut self) -> GoenumResult<Vec<Ident>> {
        let mut names = vec![self.parse_ident()?];
        while self.eat(GoToken::Comma) {
            names.push(self.parse_ident()?);
        }
        Ok(names)
    }

    fn parse_expr_list(&mut self) -> GoenumResult<Vec<Expr>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(GoToken::Comma) {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> GoenumResult<Expr> {
        self.parse_binary(1)
    }

    fn parse_binary(&mut self, min_prec: u8) -> GoenumResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = self.peek().and_then(binary_op) {
            if op.precedence() < min_prec {
                break;
            }
            self.pos += 1;
            let rhs = self.parse_binary(op.precedence() + 1)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> GoenumResult<Expr> {
        let op = match self.peek() {
            Some(GoToken::Plus) => UnaryOp::Plus,
            Some(GoToken::Minus) => UnaryOp::Neg,
            Some(GoToken::Bang) => UnaryOp::Not,
            Some(GoToken::Caret) => UnaryOp::Complement,
            _ => return self.parse_primary(),
        };
        self.pos += 1;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> GoenumResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            match self.peek() {
                Some(GoToken::Dot) => {
                    self.pos += 1;
                    let name = self.expect(GoToken::Ident, "selector name")?.text;
                    expr = Expr::Selector {
                        base: Box::new(expr),
                        name,
                    };
                }
                Some(GoToken::LParen) => {
                    self.pos += 1;
                    let mut args = Vec::new();
                    while self.peek() != Some(GoToken::RParen) {
                        args.push(self.parse_expr()?);
                        if !self.eat(GoToken::Comma) {
                            break;
                        }
                    }
                    self.expect(GoToken::RParen, "')'")?;
                    expr = Expr::Call {
                        func: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_operand(&mut self) -> GoenumResult<Expr> {
        match self.peek() {
            Some(GoToken::Int) => Ok(Expr::Int(self.bump()?.text)),
            Some(GoToken::Float) | Some(GoToken::Imag) => Ok(Expr::Float(self.bump()?.text)),
            Some(GoToken::String) => {
                let tok = self.bump()?;
                self.decode_string(&tok).map(Expr::Str)
            }
            Some(GoToken::RawString) => Ok(Expr::Str(raw_string_body(&self.bump()?.text))),
            Some(GoToken::Rune) => {
                let tok = self.bump()?;
                self.decode_rune(&tok).map(Expr::Rune)
            }
            Some(GoToken::Ident) => Ok(Expr::Ident(self.bump()?.text)),
            Some(GoToken::LParen) => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(GoToken::RParen, "')'")?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            _ => Err(self.error_here("expected constant expression")),
        }
    }

    fn decode_string(&self, tok: &Token) -> GoenumResult<String> {
        let body = &tok.text[1..tok.text.len() - 1];
        unescape(body)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .ok_or_else(|| {
                GoenumError::parse_at(&self.path, "invalid escape in string literal", tok.line, tok.column)
            })
    }

    fn decode_rune(&self, tok: &Token) -> GoenumResult<u32> {
        let body = &tok.text[1..tok.text.len() - 1];
        let invalid =
            || GoenumError::parse_at(&self.path, "invalid rune literal", tok.line, tok.column);
        if !body.starts_with('\\') {
            let mut chars = body.chars();
            return match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c as u32),
                _ => Err(invalid()),
            };
        }
        let bytes = unescape(body).ok_or_else(invalid)?;
        match body.as_bytes().get(1) {
            // \x and octal escapes denote a single byte value
            Some(b'x') | Some(b'0'..=b'7') if bytes.len() == 1 => Ok(u32::from(bytes[0])),
            _ => String::from_utf8(bytes)
                .ok()
                .and_then(|s| {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c as u32),
                        _ => None,
                    }
                })
                .ok_or_else(invalid),
        }
    }
}

fn binary_op(kind: GoToken) -> Option<BinaryOp> {
    Some(match kind {
        GoToken::Star => BinaryOp::Mul,
        GoToken::Slash => BinaryOp::Div,
        GoToken::Percent => BinaryOp::Rem,
        GoToken::Shl => BinaryOp::Shl,
        GoToken::Shr => BinaryOp::Shr,
        GoToken::Amp => BinaryOp::And,
        GoToken::AndNot => BinaryOp::AndNot,
        GoToken::Plus => BinaryOp::Add,
        GoToken::Minus => BinaryOp::Sub,
        GoToken::Pipe => BinaryOp::Or,
        GoToken::Caret => BinaryOp::Xor,
        GoToken::Eq => BinaryOp::Eq,
        GoToken::NotEq => BinaryOp::NotEq,
        GoToken::Less => BinaryOp::Less,
        GoToken::LessEq => BinaryOp::LessEq,
        GoToken::Greater => BinaryOp::Greater,
        GoToken::GreaterEq => BinaryOp::GreaterEq,
        GoToken::LogicalAnd => BinaryOp::LogicalAnd,
        GoToken::LogicalOr => BinaryOp::LogicalOr,
        _ => return None,
    })
}

/// Body of a raw string literal; carriage returns are discarded.
fn raw_string_body(text: &str) -> String {
    text[1..text.len() - 1].replace('\r', "")
}

/// Decode Go escape sequences into raw bytes.
fn unescape(body: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let esc = chars.next()?;
        match esc {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '\'' => out.push(b'\''),
            '"' => out.push(b'"'),
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                out.push(u8::from_str_radix(&hex, 16).ok()?);
            }
            'u' | 'U' => {
                let len = if esc == 'u' { 4 } else { 8 };
                let hex: String = (0..len).filter_map(|_| chars.next()).collect();
                if hex.len() != len {
                    return None;
                }
                let ch = char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            '0'..='7' => {
                let mut oct = String::from(esc);
                for _ in 0..2 {
                    oct.push(chars.next()?);
                }
                out.push(u8::try_from(u32::from_str_radix(&oct, 8).ok()?).ok()?);
            }
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::lexer::tokenize;

    fn parse(src: &str) -> GoFile {
        let path = PathBuf::from("test.go");
        let tokens = tokenize(&path, src).unwrap();
        parse_file(&path, tokens).unwrap()
    }

    fn parse_err(src: &str) -> GoenumError {
        let path = PathBuf::from("test.go");
        let tokens = tokenize(&path, src).unwrap();
        parse_file(&path, tokens).unwrap_err()
    }

    fn value_specs(file: &GoFile) -> Vec<&ValueSpec> {
        file.const_decls()
            .flat_map(|g| g.specs.iter())
            .filter_map(|s| match s {
                Spec::Value(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_package_and_imports() {
        let file = parse(
            r#"package colors

import "fmt"
import (
    str "strings"
    _ "embed"
)
"#,
        );
        assert_eq!(file.package, "colors");
        assert_eq!(file.imports.len(), 3);
        assert_eq!(file.imports[0].path, "fmt");
        assert_eq!(file.imports[1].alias.as_deref(), Some("str"));
    }

    #[test]
    fn test_grouped_const_specs() {
        let file = parse(
            r#"package p

type MyEnum int

const (
    Ant MyEnum = iota
    Fly

    Cat
)
"#,
        );
        let specs = value_specs(&file);
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[0].names[0].name, "Ant");
        assert_eq!(specs[0].ty, Some(TypeExpr::Named("MyEnum".into())));
        assert_eq!(specs[0].values, vec![Expr::Ident("iota".into())]);
        assert_eq!(specs[1].ty, None);
        assert!(specs[1].values.is_empty());
        assert_eq!(specs[2].names[0].name, "Cat");
    }

    #[test]
    fn test_single_const_with_multiple_names() {
        let file = parse("package p\nconst A, _, C = 1, 2, 3\n");
        let specs = value_specs(&file);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].names.len(), 3);
        assert!(specs[0].names[1].is_blank());
        assert_eq!(specs[0].values.len(), 3);
    }

    #[test]
    fn test_qualified_and_composite_types() {
        let file = parse("package p\nconst (\n A time.Duration = 5\n B []byte = nil\n)\n");
        let specs = value_specs(&file);
        assert_eq!(
            specs[0].ty,
            Some(TypeExpr::Qualified {
                package: "time".into(),
                name: "Duration".into()
            })
        );
        assert!(matches!(specs[1].ty, Some(TypeExpr::Other(_))));
    }

    #[test]
    fn test_expression_precedence() {
        let file = parse("package p\nconst X = 1 + 2*3 << 1\n");
        let specs = value_specs(&file);
        // 1 + ((2*3) << 1)
        match &specs[0].values[0] {
            Expr::Binary { op, rhs, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(**rhs, Expr::Binary { op: BinaryOp::Shl, .. }));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }

    #[test]
    fn test_string_and_rune_literals() {
        let file = parse("package p\nconst (\n S = \"a\\tb\\u00e9\"\n R = '\\n'\n X = '\\x41'\n Raw = `c:\\dir`\n)\n");
        let specs = value_specs(&file);
        assert_eq!(specs[0].values[0], Expr::Str("a\tb\u{e9}".into()));
        assert_eq!(specs[1].values[0], Expr::Rune(10));
        assert_eq!(specs[2].values[0], Expr::Rune(0x41));
        assert_eq!(specs[3].values[0], Expr::Str("c:\\dir".into()));
    }

    #[test]
    fn test_conversion_and_selector() {
        let file = parse("package p\nconst A = Kind(3)\nconst B = math.MaxInt8\n");
        let specs = value_specs(&file);
        assert!(matches!(specs[0].values[0], Expr::Call { .. }));
        assert!(matches!(specs[1].values[0], Expr::Selector { .. }));
    }

    #[test]
    fn test_function_bodies_are_skipped() {
        let file = parse(
            r#"package p

func (r *Reader[T]) Read(p []byte) (n int, err error) {
    const Local = 99
    if x := map[string]struct{}{}; len(x) == 0 {
        return 0, nil
    }
    return
}

func helper(v interface{}) interface{} { return v }

const After = 1
"#,
        );
        let funcs: Vec<_> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Func(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].name, "Read");
        assert_eq!(funcs[0].receiver.as_deref(), Some("Reader"));
        assert_eq!(funcs[1].name, "helper");

        let specs = value_specs(&file);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].names[0].name, "After");
    }

    #[test]
    fn test_type_and_var_decls() {
        let file = parse(
            r#"package p

type (
    Color string
    Alias = int
    Point struct { X, Y int; Label string }
    List[T any] []T
)

var (
    a, b int = 1, 2
    handlers = map[string]func(){"x": func() { println(1); }}
)
"#,
        );
        let types: Vec<_> = file.type_specs().collect();
        assert_eq!(types.len(), 4);
        assert_eq!(types[0].ty, TypeExpr::Named("string".into()));
        assert!(types[1].alias);
        assert!(matches!(types[2].ty, TypeExpr::Other(_)));
        assert!(matches!(types[3].ty, TypeExpr::Other(_)));

        let vars = file
            .decls
            .iter()
            .filter(|d| matches!(d, Decl::Gen(g) if g.keyword == DeclKeyword::Var))
            .count();
        assert_eq!(vars, 1);
    }

    #[test]
    fn test_statement_outside_function_is_error() {
        let err = parse_err("package p\nx := 1\n");
        assert!(matches!(err, GoenumError::Parse { line: Some(2), .. }));
    }

    #[test]
    fn test_missing_package_clause_is_error() {
        let err = parse_err("const A = 1\n");
        assert!(err.to_string().contains("expected 'package'"));
    }

    #[test]
    fn test_unclosed_group_is_error() {
        let err = parse_err("package p\nconst (\n A = 1\n");
        assert!(matches!(err, GoenumError::Parse { .. }));
    }
}
