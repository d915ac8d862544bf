//! Syntax tree for the top level of a Go source file.
//!
//! Only the parts the extractor and the constant resolver need are kept
//! in full: declarations, specifications, type references, and constant
//! expressions. Function bodies, var initializers and composite type
//! bodies are skipped during parsing.

use std::fmt;
use std::path::PathBuf;

use crate::value::ConstValue;

/// A parsed and resolved Go source file.
#[derive(Debug, Clone)]
pub struct GoFile {
    pub path: PathBuf,
    pub package: String,
    pub imports: Vec<ImportSpec>,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
    /// File-level symbol scope, filled in by the resolver.
    pub scope: Scope,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// The keyword introducing a generic declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKeyword {
    Const,
    Var,
    Type,
    Import,
}

impl fmt::Display for DeclKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const => write!(f, "const"),
            Self::Var => write!(f, "var"),
            Self::Type => write!(f, "type"),
            Self::Import => write!(f, "import"),
        }
    }
}

/// `const`, `var`, `type` or `import`, single or parenthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub keyword: DeclKeyword,
    pub specs: Vec<Spec>,
    /// Whether the specs were wrapped in `( ... )`.
    pub grouped: bool,
    pub line: usize,
}

/// A function or method declaration. Bodies are not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    /// Receiver type name for methods.
    pub receiver: Option<String>,
    pub line: usize,
}

/// One specification line inside a generic declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
    Import(ImportSpec),
}

/// `names [Type] [= values]` inside a `const` or `var` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    /// Explicit type, if the line states one.
    pub ty: Option<TypeExpr>,
    /// Expression list; empty when omitted (implicit repetition for
    /// constants) and always empty for `var` specs.
    pub values: Vec<Expr>,
    pub line: usize,
}

/// `Name [=] Type` inside a `type` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: Ident,
    pub alias: bool,
    pub ty: TypeExpr,
}

/// `[alias] "path"` inside an `import` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<String>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub line: usize,
    pub column: usize,
}

impl Ident {
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// A type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare identifier such as `Color` or `string`.
    Named(String),
    /// `pkg.Name`
    Qualified { package: String, name: String },
    /// Anything else (pointers, slices, structs, generics...), kept as
    /// space-joined token text.
    Other(String),
}

impl TypeExpr {
    /// The identifier, if this is a bare named type.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "{}", n),
            Self::Qualified { package, name } => write!(f, "{}.{}", package, name),
            Self::Other(text) => write!(f, "{}", text),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    Complement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
    Add,
    Sub,
    Or,
    Xor,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    /// Go binary operator precedence (5 binds tightest).
    pub fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Rem | Self::Shl | Self::Shr | Self::And | Self::AndNot => 5,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            Self::Eq | Self::NotEq | Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 3,
            Self::LogicalAnd => 2,
            Self::LogicalOr => 1,
        }
    }
}

/// A constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal text, e.g. `0x1F` or `1_000`.
    Int(String),
    /// Float or imaginary literal text.
    Float(String),
    /// Decoded string literal.
    Str(String),
    /// Decoded rune literal code point.
    Rune(u32),
    Ident(String),
    /// `pkg.Name` or `x.field`.
    Selector { base: Box<Expr>, name: String },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, lhs: Box<Expr>, rhs: Box<Expr> },
    /// Call or conversion, `f(args...)`.
    Call { func: Box<Expr>, args: Vec<Expr> },
    Paren(Box<Expr>),
}

/// Kind tag of a scope object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Const,
    Var,
    Type,
    Func,
}

/// A named entity declared at the top level of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeObject {
    pub name: String,
    pub kind: ObjectKind,
    /// Resolved value; meaningful only for constants.
    pub value: ConstValue,
}

/// The file's flat symbol scope in declaration order.
///
/// Duplicate names are kept as separate objects; the source is invalid
/// Go in that case, and consumers pick their own precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    pub objects: Vec<ScopeObject>,
}

impl Scope {
    pub fn insert(&mut self, name: impl Into<String>, kind: ObjectKind, value: ConstValue) {
        self.objects.push(ScopeObject {
            name: name.into(),
            kind,
            value,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScopeObject> {
        self.objects.iter()
    }

    /// First object with the given name.
    pub fn lookup(&self, name: &str) -> Option<&ScopeObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl GoFile {
    /// Iterate over `const` declarations in source order.
    pub fn const_decls(&self) -> impl Iterator<Item = &GenDecl> {
        self.decls.iter().filter_map(|d| match d {
            Decl::Gen(g) if g.keyword == DeclKeyword::Const => Some(g),
            _ => None,
        })
    }

    /// Iterate over type specs of all `type` declarations.
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls
            .iter()
            .filter_map(|d| match d {
                Decl::Gen(g) if g.keyword == DeclKeyword::Type => Some(g.specs.iter()),
                _ => None,
            })
            .flatten()
            .filter_map(|s| match s {
                Spec::Type(t) => Some(t),
                _ => None,
            })
    }
}
