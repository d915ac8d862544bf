//! Go source loading.
//!
//! Turns a `.go` file into the two views the extractor reconciles:
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────┐
//! │ lexer.rs │──▶│parser.rs │──▶│  resolve.rs  │
//! │ tokens + │   │ ordered  │   │ flat scope + │
//! │ implicit │   │ decl tree│   │ const values │
//! │   `;`    │   │ (ast.rs) │   │              │
//! └──────────┘   └──────────┘   └──────────────┘
//! ```
//!
//! [`load`] wires the stages together and loads files in parallel.

pub mod ast;
pub mod lexer;
pub mod load;
pub mod parser;
pub mod resolve;

pub use ast::{
    Decl, DeclKeyword, Expr, GenDecl, GoFile, Ident, ImportSpec, ObjectKind, Scope, ScopeObject,
    Spec, TypeExpr, TypeSpec, ValueSpec,
};
pub use load::{load_file, load_files, parse_source, LoadResult};
pub use resolve::resolve_scope;
