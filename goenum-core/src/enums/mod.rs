//! Enum extraction for Go const groups.
//!
//! A Go "enum" is a named type plus one or more `const` groups declared
//! with that type. This module finds those groups and records their
//! members in declaration order with their resolved values.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │  symbol_table.rs    │     │  enum_registry.rs   │
//! │  ─────────────────  │     │  ─────────────────  │
//! │  name → value from  │     │  known types, their │
//! │  the file scope     │     │  ordered members    │
//! └──────────┬──────────┘     └──────────┬──────────┘
//!            │                           │
//!            └───────────┬───────────────┘
//!                        ▼
//!            ┌─────────────────────┐
//!            │  enum_extractor.rs  │
//!            │  ─────────────────  │
//!            │  walk const decls,  │
//!            │  append members     │
//!            └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use goenum_core::enums::{extract_source, ExtractConfig};
//!
//! let config = ExtractConfig::with_types(vec!["Color:int".parse()?]);
//! let result = extract_source(&path, &content, &config)?;
//!
//! for desc in &result.enums {
//!     for m in desc.members() {
//!         println!("{}.{} = {}", desc.name, m.name, m.value);
//!     }
//! }
//! ```

pub mod enum_extractor;
pub mod enum_registry;
pub mod symbol_table;

pub use enum_extractor::{
    discover_enum_types, extract_file, extract_source, populate_enum_info, CarryPolicy,
    EnumExtractor, ExtractConfig, FileEnums,
};
pub use enum_registry::{
    ConstantMember, EnumDescriptor, EnumTypeRegistry, EnumTypeSpec, UnderlyingKind,
};
pub use symbol_table::{build_symbol_table, SymbolValueTable};
