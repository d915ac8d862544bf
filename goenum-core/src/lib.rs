//! goenum-core: static extraction of enum-like constant groups from Go source
//!
//! Go has no enum keyword; enums are a named type plus `const` groups
//! declared with that type, usually counting with `iota`. This library
//! loads Go files without a Go toolchain, resolves their constant values,
//! and reports each registered type's members in declaration order.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//!
//! let result = Goenum::new("/path/to/module")
//!     .types(["Color:int".parse()?])
//!     .analyze()?;
//!
//! for file in &result.files {
//!     for desc in &file.enums {
//!         println!("{}: {:?}", desc.name, desc.member_names());
//!     }
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`source`]: Go lexer, parser, and constant resolver
//! - [`enums`]: Symbol table, enum registry, and the declaration walker
//! - [`scan`]: Package pattern expansion and parallel file discovery
//! - [`module`]: `go.mod` lookup and package grouping
//! - [`builder`]: Fluent builder API for configuration
//! - [`report`]: Plain text and JSON output
//! - [`error`]: Typed error handling

pub mod builder;
pub mod config;
pub mod enums;
pub mod error;
pub mod logging;
pub mod module;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod source;
pub mod value;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{GoenumError, GoenumResult, IoResultExt};

// Builder API
pub use builder::{FileFailure, Goenum, ScanResult, DEFAULT_PATTERN};

// Configuration
pub use config::{load_config, load_config_file, GoenumConfig, OutputConfig, CONFIG_FILE};

// Extraction
pub use enums::{
    build_symbol_table, discover_enum_types, extract_file, extract_source, populate_enum_info,
    CarryPolicy, ConstantMember, EnumDescriptor, EnumExtractor, EnumTypeRegistry, EnumTypeSpec,
    ExtractConfig, FileEnums, SymbolValueTable, UnderlyingKind,
};

// Logging
pub use logging::{init_plain_logging, init_structured_logging};

// Package layout
pub use module::{find_module_root, group_packages, read_module_path, GoPackage};

// Reporting
pub use report::{print_json, print_plain, render_json, render_plain};

// File scanning
pub use scan::{expand_pattern, expand_patterns, gather_go_files, PackagePattern, ScanOptions};

// Source loading
pub use source::{load_file, load_files, parse_source, GoFile, LoadResult};

// Values
pub use value::ConstValue;
