//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use goenum_core::prelude::*;
//! ```

// Core types
pub use crate::error::{GoenumError, GoenumResult};
pub use crate::value::ConstValue;

// Extraction
pub use crate::enums::{
    extract_file, extract_source, CarryPolicy, EnumDescriptor, EnumTypeRegistry, EnumTypeSpec,
    ExtractConfig, FileEnums,
};

// Loading
pub use crate::source::{load_file, parse_source, GoFile};

// Configuration
pub use crate::config::{load_config, GoenumConfig};

// Builder API
pub use crate::builder::{Goenum, ScanResult};

// Reporting
pub use crate::report::{print_json, print_plain};
