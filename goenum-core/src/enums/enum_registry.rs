//! Registry of known enum types and their collected members.
//!
//! The registry is both the input filter (only const groups whose
//! declared type is registered are collected) and the output accumulator.
//! It owns its descriptors; the extractor gets exclusive access while
//! walking, reporters read it afterwards.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::GoenumError;
use crate::value::ConstValue;

/// Representation domain of an enum's underlying type. Metadata only;
/// values are never coerced to match it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnderlyingKind {
    Textual,
    Integral,
    #[default]
    Other,
}

impl UnderlyingKind {
    /// Classify a Go basic type name.
    pub fn from_base_type(base: &str) -> Self {
        match base {
            "string" => Self::Textual,
            "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16"
            | "uint32" | "uint64" | "uintptr" | "byte" | "rune" => Self::Integral,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for UnderlyingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Textual => write!(f, "textual"),
            Self::Integral => write!(f, "integral"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A type the caller wants collected: `Name` or `Name:base`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumTypeSpec {
    pub name: String,
    /// Underlying Go type; looked up in the file when omitted.
    #[serde(default)]
    pub base: Option<String>,
}

impl EnumTypeSpec {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: Some(base.into()),
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
        }
    }
}

impl FromStr for EnumTypeSpec {
    type Err = GoenumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, base) = match s.split_once(':') {
            Some((n, b)) => (n.trim(), Some(b.trim())),
            None => (s.trim(), None),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(GoenumError::invalid_argument(format!(
                "invalid enum type '{}': expected NAME or NAME:BASE",
                s
            )));
        }
        match base {
            Some("") => Err(GoenumError::invalid_argument(format!(
                "invalid enum type '{}': empty base type",
                s
            ))),
            _ => Ok(Self {
                name: name.to_string(),
                base: base.map(str::to_string),
            }),
        }
    }
}

/// One constant of an enum group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantMember {
    pub name: String,
    pub value: ConstValue,
}

/// A known enum type and the constants collected for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,
    /// Underlying Go type name, `"?"` when unknown.
    pub base_type: String,
    pub kind: UnderlyingKind,
    members: Vec<ConstantMember>,
}

impl EnumDescriptor {
    pub fn new(name: impl Into<String>, base_type: impl Into<String>) -> Self {
        let base_type = base_type.into();
        Self {
            name: name.into(),
            kind: UnderlyingKind::from_base_type(&base_type),
            base_type,
            members: Vec::new(),
        }
    }

    /// Members in order of first encounter.
    pub fn members(&self) -> &[ConstantMember] {
        &self.members
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub(crate) fn set_base_type(&mut self, base_type: &str) {
        self.kind = UnderlyingKind::from_base_type(base_type);
        self.base_type = base_type.to_string();
    }

    /// Append-only; never reorders or deduplicates.
    pub(crate) fn append(&mut self, member: ConstantMember) {
        self.members.push(member);
    }
}

/// Insertion-ordered map from type name to descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumTypeRegistry {
    descriptors: IndexMap<String, EnumDescriptor>,
}

impl EnumTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry from specs; specs without a base get `"?"`.
    pub fn from_specs<'a>(specs: impl IntoIterator<Item = &'a EnumTypeSpec>) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(&spec.name, spec.base.as_deref().unwrap_or("?"));
        }
        registry
    }

    /// Register a type. Returns `false` (and keeps the existing
    /// descriptor) when the name is already present.
    pub fn register(&mut self, name: &str, base_type: &str) -> bool {
        if self.descriptors.contains_key(name) {
            return false;
        }
        self.descriptors
            .insert(name.to_string(), EnumDescriptor::new(name, base_type));
        true
    }

    pub fn get(&self, name: &str) -> Option<&EnumDescriptor> {
        self.descriptors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Total members across all descriptors.
    pub fn member_count(&self) -> usize {
        self.iter().map(|d| d.members.len()).sum()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.descriptors.get_index_of(name)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut EnumDescriptor> {
        self.descriptors.values_mut()
    }

    pub(crate) fn descriptor_at_mut(&mut self, index: usize) -> Option<&mut EnumDescriptor> {
        self.descriptors.get_index_mut(index).map(|(_, d)| d)
    }

    /// Accumulate another registry's members after this one's.
    ///
    /// Types unknown here are registered at the end. Used to combine the
    /// per-file registries of one package, in file order.
    pub fn absorb(&mut self, other: EnumTypeRegistry) {
        for (name, desc) in other.descriptors {
            match self.descriptors.get_mut(&name) {
                Some(existing) => {
                    if existing.base_type == "?" && desc.base_type != "?" {
                        existing.set_base_type(&desc.base_type);
                    }
                    existing.members.extend(desc.members);
                }
                None => {
                    self.descriptors.insert(name, desc);
                }
            }
        }
    }
}

impl Serialize for EnumTypeRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.descriptors.values())
    }
}

impl<'a> IntoIterator for &'a EnumTypeRegistry {
    type Item = &'a EnumDescriptor;
    type IntoIter = indexmap::map::Values<'a, String, EnumDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.values()
    }
}
