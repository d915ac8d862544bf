//! Enum group extraction from a loaded Go file.
//!
//! Two views of the file are reconciled here: the resolved symbol scope
//! supplies values, and the declaration list supplies grouping and order.
//! A constant's implicit type (a line that omits it inside a `const (...)`
//! group) is only visible in the declaration walk, and its implicit value
//! only in the scope, so the walker consults both.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, trace};

use super::enum_registry::{ConstantMember, EnumTypeRegistry, EnumTypeSpec, UnderlyingKind};
use super::symbol_table::build_symbol_table;
use crate::error::{GoenumError, GoenumResult};
use crate::source::ast::{GoFile, Spec, TypeExpr};
use crate::source::load::parse_source;

/// What happens to the active enum type when a line in a const group
/// states an explicit type that is not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarryPolicy {
    /// Detach on any unregistered type; following implicit-type lines
    /// belong to no enum.
    #[default]
    Clear,
    /// Detach only on an unregistered plain type name. Qualified
    /// (`time.Duration`) and composite types leave the previously active
    /// enum attached.
    Retain,
}

impl FromStr for CarryPolicy {
    type Err = GoenumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "clear" => Ok(Self::Clear),
            "retain" => Ok(Self::Retain),
            other => Err(GoenumError::invalid_argument(format!(
                "unknown carry policy '{}': expected 'clear' or 'retain'",
                other
            ))),
        }
    }
}

impl fmt::Display for CarryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clear => write!(f, "clear"),
            Self::Retain => write!(f, "retain"),
        }
    }
}

/// Effective extraction settings, passed explicitly into every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Types to collect, in report order.
    pub types: Vec<EnumTypeSpec>,
    pub carry_policy: CarryPolicy,
    /// Also register every named type over a basic string or integer type.
    pub discover: bool,
    /// Regex a discovered type name must match.
    pub discover_pattern: Option<String>,
}

impl ExtractConfig {
    pub fn with_types(types: Vec<EnumTypeSpec>) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }
}

/// Enums extracted from one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileEnums {
    pub path: PathBuf,
    pub package: String,
    pub enums: EnumTypeRegistry,
}

impl FileEnums {
    /// Whether no registered type received a member.
    pub fn is_empty(&self) -> bool {
        self.enums.member_count() == 0
    }
}

/// Extractor with a validated configuration.
///
/// Holds no per-file state; every call builds a fresh registry and symbol
/// table, so one extractor can serve many files (and threads).
#[derive(Debug, Clone)]
pub struct EnumExtractor {
    config: ExtractConfig,
    discover_filter: Option<Regex>,
}

impl EnumExtractor {
    pub fn new(config: ExtractConfig) -> GoenumResult<Self> {
        let discover_filter = match &config.discover_pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                GoenumError::invalid_argument(format!(
                    "invalid discover pattern '{}': {}",
                    pattern, e
                ))
            })?),
            None => None,
        };
        Ok(Self {
            config,
            discover_filter,
        })
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Seed a registry for `file`: configured types first, then
    /// discovered ones in declaration order.
    pub fn registry_for(&self, file: &GoFile) -> EnumTypeRegistry {
        let mut registry = EnumTypeRegistry::from_specs(&self.config.types);
        infer_base_types(&mut registry, file);
        if self.config.discover {
            for spec in discover_enum_types(file, self.discover_filter.as_ref()) {
                if let Some(base) = spec.base.as_deref() {
                    registry.register(&spec.name, base);
                }
            }
        }
        registry
    }

    pub fn extract(&self, file: &GoFile) -> GoenumResult<FileEnums> {
        let mut registry = self.registry_for(file);
        populate_enum_info(&mut registry, file, self.config.carry_policy)?;
        debug!(
            file = %file.path.display(),
            types = registry.len(),
            members = registry.member_count(),
            "extracted enums"
        );
        Ok(FileEnums {
            path: file.path.clone(),
            package: file.package.clone(),
            enums: registry,
        })
    }
}

/// Extract enums from a loaded file with a one-off extractor.
pub fn extract_file(file: &GoFile, config: &ExtractConfig) -> GoenumResult<FileEnums> {
    EnumExtractor::new(config.clone())?.extract(file)
}

/// Parse Go source text and extract its enums.
pub fn extract_source(path: &Path, source: &str, config: &ExtractConfig) -> GoenumResult<FileEnums> {
    let file = parse_source(path, source)?;
    extract_file(&file, config)
}

/// Walk the file's const declarations and append members to `registry`.
///
/// The active descriptor resets at every `const` declaration and carries
/// across the lines of one group until another explicit type replaces it.
/// Lines naming an unregistered type follow `policy`. Every non-blank
/// name on an attached line becomes a member; its value comes from the
/// file's symbol table and is `Unresolved` when the table has none.
///
/// A non-value spec inside a const declaration aborts the file.
pub fn populate_enum_info(
    registry: &mut EnumTypeRegistry,
    file: &GoFile,
    policy: CarryPolicy,
) -> GoenumResult<()> {
    let table = build_symbol_table(file);

    for decl in file.const_decls() {
        let mut current: Option<usize> = None;

        for spec in &decl.specs {
            let value_spec = match spec {
                Spec::Value(v) => v,
                other => {
                    return Err(GoenumError::malformed_spec(
                        &file.path,
                        format!(
                            "line {}: const declaration holds a non-value spec ({})",
                            decl.line,
                            spec_kind(other)
                        ),
                    ));
                }
            };

            if let Some(ty) = &value_spec.ty {
                match ty.as_named() {
                    Some(name) => current = registry.index_of(name),
                    None if policy == CarryPolicy::Clear => current = None,
                    None => {
                        trace!(line = value_spec.line, ty = %ty, "qualified or composite type, keeping enum");
                    }
                }
            }

            let Some(index) = current else { continue };
            let descriptor = registry.descriptor_at_mut(index).ok_or_else(|| {
                GoenumError::internal(format!("enum registry lost descriptor #{}", index))
            })?;
            for ident in value_spec.names.iter().filter(|i| !i.is_blank()) {
                let value = table.resolve(&ident.name);
                if !value.is_resolved() {
                    debug!(
                        file = %file.path.display(),
                        enum_type = %descriptor.name,
                        name = %ident.name,
                        "member value unresolved"
                    );
                }
                descriptor.append(ConstantMember {
                    name: ident.name.clone(),
                    value,
                });
            }
        }
    }

    Ok(())
}

/// Named, non-alias types over a basic string or integer type.
pub fn discover_enum_types(file: &GoFile, filter: Option<&Regex>) -> Vec<EnumTypeSpec> {
    file.type_specs()
        .filter(|t| !t.alias && !t.name.is_blank())
        .filter_map(|t| {
            let base = t.ty.as_named()?;
            match UnderlyingKind::from_base_type(base) {
                UnderlyingKind::Other => None,
                _ => Some(EnumTypeSpec::new(&t.name.name, base)),
            }
        })
        .filter(|spec| filter.map_or(true, |re| re.is_match(&spec.name)))
        .collect()
}

/// Fill in `"?"` bases from the file's own `type Name base` declarations.
fn infer_base_types(registry: &mut EnumTypeRegistry, file: &GoFile) {
    for descriptor in registry.iter_mut().filter(|d| d.base_type == "?") {
        let declared = file
            .type_specs()
            .find(|t| t.name.name == descriptor.name)
            .and_then(|t| match &t.ty {
                TypeExpr::Named(base) => Some(base.as_str()),
                _ => None,
            });
        if let Some(base) = declared {
            descriptor.set_base_type(base);
        }
    }
}

fn spec_kind(spec: &Spec) -> &'static str {
    match spec {
        Spec::Value(_) => "value",
        Spec::Type(_) => "type",
        Spec::Import(_) => "import",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ast::{Decl, DeclKeyword, GenDecl, Ident, Scope, TypeSpec};
    use crate::value::ConstValue;

    fn extract(src: &str, types: &[&str]) -> FileEnums {
        extract_with(src, types, CarryPolicy::Clear)
    }

    fn extract_with(src: &str, types: &[&str], policy: CarryPolicy) -> FileEnums {
        let config = ExtractConfig {
            types: types.iter().map(|t| t.parse().unwrap()).collect(),
            carry_policy: policy,
            ..ExtractConfig::default()
        };
        extract_source(Path::new("enums.go"), src, &config).unwrap()
    }

    fn members(result: &FileEnums, ty: &str) -> Vec<(String, ConstValue)> {
        result
            .enums
            .get(ty)
            .unwrap()
            .members()
            .iter()
            .map(|m| (m.name.clone(), m.value.clone()))
            .collect()
    }

    fn names(result: &FileEnums, ty: &str) -> Vec<String> {
        members(result, ty).into_iter().map(|(n, _)| n).collect()
    }

    #[test]
    fn test_order_preserved() {
        let src = r#"package p
type Letter int
const (
    C Letter = 3
    A Letter = 1
    B Letter = 2
)
"#;
        let result = extract(src, &["Letter:int"]);
        assert_eq!(names(&result, "Letter"), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_string_values() {
        let src = r#"package p
type Enum string
const (
    One Enum = "one"
    Two Enum = "two"
)
"#;
        let result = extract(src, &["Enum:string"]);
        assert_eq!(
            members(&result, "Enum"),
            vec![
                ("One".to_string(), ConstValue::from("one")),
                ("Two".to_string(), ConstValue::from("two")),
            ]
        );
        assert_eq!(result.enums.get("Enum").unwrap().kind, UnderlyingKind::Textual);
    }

    #[test]
    fn test_type_inherited_within_group() {
        let src = r#"package p
type MyEnum int
const (
    Ant MyEnum = iota
    Fly
    Cat
    TRex
)
"#;
        let result = extract(src, &["MyEnum:int"]);
        assert_eq!(
            members(&result, "MyEnum"),
            vec![
                ("Ant".to_string(), ConstValue::Int(0)),
                ("Fly".to_string(), ConstValue::Int(1)),
                ("Cat".to_string(), ConstValue::Int(2)),
                ("TRex".to_string(), ConstValue::Int(3)),
            ]
        );
    }

    #[test]
    fn test_groups_accumulate_in_file_order() {
        let src = r#"package p
type Enum string
const (
    One Enum = "one"
    Two Enum = "two"
)
const Unrelated = 5
const (
    Three Enum = "three"
)
"#;
        let result = extract(src, &["Enum:string"]);
        assert_eq!(names(&result, "Enum"), vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_blank_identifier_skipped() {
        let src = r#"package p
type Weekday int
const (
    _ Weekday = iota
    Monday
    Tuesday
)
"#;
        let result = extract(src, &["Weekday:int"]);
        assert_eq!(
            members(&result, "Weekday"),
            vec![
                ("Monday".to_string(), ConstValue::Int(1)),
                ("Tuesday".to_string(), ConstValue::Int(2)),
            ]
        );
    }

    #[test]
    fn test_unregistered_type_ignored() {
        let src = r#"package p
type Other int
const (
    X Other = iota
    Y
)
"#;
        let result = extract(src, &["Enum:string"]);
        assert!(result.enums.get("Enum").unwrap().is_empty());
        assert!(result.enums.get("Other").is_none());
        assert!(result.is_empty());
    }

    #[test]
    fn test_file_without_constants_keeps_all_types() {
        let src = "package p\n\nfunc main() {}\n";
        let result = extract(src, &["Enum:string", "MyEnum:int"]);
        assert_eq!(result.enums.len(), 2);
        assert!(result.enums.iter().all(|d| d.is_empty()));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let src = r#"package p
type Enum string
const (
    One Enum = "one"
    Two Enum = "two"
)
type MyEnum int
const (
    Ant MyEnum = iota
    Fly
)
"#;
        let first = extract(src, &["Enum:string", "MyEnum:int"]);
        let second = extract(src, &["Enum:string", "MyEnum:int"]);
        assert_eq!(first.enums, second.enums);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_untyped_group_not_collected() {
        let src = r#"package p
type MyEnum int
const (
    A = iota
    B
)
"#;
        let result = extract(src, &["MyEnum:int"]);
        assert!(result.enums.get("MyEnum").unwrap().is_empty());
    }

    #[test]
    fn test_single_const_declaration() {
        let src = "package p\ntype Mode int\nconst Fast Mode = 7\n";
        let result = extract(src, &["Mode:int"]);
        assert_eq!(members(&result, "Mode"), vec![("Fast".to_string(), ConstValue::Int(7))]);
    }

    #[test]
    fn test_descriptor_resets_between_groups() {
        let src = r#"package p
type Enum int
const (
    A Enum = iota
    B
)
const (
    C = 10
)
"#;
        let result = extract(src, &["Enum:int"]);
        assert_eq!(names(&result, "Enum"), vec!["A", "B"]);
    }

    const MIXED_GROUP: &str = r#"package p
type Color int
type Size int
const (
    Red Color = iota
    Green
    Small Size = 10
    Large
)
"#;

    #[test]
    fn test_clear_policy_detaches_on_unregistered_type() {
        let result = extract_with(MIXED_GROUP, &["Color:int"], CarryPolicy::Clear);
        assert_eq!(names(&result, "Color"), vec!["Red", "Green"]);
    }

    #[test]
    fn test_retain_policy_detaches_on_unregistered_plain_type() {
        let result = extract_with(MIXED_GROUP, &["Color:int"], CarryPolicy::Retain);
        assert_eq!(
            members(&result, "Color"),
            vec![
                ("Red".to_string(), ConstValue::Int(0)),
                ("Green".to_string(), ConstValue::Int(1)),
            ]
        );
    }

    #[test]
    fn test_switching_between_registered_types() {
        let result = extract_with(MIXED_GROUP, &["Color:int", "Size:int"], CarryPolicy::Clear);
        assert_eq!(names(&result, "Color"), vec!["Red", "Green"]);
        assert_eq!(names(&result, "Size"), vec!["Small", "Large"]);
    }

    #[test]
    fn test_qualified_type_is_not_registered() {
        let src = r#"package p
import "time"
type Enum int
const (
    A Enum = 1
    B time.Duration = 2
    C
)
"#;
        let cleared = extract_with(src, &["Enum:int"], CarryPolicy::Clear);
        assert_eq!(names(&cleared, "Enum"), vec!["A"]);
        let retained = extract_with(src, &["Enum:int"], CarryPolicy::Retain);
        assert_eq!(names(&retained, "Enum"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_multiple_names_per_line() {
        let src = r#"package p
type Pair int
const (
    Low, High Pair = 1, 2
)
"#;
        let result = extract(src, &["Pair:int"]);
        assert_eq!(
            members(&result, "Pair"),
            vec![
                ("Low".to_string(), ConstValue::Int(1)),
                ("High".to_string(), ConstValue::Int(2)),
            ]
        );
    }

    #[test]
    fn test_unresolvable_value_is_explicit() {
        let src = r#"package p
import "os"
type Mode int
const (
    Read Mode = os.O_RDONLY
    Ratio Mode = 1.5
    Zero Mode = 0
)
"#;
        let result = extract(src, &["Mode:int"]);
        assert_eq!(
            members(&result, "Mode"),
            vec![
                ("Read".to_string(), ConstValue::Unresolved),
                ("Ratio".to_string(), ConstValue::Unresolved),
                ("Zero".to_string(), ConstValue::Int(0)),
            ]
        );
    }

    #[test]
    fn test_function_local_constants_do_not_leak() {
        let src = r#"package p
type Color int
const (
    Red Color = iota
    Green
)
func shadow() int {
    const Red = 99
    const Blue Color = 5
    return Red
}
"#;
        let result = extract(src, &["Color:int"]);
        assert_eq!(
            members(&result, "Color"),
            vec![
                ("Red".to_string(), ConstValue::Int(0)),
                ("Green".to_string(), ConstValue::Int(1)),
            ]
        );
    }

    #[test]
    fn test_values_from_other_constants() {
        let src = r#"package p
type Flag uint8
const (
    FlagA Flag = 1 << iota
    FlagB
    FlagC
    FlagAll = FlagA | FlagB | FlagC
)
const Prefix = "v"
type Version string
const (
    V1 Version = Prefix + "1"
)
"#;
        let result = extract(src, &["Flag", "Version"]);
        assert_eq!(
            members(&result, "Flag"),
            vec![
                ("FlagA".to_string(), ConstValue::Int(1)),
                ("FlagB".to_string(), ConstValue::Int(2)),
                ("FlagC".to_string(), ConstValue::Int(4)),
                ("FlagAll".to_string(), ConstValue::Int(7)),
            ]
        );
        assert_eq!(members(&result, "Version"), vec![("V1".to_string(), ConstValue::from("v1"))]);
    }

    #[test]
    fn test_base_inferred_from_type_declaration() {
        let src = "package p\ntype Flag uint8\ntype Missing struct{}\n";
        let result = extract(src, &["Flag", "Missing", "Absent"]);
        let flag = result.enums.get("Flag").unwrap();
        assert_eq!(flag.base_type, "uint8");
        assert_eq!(flag.kind, UnderlyingKind::Integral);
        assert_eq!(result.enums.get("Absent").unwrap().base_type, "?");
        assert_eq!(result.enums.get("Missing").unwrap().kind, UnderlyingKind::Other);
    }

    #[test]
    fn test_configured_base_wins() {
        let src = "package p\ntype Flag uint8\n";
        let result = extract(src, &["Flag:int"]);
        assert_eq!(result.enums.get("Flag").unwrap().base_type, "int");
    }

    #[test]
    fn test_discovery() {
        let src = r#"package p
type Color int
type Name string
type point struct{ x int }
type Alias = int
type Ratio float64
const (
    Red Color = iota
    Blue
)
const First Name = "first"
"#;
        let file = parse_source(Path::new("d.go"), src).unwrap();
        let found = discover_enum_types(&file, None);
        assert_eq!(
            found,
            vec![EnumTypeSpec::new("Color", "int"), EnumTypeSpec::new("Name", "string")]
        );

        let upper = Regex::new("^C").unwrap();
        assert_eq!(
            discover_enum_types(&file, Some(&upper)),
            vec![EnumTypeSpec::new("Color", "int")]
        );

        let config = ExtractConfig {
            types: vec![EnumTypeSpec::named("Name")],
            discover: true,
            ..ExtractConfig::default()
        };
        let result = extract_file(&file, &config).unwrap();
        let order: Vec<_> = result.enums.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(order, vec!["Name", "Color"]);
        assert_eq!(names(&result, "Color"), vec!["Red", "Blue"]);
        assert_eq!(names(&result, "Name"), vec!["First"]);
    }

    #[test]
    fn test_invalid_discover_pattern() {
        let config = ExtractConfig {
            discover: true,
            discover_pattern: Some("(".to_string()),
            ..ExtractConfig::default()
        };
        let err = EnumExtractor::new(config).unwrap_err();
        assert!(matches!(err, GoenumError::InvalidArgument { .. }));
    }

    #[test]
    fn test_malformed_spec_aborts_file() {
        let file = GoFile {
            path: PathBuf::from("bad.go"),
            package: "p".to_string(),
            imports: Vec::new(),
            decls: vec![Decl::Gen(GenDecl {
                keyword: DeclKeyword::Const,
                specs: vec![Spec::Type(TypeSpec {
                    name: Ident {
                        name: "T".to_string(),
                        line: 3,
                        column: 5,
                    },
                    alias: false,
                    ty: TypeExpr::Named("int".to_string()),
                })],
                grouped: true,
                line: 3,
            })],
            scope: Scope::default(),
        };
        let mut registry = EnumTypeRegistry::new();
        registry.register("T", "int");
        let err = populate_enum_info(&mut registry, &file, CarryPolicy::Clear).unwrap_err();
        assert!(matches!(err, GoenumError::MalformedSpec { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_carry_policy_parsing() {
        assert_eq!("clear".parse::<CarryPolicy>().unwrap(), CarryPolicy::Clear);
        assert_eq!("Retain".parse::<CarryPolicy>().unwrap(), CarryPolicy::Retain);
        assert!("sticky".parse::<CarryPolicy>().is_err());
        assert_eq!(CarryPolicy::default(), CarryPolicy::Clear);
    }
}
