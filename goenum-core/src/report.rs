//! Output formatting - plaintext and JSON.
//!
//! Descriptors are listed in registry order, members in declaration
//! order. Reports go to stdout; diagnostics never do.

use std::fmt::Write as _;

use crate::enums::FileEnums;
use crate::value::ConstValue;

fn visible(results: &[FileEnums], skip_empty: bool) -> impl Iterator<Item = &FileEnums> {
    results.iter().filter(move |r| !(skip_empty && r.is_empty()))
}

/// Renders results as indented plain text.
///
/// ```text
/// enums.go (package main)
///   Enum string
///     One = "one"
///   MyEnum int
///     Ant = 0
/// ```
pub fn render_plain(results: &[FileEnums], skip_empty: bool) -> String {
    let mut out = String::new();
    for result in visible(results, skip_empty) {
        let _ = writeln!(out, "{} (package {})", result.path.display(), result.package);
        if result.enums.is_empty() {
            let _ = writeln!(out, "  (no enum types registered)");
        }
        for desc in &result.enums {
            if skip_empty && desc.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {} {}", desc.name, desc.base_type);
            if desc.is_empty() {
                let _ = writeln!(out, "    (no members)");
            }
            for member in desc.members() {
                let value = match &member.value {
                    ConstValue::Unresolved => "?".to_string(),
                    other => other.to_string(),
                };
                let _ = writeln!(out, "    {} = {}", member.name, value);
            }
        }
    }
    out
}

/// Prints results in plain text format.
pub fn print_plain(results: &[FileEnums], skip_empty: bool) {
    let rendered = render_plain(results, skip_empty);
    if rendered.is_empty() {
        println!("No enums found.");
    } else {
        print!("{}", rendered);
    }
}

/// Renders results as a pretty-printed JSON array.
pub fn render_json(results: &[FileEnums], skip_empty: bool) -> serde_json::Result<String> {
    let shown: Vec<&FileEnums> = visible(results, skip_empty).collect();
    serde_json::to_string_pretty(&shown)
}

/// Prints results in JSON format.
///
/// Falls back to an empty array on serialization failure, after
/// reporting it on stderr.
pub fn print_json(results: &[FileEnums], skip_empty: bool) {
    match render_json(results, skip_empty) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            tracing::error!(error = %e, "JSON serialization failed");
            println!("[]");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{extract_source, EnumTypeSpec, ExtractConfig};
    use std::path::Path;

    const SRC: &str = r#"package main
type Enum string
const (
    One Enum = "one"
    Two Enum = "two"
)
type MyEnum int
const (
    Ant MyEnum = iota
    Fly
    Far MyEnum = 1.5
)
"#;

    fn sample(types: Vec<EnumTypeSpec>) -> FileEnums {
        extract_source(Path::new("enums.go"), SRC, &ExtractConfig::with_types(types)).unwrap()
    }

    #[test]
    fn test_render_plain() {
        let result = sample(vec![
            EnumTypeSpec::new("Enum", "string"),
            EnumTypeSpec::new("MyEnum", "int"),
            EnumTypeSpec::new("Unused", "int"),
        ]);
        let text = render_plain(&[result], false);
        assert_eq!(
            text,
            "enums.go (package main)\n\
             \x20 Enum string\n\
             \x20   One = \"one\"\n\
             \x20   Two = \"two\"\n\
             \x20 MyEnum int\n\
             \x20   Ant = 0\n\
             \x20   Fly = 1\n\
             \x20   Far = ?\n\
             \x20 Unused int\n\
             \x20   (no members)\n"
        );
    }

    #[test]
    fn test_skip_empty() {
        let empty = sample(vec![EnumTypeSpec::new("Unused", "int")]);
        let full = sample(vec![
            EnumTypeSpec::new("Enum", "string"),
            EnumTypeSpec::new("Unused", "int"),
        ]);
        let text = render_plain(&[empty, full], true);
        assert!(text.contains("Enum string"));
        assert!(!text.contains("Unused"));
        assert_eq!(text.matches("enums.go").count(), 1);
    }

    #[test]
    fn test_render_json() {
        let result = sample(vec![EnumTypeSpec::new("MyEnum", "int")]);
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&[result], false).unwrap()).unwrap();
        assert_eq!(json[0]["path"], "enums.go");
        assert_eq!(json[0]["package"], "main");
        let members = &json[0]["enums"][0]["members"];
        assert_eq!(members[0], serde_json::json!({"name": "Ant", "value": 0}));
        assert_eq!(members[2], serde_json::json!({"name": "Far", "value": null}));
        assert_eq!(json[0]["enums"][0]["kind"], "integral");
    }
}
