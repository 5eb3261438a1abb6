// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Session manifest (`kiln.toml`) parsing and validation.
//!
//! The manifest is the CLI host's declaration model: it lists the program
//! declarations visible to a generation session and the markers each one
//! carries. A real compiler host would supply these through its own
//! declaration model instead.
//!
//! ```toml
//! [session]
//! name = "demo"
//!
//! [[declarations]]
//! kind = "type"
//! name = "Foo"
//! markers = ["serializable"]
//! ```

mod error;
mod validate;

use std::path::Path;

use kiln_model::{Declaration, DeclarationKind, MarkerKind};
use serde::Deserialize;

pub use error::{Error, Result};

/// Root schema for kiln.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    /// Session metadata
    pub session: SessionConfig,

    /// Declarations visible to the session
    #[serde(default)]
    pub declarations: Vec<DeclarationEntry>,
}

/// Session metadata
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Session name, used in reports
    pub name: String,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,
}

/// One declaration and the markers it carries
#[derive(Debug, Clone, Deserialize)]
pub struct DeclarationEntry {
    /// Declaration kind: package, type, or member
    pub kind: DeclarationKind,

    /// Declaration name (`Foo`, `demo.api`, `Foo::bar`)
    pub name: String,

    /// Marker kinds annotating this declaration
    #[serde(default)]
    pub markers: Vec<String>,
}

impl DeclarationEntry {
    /// The declaration handle this entry describes.
    pub fn declaration(&self) -> Declaration {
        Declaration::new(self.kind, self.name.clone())
    }

    /// The marker kinds this entry carries.
    pub fn marker_kinds(&self) -> impl Iterator<Item = MarkerKind> + '_ {
        self.markers.iter().map(|name| MarkerKind::new(name.as_str()))
    }

    /// Validate this entry against the source it was parsed from.
    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        match self.kind {
            DeclarationKind::Package => validate::validate_package_name(&self.name, src, filename)?,
            DeclarationKind::Type => validate::validate_name(&self.name, "type", src, filename)?,
            DeclarationKind::Member => validate::validate_member_name(&self.name, src, filename)?,
        }

        if self.markers.is_empty() {
            return Err(Error::validation(
                format!("declaration '{}' carries no markers", self.name),
                src,
                filename,
                validate::find_name_span(src, &self.name),
            ));
        }

        let mut seen: Vec<&str> = Vec::new();
        for marker in &self.markers {
            if let Some(reason) = validate::validate_marker_name(marker) {
                return Err(Error::invalid_identifier(
                    marker,
                    "marker",
                    reason,
                    src,
                    filename,
                    validate::find_name_span(src, marker),
                ));
            }
            if seen.contains(&marker.as_str()) {
                return Err(Error::validation(
                    format!(
                        "declaration '{}' lists marker '{}' twice",
                        self.name, marker
                    ),
                    src,
                    filename,
                    validate::find_name_span(src, marker),
                ));
            }
            seen.push(marker.as_str());
        }

        Ok(())
    }
}

impl Schema {
    /// Validate the schema after parsing
    pub fn validate(&self, src: &str, filename: &str) -> Result<()> {
        validate::validate_name(&self.session.name, "session", src, filename)?;

        let mut seen: Vec<(DeclarationKind, &str)> = Vec::new();
        for entry in &self.declarations {
            entry.validate(src, filename)?;

            let key = (entry.kind, entry.name.as_str());
            if seen.contains(&key) {
                return Err(Error::duplicate_declaration(
                    &entry.name,
                    src,
                    filename,
                    validate::find_nth_name_span(src, &entry.name, 1),
                ));
            }
            seen.push(key);
        }
        Ok(())
    }

    /// All declarations paired with their marker kinds.
    pub fn annotations(&self) -> impl Iterator<Item = (Declaration, MarkerKind)> + '_ {
        self.declarations.iter().flat_map(|entry| {
            entry
                .marker_kinds()
                .map(move |kind| (entry.declaration(), kind))
        })
    }

    /// The distinct marker kinds referenced anywhere in the manifest.
    pub fn referenced_markers(&self) -> Vec<MarkerKind> {
        let mut kinds: Vec<MarkerKind> = Vec::new();
        for entry in &self.declarations {
            for kind in entry.marker_kinds() {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        kinds
    }
}

/// Parse a kiln.toml file from the given path
pub fn parse_file(path: impl AsRef<Path>) -> Result<Schema> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source: e,
        })
    })?;
    let filename = path.display().to_string();
    parse_str_with_filename(&content, &filename)
}

/// Parse a kiln.toml from a string (uses "kiln.toml" as default filename)
pub fn parse_str(content: &str) -> Result<Schema> {
    parse_str_with_filename(content, "kiln.toml")
}

/// Parse a kiln.toml from a string with a custom filename for error reporting
pub fn parse_str_with_filename(content: &str, filename: &str) -> Result<Schema> {
    let schema: Schema = toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;

    schema.validate(content, filename)?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO: &str = r#"
        [session]
        name = "demo"

        [[declarations]]
        kind = "type"
        name = "Foo"
        markers = ["serializable"]

        [[declarations]]
        kind = "type"
        name = "AppFactory"
        markers = ["serializable-factory"]
    "#;

    #[test]
    fn test_parse_demo_manifest() {
        let schema = parse_str(DEMO).expect("demo manifest should parse");

        assert_eq!(schema.session.name, "demo");
        assert_eq!(schema.declarations.len(), 2);
        assert_eq!(
            schema.declarations[0].declaration(),
            Declaration::for_type("Foo")
        );
        assert_eq!(
            schema.referenced_markers(),
            [
                MarkerKind::new("serializable"),
                MarkerKind::new("serializable-factory")
            ]
        );
    }

    #[test]
    fn test_annotations_pair_declarations_with_kinds() {
        let schema = parse_str(DEMO).unwrap();
        let annotations: Vec<_> = schema.annotations().collect();

        assert_eq!(annotations.len(), 2);
        assert_eq!(
            annotations[0],
            (
                Declaration::for_type("Foo"),
                MarkerKind::new("serializable")
            )
        );
    }

    #[test]
    fn test_reserved_keyword_type_name() {
        let result = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "type"
            name = "fn"
            markers = ["serializable"]
        "#,
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("reserved keyword"));
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let result = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "type"
            name = "Foo"
            markers = ["serializable"]

            [[declarations]]
            kind = "type"
            name = "Foo"
            markers = ["serializable-factory"]
        "#,
        );

        let err = result.unwrap_err();
        assert!(matches!(*err, Error::DuplicateDeclaration { .. }));
    }

    #[test]
    fn test_same_name_different_kind_is_allowed() {
        let result = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "package"
            name = "demo"
            markers = ["serializable"]

            [[declarations]]
            kind = "type"
            name = "demo"
            markers = ["serializable"]
        "#,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn test_markerless_declaration_rejected() {
        let result = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "type"
            name = "Foo"
        "#,
        );

        let err = result.unwrap_err();
        assert!(err.to_string().contains("carries no markers"));
    }

    #[test]
    fn test_bad_marker_name_rejected() {
        let result = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "type"
            name = "Foo"
            markers = ["Serializable"]
        "#,
        );

        let err = result.unwrap_err();
        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_member_declaration_shape() {
        let ok = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "member"
            name = "Foo::bar"
            markers = ["serializable"]
        "#,
        );
        assert!(ok.is_ok());

        let bad = parse_str(
            r#"
            [session]
            name = "demo"

            [[declarations]]
            kind = "member"
            name = "bar"
            markers = ["serializable"]
        "#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_parse_error_carries_span() {
        let err = parse_str("not valid toml [").unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }
}
