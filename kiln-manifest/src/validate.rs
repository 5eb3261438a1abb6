//! Validation utilities for session manifests

use miette::SourceSpan;

use crate::{Error, Result};

/// Rust reserved keywords that cannot be used as identifiers
/// Source: https://doc.rust-lang.org/reference/keywords.html
pub(crate) const RUST_KEYWORDS: &[&str] = &[
    // Strict keywords (2021 edition)
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
    // Reserved keywords (may be used in future)
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
    // Weak keywords (context-sensitive, but best to avoid)
    "union",
];

/// Check if a name is a Rust reserved keyword
pub(crate) fn is_rust_keyword(name: &str) -> bool {
    RUST_KEYWORDS.contains(&name)
}

/// Find the span of a name in the TOML source.
/// Declaration and session names appear as quoted string values.
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    let quoted = format!("\"{name}\"");
    if let Some(pos) = src.find(&quoted) {
        // +1 to skip the opening quote
        return Some(SourceSpan::from((pos + 1, name.len())));
    }

    // Fallback: just find the name anywhere (less precise)
    src.find(name)
        .map(|pos| SourceSpan::from((pos, name.len())))
}

/// Find the span of the Nth occurrence of a quoted name.
pub(crate) fn find_nth_name_span(src: &str, name: &str, n: usize) -> Option<SourceSpan> {
    let quoted = format!("\"{name}\"");
    let mut offset = 0;
    let mut remaining = n;
    while let Some(pos) = src[offset..].find(&quoted) {
        let absolute = offset + pos;
        if remaining == 0 {
            return Some(SourceSpan::from((absolute + 1, name.len())));
        }
        remaining -= 1;
        offset = absolute + quoted.len();
    }
    find_name_span(src, name)
}

/// Validate that a name is a plain identifier
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("name cannot be empty");
    }

    let mut chars = name.chars();

    // First character must be a letter or underscore
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
        None => return Some("name cannot be empty"),
    }

    for c in chars {
        if !c.is_ascii_alphanumeric() && c != '_' {
            return Some("name must contain only letters, numbers, and underscores");
        }
    }

    None
}

/// Validate a marker kind name: lowercase identifier segments joined by
/// single dashes (e.g. "serializable-factory")
pub(crate) fn validate_marker_name(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("marker name cannot be empty");
    }
    for segment in name.split('-') {
        if segment.is_empty() {
            return Some("marker name cannot contain leading, trailing, or doubled dashes");
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Some("marker name must contain only lowercase letters, numbers, underscores, and dashes");
        }
    }
    None
}

/// Validate an identifier-shaped name, with keyword checking.
pub(crate) fn validate_name(name: &str, context: &str, src: &str, filename: &str) -> Result<()> {
    let span = find_name_span(src, name);

    if is_rust_keyword(name) {
        return Err(Error::reserved_keyword(name, context, src, filename, span));
    }

    if let Some(reason) = validate_identifier(name) {
        return Err(Error::invalid_identifier(
            name, context, reason, src, filename, span,
        ));
    }

    Ok(())
}

/// Validate a package name: dot-separated identifier segments.
pub(crate) fn validate_package_name(name: &str, src: &str, filename: &str) -> Result<()> {
    let span = find_name_span(src, name);
    for segment in name.split('.') {
        if is_rust_keyword(segment) {
            return Err(Error::reserved_keyword(segment, "package", src, filename, span));
        }
        if let Some(reason) = validate_identifier(segment) {
            return Err(Error::invalid_identifier(
                name, "package", reason, src, filename, span,
            ));
        }
    }
    Ok(())
}

/// Validate a member name: `Type::member`.
pub(crate) fn validate_member_name(name: &str, src: &str, filename: &str) -> Result<()> {
    let span = find_name_span(src, name);
    let Some((ty, member)) = name.split_once("::") else {
        return Err(Error::invalid_identifier(
            name,
            "member",
            "member names are written 'Type::member'",
            src,
            filename,
            span,
        ));
    };
    for part in [ty, member] {
        if is_rust_keyword(part) {
            return Err(Error::reserved_keyword(part, "member", src, filename, span));
        }
        if let Some(reason) = validate_identifier(part) {
            return Err(Error::invalid_identifier(
                name, "member", reason, src, filename, span,
            ));
        }
    }
    Ok(())
}
