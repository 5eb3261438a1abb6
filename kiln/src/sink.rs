//! Filesystem code sink.

use std::{
    fs,
    path::{Path, PathBuf},
};

use eyre::Result;
use kiln_engine::CodeSink;
use kiln_model::GeneratedUnit;
use kiln_stages::to_snake_case;

/// Sink that writes one `<unit>.rs` file per generated unit.
///
/// Re-emitting a unit overwrites its file in place, so aggregating stages
/// can refresh their output across passes without leaving stale copies.
pub struct DirSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl DirSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, in first-write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl CodeSink for DirSink {
    fn write_unit(&mut self, unit: GeneratedUnit) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self
            .root
            .join(format!("{}.rs", to_snake_case(&unit.qualified_name)));
        fs::write(&path, &unit.contents)?;
        if !self.written.contains(&path) {
            self.written.push(path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_do_not_duplicate_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirSink::new(dir.path());

        sink.write_unit(GeneratedUnit::new("FooAdapter", "v1")).unwrap();
        sink.write_unit(GeneratedUnit::new("FooAdapter", "v2")).unwrap();

        assert_eq!(sink.written().len(), 1);
        let contents = fs::read_to_string(dir.path().join("foo_adapter.rs")).unwrap();
        assert_eq!(contents, "v2");
    }
}
