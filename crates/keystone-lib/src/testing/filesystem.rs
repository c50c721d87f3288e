//! Temporary directories for configuration tests

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory removed on drop
pub struct TempDirFixture {
    pub temp_dir: TempDir,
}

impl TempDirFixture {
    pub fn new() -> io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `file_path`, creating parent directories
    pub fn write_file(&self, file_path: &str, content: &str) -> io::Result<PathBuf> {
        let full_path = self.path().join(file_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)?;
        Ok(full_path)
    }

    /// Write `KEY=value` lines to `file_name`
    pub fn write_env(&self, file_name: &str, vars: &[(&str, &str)]) -> io::Result<PathBuf> {
        let content: String = vars
            .iter()
            .map(|(key, value)| format!("{key}={value}\n"))
            .collect();
        self.write_file(file_name, &content)
    }

    pub fn read_file(&self, file_path: &str) -> io::Result<String> {
        fs::read_to_string(self.path().join(file_path))
    }

    pub fn file_exists(&self, file_path: &str) -> bool {
        self.path().join(file_path).exists()
    }
}

#[cfg(test)]
mod tests {
    include!("filesystem.test.rs");
}
