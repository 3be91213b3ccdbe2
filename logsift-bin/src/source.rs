use anyhow::{Context, Result};
use logsift_framework::LineSource;
use memmap2::MmapOptions;
use std::fs::File;
use std::path::PathBuf;

/// log file read through a memory map, decoded as lossy UTF-8
pub struct MappedFile {
    path: PathBuf,
}

impl MappedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LineSource for MappedFile {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_text(&mut self) -> Result<String> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open file: {}", self.path.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat file: {}", self.path.display()))?
            .len();

        // zero-length maps are rejected on some platforms
        if len == 0 {
            return Ok(String::new());
        }

        let mmap = unsafe { MmapOptions::new().len(len as usize).map(&file) }
            .with_context(|| format!("Failed to map file: {}", self.path.display()))?;
        log::debug!("MappedFile: mapped {} bytes from {}", mmap.len(), self.path.display());

        Ok(String::from_utf8_lossy(&mmap).into_owned())
    }
}
