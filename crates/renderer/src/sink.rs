use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

/// Presentation surface for finished frames.
pub trait FrameSink {
    fn present(&mut self, frame: &RgbaImage) -> Result<()>;
}

/// Writes each frame as `frame_NNNNN.png` into a directory.
#[derive(Debug)]
pub struct ExportSink {
    directory: PathBuf,
    next_index: u32,
}

impl ExportSink {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).with_context(|| {
            format!("failed to create export directory {}", directory.display())
        })?;
        Ok(Self {
            directory,
            next_index: 0,
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn frames_written(&self) -> u32 {
        self.next_index
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.directory.join(format!("frame_{index:05}.png"))
    }
}

impl FrameSink for ExportSink {
    fn present(&mut self, frame: &RgbaImage) -> Result<()> {
        let path = self.frame_path(self.next_index);
        frame
            .save(&path)
            .with_context(|| format!("failed to write frame {}", path.display()))?;
        tracing::trace!(path = %path.display(), "frame exported");
        self.next_index += 1;
        Ok(())
    }
}
