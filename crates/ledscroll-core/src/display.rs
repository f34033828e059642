//! Display driver seam
//!
//! Playback pushes one frame per tick through [`DisplayDriver::present`].
//! Hardware panels, the terminal preview and the snapshot writer all sit
//! behind this trait.

use std::path::{Path, PathBuf};

use image::RgbImage;

pub trait DisplayDriver {
    /// Panel size in pixels as (width, height)
    fn size(&self) -> (u32, u32);

    /// Show `frame` on the panel
    fn present(&mut self, frame: &RgbImage) -> crate::Result<()>;
}

/// Discards frames, counting them. Used for headless runs.
#[derive(Debug, Clone)]
pub struct NullDisplay {
    width: u32,
    height: u32,
    presented: u64,
}

impl NullDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl DisplayDriver for NullDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, _frame: &RgbImage) -> crate::Result<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Writes every `every`-th frame to `dir` as a numbered PNG
#[derive(Debug, Clone)]
pub struct PngSnapshotDisplay {
    dir: PathBuf,
    width: u32,
    height: u32,
    every: u64,
    frame_index: u64,
}

impl PngSnapshotDisplay {
    pub fn new(dir: &Path, width: u32, height: u32, every: u64) -> crate::Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            width,
            height,
            every: every.max(1),
            frame_index: 0,
        })
    }

    fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:06}.png", index))
    }
}

impl DisplayDriver for PngSnapshotDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &RgbImage) -> crate::Result<()> {
        let index = self.frame_index;
        self.frame_index += 1;
        if index % self.every != 0 {
            return Ok(());
        }
        frame.save(self.path_for(index))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_display_counts() {
        let mut display = NullDisplay::new(128, 32);
        let frame = RgbImage::new(128, 32);
        display.present(&frame).unwrap();
        display.present(&frame).unwrap();
        assert_eq!(display.presented(), 2);
        assert_eq!(display.size(), (128, 32));
    }

    #[test]
    fn test_snapshot_display_writes_every_nth() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = PngSnapshotDisplay::new(dir.path(), 16, 8, 3).unwrap();
        let frame = RgbImage::new(16, 8);
        for _ in 0..7 {
            display.present(&frame).unwrap();
        }
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["frame_000000.png", "frame_000003.png", "frame_000006.png"]
        );
    }
}
