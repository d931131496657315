// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/upload/intake.rs
//
// Intake surface: file type policy and drop batching.

use std::path::{Path, PathBuf};

use super::file::FileLike;
use crate::constant::ACCEPTED_IMAGE_TYPES;

/// Mime type for an accepted image path, `None` if the intake rejects it.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
}

/// File extensions for the native picker filter.
pub fn accepted_extensions() -> Vec<&'static str> {
    ACCEPTED_IMAGE_TYPES.iter().map(|(ext, _)| *ext).collect()
}

/// Keep the accepted files of a drop, in order. Rejected files are dropped silently.
pub fn accept_paths<I>(paths: I) -> Vec<FileLike>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter_map(|path| {
            let file = FileLike::from_path(&path);
            if file.is_none() {
                log::debug!("Rejected unsupported file {}", path.display());
            }
            file
        })
        .collect()
}

/// Collects the per-path drop events a window receives for one OS drop.
///
/// The first path of a batch opens it and hands out a generation; the owner
/// schedules a flush for that generation after a short delay.
#[derive(Debug, Default)]
pub struct DropBatch {
    paths: Vec<PathBuf>,
    generation: u64,
}

impl DropBatch {
    /// Add a dropped path. Returns the generation to flush when this path
    /// opened a new batch.
    pub fn push(&mut self, path: PathBuf) -> Option<u64> {
        let opened = self.paths.is_empty();
        if opened {
            self.generation = self.generation.wrapping_add(1);
        }
        self.paths.push(path);
        opened.then_some(self.generation)
    }

    /// Take the batch if `generation` is still the open one.
    pub fn take(&mut self, generation: u64) -> Option<Vec<PathBuf>> {
        if generation != self.generation || self.paths.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.paths))
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
