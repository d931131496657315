// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/upload/file.rs
//
// File handles passed from upload slots to their owner.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::intake::mime_for_path;
use crate::domain::image::RasterImage;

/// Where the contents of a [`FileLike`] live.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSource {
    /// Not read yet; the file is still on disk.
    Path(PathBuf),
    /// Held in memory, e.g. a committed crop.
    Memory(Arc<[u8]>),
}

/// A named, typed file handed to the record.
#[derive(Debug, Clone, PartialEq)]
pub struct FileLike {
    name: String,
    mime: String,
    source: FileSource,
}

impl FileLike {
    /// Wrap a file on disk. Returns `None` for files the intake does not accept.
    pub fn from_path(path: &Path) -> Option<Self> {
        let mime = mime_for_path(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Some(Self {
            name,
            mime: mime.to_string(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wrap an encoded in-memory image.
    pub fn from_image(image: &RasterImage) -> Self {
        Self {
            name: image.name().to_string(),
            mime: image.mime().to_string(),
            source: FileSource::Memory(Arc::clone(image.bytes())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Memory(_) => None,
        }
    }

    /// Size in bytes, when known without touching the disk.
    pub fn size(&self) -> Option<usize> {
        match &self.source {
            FileSource::Path(_) => None,
            FileSource::Memory(bytes) => Some(bytes.len()),
        }
    }

    /// Load the contents as an image, off the caller's thread.
    pub async fn read(self) -> anyhow::Result<RasterImage> {
        match self.source {
            FileSource::Path(path) => RasterImage::read(path).await,
            FileSource::Memory(bytes) => {
                let name = self.name;
                tokio::task::spawn_blocking(move || RasterImage::decode(name, bytes.to_vec()))
                    .await
                    .context("Image decode task failed")?
            }
        }
    }
}

/// Files are summarised, never serialised with their contents.
impl Serialize for FileLike {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileLike", 4)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.mime)?;
        state.serialize_field("size", &self.size())?;
        state.serialize_field("path", &self.path())?;
        state.end()
    }
}

/// What an upload slot hands to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSelection {
    /// Single-image mode: the committed crop.
    Single(FileLike),
    /// Multiple mode: every accepted file of one drop.
    Multiple(Vec<FileLike>),
    /// The slot was cleared.
    None,
}

impl FileSelection {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten into a list of files.
    pub fn into_files(self) -> Vec<FileLike> {
        match self {
            Self::Single(file) => vec![file],
            Self::Multiple(files) => files,
            Self::None => Vec::new(),
        }
    }
}
