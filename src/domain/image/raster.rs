// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/image/raster.rs
//
// Encoded raster images held in memory.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// An encoded image (bytes + mime type) with its natural pixel size.
///
/// The bytes are shared, so cloning is cheap and never copies pixel data.
/// Every constructed image gets a process-unique id, which the UI uses to
/// cache display handles.
#[derive(Clone)]
pub struct RasterImage {
    id: u64,
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl RasterImage {
    /// Wrap bytes that are already known to be an encoded image of the given size.
    pub fn from_encoded(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
            width,
            height,
        }
    }

    /// Read the image header to validate `bytes` and learn the natural size.
    ///
    /// Pixel data is left encoded; it is only decoded when the image is cropped.
    pub fn decode(name: impl Into<String>, bytes: Vec<u8>) -> anyhow::Result<Self> {
        let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .context("Failed to inspect image")?;
        let format = reader.format().context("Unrecognised image format")?;
        let (width, height) = reader
            .into_dimensions()
            .context("Failed to read image header")?;

        Ok(Self::from_encoded(
            name,
            format.to_mime_type(),
            bytes,
            width,
            height,
        ))
    }

    /// Read and decode an image file without blocking the caller's thread.
    pub async fn read(path: PathBuf) -> anyhow::Result<Self> {
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = file_name(&path);

        tokio::task::spawn_blocking(move || Self::decode(name, bytes))
            .await
            .context("Image decode task failed")?
    }

    /// Parse a `data:<mime>;base64,<payload>` URI back into an image.
    pub fn from_data_uri(name: impl Into<String>, uri: &str) -> anyhow::Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .context("Not a data URI")?;
        let (header, payload) = rest.split_once(',').context("Data URI has no payload")?;
        let mime = header
            .strip_suffix(";base64")
            .context("Data URI is not base64 encoded")?;

        let bytes = STANDARD
            .decode(payload)
            .context("Invalid base64 payload in data URI")?;
        let image = Self::decode(name, bytes)?;

        // Trust the declared mime over the sniffed one, like a browser blob does.
        Ok(Self {
            mime: mime.to_string(),
            ..image
        })
    }

    /// Displayable handle for the image: a base64 data URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Natural pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode the full pixel buffer.
    pub fn to_dynamic(&self) -> anyhow::Result<image::DynamicImage> {
        image::load_from_memory(&self.bytes).context("Failed to decode image")
    }
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterImage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Byte-level equality; the id is a cache key, not identity.
impl PartialEq for RasterImage {
    fn eq(&self, other: &Self) -> bool {
        self.mime == other.mime && self.bytes == other.bytes
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    /// Encode a small gradient so that regions are distinguishable.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    pub(crate) fn png(width: u32, height: u32) -> RasterImage {
        RasterImage::decode("sample.png", png_bytes(width, height)).unwrap()
    }

    #[test]
    fn decode_reads_mime_and_dimensions() {
        let image = png(40, 30);
        assert_eq!(image.mime(), "image/png");
        assert_eq!(image.dimensions(), (40, 30));
        assert_eq!(image.name(), "sample.png");
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(RasterImage::decode("junk.png", b"not an image".to_vec()).is_err());
    }

    #[test]
    fn decode_leaves_pixel_data_encoded() {
        let mut bytes = png_bytes(16, 16);
        // Damage the tail of the image data; the header is untouched.
        let end = bytes.len() - 12;
        for byte in &mut bytes[end - 8..end] {
            *byte ^= 0xff;
        }

        let image = RasterImage::decode("damaged.png", bytes).unwrap();
        assert_eq!(image.dimensions(), (16, 16));
        assert!(image.to_dynamic().is_err());
    }

    #[test]
    fn data_uri_round_trip_keeps_bytes() {
        let image = png(8, 6);
        let uri = image.data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let restored = RasterImage::from_data_uri("copy.png", &uri).unwrap();
        assert_eq!(restored, image);
        assert_ne!(restored.id(), image.id());
        assert_eq!(restored.dimensions(), (8, 6));
    }

    #[test]
    fn malformed_data_uris_are_errors() {
        assert!(RasterImage::from_data_uri("x", "http://example.com/a.png").is_err());
        assert!(RasterImage::from_data_uri("x", "data:image/png,plain").is_err());
        assert!(RasterImage::from_data_uri("x", "data:image/png;base64,@@@").is_err());
    }

    #[tokio::test]
    async fn read_loads_file_from_disk() {
        let dir = std::env::temp_dir().join(format!("product-entry-read-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("photo.png");
        std::fs::write(&path, png_bytes(12, 9)).unwrap();

        let image = RasterImage::read(path.clone()).await.unwrap();
        assert_eq!(image.name(), "photo.png");
        assert_eq!(image.dimensions(), (12, 9));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn read_missing_file_fails() {
        let missing = std::env::temp_dir().join("product-entry-definitely-missing.png");
        assert!(RasterImage::read(missing).await.is_err());
    }
}
