//! Photo intake: turn a file or byte buffer into a decoded [`Photo`].
//!
//! The picker hands us either a photo or nothing (the user cancelled). When
//! the photo comes from disk we check existence and read permission first so
//! callers get a meaningful error rather than a decoder message about an
//! empty buffer.

use crate::error::DiaryError;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A captured or selected photo, decoded and ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    image: DynamicImage,
}

impl Photo {
    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode a PNG or JPEG held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, image::ImageError> {
        Ok(Self {
            image: image::load_from_memory(bytes)?,
        })
    }

    /// Load a photo from disk, validating the path before decoding.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DiaryError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DiaryError::PhotoNotFound { path });
        }

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(DiaryError::PermissionDenied { path });
            }
            Err(_) => return Err(DiaryError::PhotoNotFound { path }),
        };

        let photo = Self::from_bytes(&bytes).map_err(|e| not_an_image(&path, e))?;
        debug!(
            "Loaded photo {} ({}×{})",
            path.display(),
            photo.width(),
            photo.height()
        );
        Ok(photo)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl From<DynamicImage> for Photo {
    fn from(image: DynamicImage) -> Self {
        Self::from_image(image)
    }
}

fn not_an_image(path: &Path, e: image::ImageError) -> DiaryError {
    DiaryError::NotAnImage {
        path: PathBuf::from(path),
        detail: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([0, 128, 255, 255])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("png encode");
        buf
    }

    #[test]
    fn from_bytes_decodes_png() {
        let photo = Photo::from_bytes(&png_bytes()).expect("decode");
        assert_eq!((photo.width(), photo.height()), (3, 2));
    }

    #[test]
    fn open_missing_file() {
        let err = Photo::open("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, DiaryError::PhotoNotFound { .. }), "got: {err:?}");
    }

    #[test]
    fn open_rejects_non_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"dear diary").expect("write");

        let err = Photo::open(&path).unwrap_err();
        assert!(matches!(err, DiaryError::NotAnImage { .. }), "got: {err:?}");
    }

    #[test]
    fn open_reads_png_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("beach.png");
        std::fs::write(&path, png_bytes()).expect("write");

        let photo = Photo::open(&path).expect("open");
        assert_eq!(photo.width(), 3);
    }
}
