use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui::DroppedFile;
use image::DynamicImage;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A source could not be turned into a pixel buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{name}: cannot read file")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: not a decodable image")]
    Image {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("{name}: no image data")]
    Empty { name: String },
}

// ---------------------------------------------------------------------------
// Image sources
// ---------------------------------------------------------------------------

/// A named, not-yet-decoded image: one entry of a processing batch.
pub trait ImageSource {
    /// File name the label is derived from.
    fn name(&self) -> &str;

    /// Decode into a raster image.
    fn decode(&self) -> Result<DynamicImage, DecodeError>;
}

/// An image file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        FileSource { path, name }
    }
}

impl ImageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self) -> Result<DynamicImage, DecodeError> {
        let bytes = std::fs::read(&self.path).map_err(|source| DecodeError::Io {
            name: self.name.clone(),
            source,
        })?;
        decode_bytes(&self.name, &bytes)
    }
}

/// Image bytes already in memory (drag-and-drop without a path, tests).
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Option<Arc<[u8]>>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        MemorySource {
            name: name.into(),
            bytes: Some(bytes.into()),
        }
    }

    /// A source whose content never arrived.
    pub fn missing(name: impl Into<String>) -> Self {
        MemorySource {
            name: name.into(),
            bytes: None,
        }
    }
}

impl ImageSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self) -> Result<DynamicImage, DecodeError> {
        match &self.bytes {
            Some(bytes) => decode_bytes(&self.name, bytes),
            None => Err(DecodeError::Empty {
                name: self.name.clone(),
            }),
        }
    }
}

fn decode_bytes(name: &str, bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty {
            name: name.to_string(),
        });
    }
    image::load_from_memory(bytes).map_err(|source| DecodeError::Image {
        name: name.to_string(),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Adapters from the UI
// ---------------------------------------------------------------------------

/// Turn an egui drop event into a batch, keeping the drop order.
///
/// Native drops carry a path; web drops carry the bytes instead.
pub fn sources_from_dropped(files: &[DroppedFile]) -> Vec<Box<dyn ImageSource>> {
    files
        .iter()
        .map(|file| -> Box<dyn ImageSource> {
            if let Some(path) = &file.path {
                Box::new(FileSource::new(path.clone()))
            } else if let Some(bytes) = &file.bytes {
                Box::new(MemorySource::new(file.name.clone(), bytes.clone()))
            } else {
                Box::new(MemorySource::missing(file.name.clone()))
            }
        })
        .collect()
}

/// Wrap picked paths as a batch.
pub fn sources_from_paths(paths: Vec<PathBuf>) -> Vec<Box<dyn ImageSource>> {
    paths
        .into_iter()
        .map(|p| Box::new(FileSource::new(p)) as Box<dyn ImageSource>)
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    /// PNG-encode a solid image.
    pub(crate) fn png_bytes(w: u32, h: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn memory_source_decodes_png() {
        let src = MemorySource::new("a.png", png_bytes(4, 3, [255, 255, 255, 255]));
        let img = src.decode().unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert_eq!(src.name(), "a.png");
    }

    #[test]
    fn garbage_bytes_fail_with_image_error() {
        let src = MemorySource::new("bad.png", vec![1u8, 2, 3, 4]);
        assert!(matches!(src.decode(), Err(DecodeError::Image { .. })));
    }

    #[test]
    fn missing_or_empty_content_is_an_error() {
        assert!(matches!(
            MemorySource::missing("x.png").decode(),
            Err(DecodeError::Empty { .. })
        ));
        assert!(matches!(
            MemorySource::new("y.png", Vec::<u8>::new()).decode(),
            Err(DecodeError::Empty { .. })
        ));
    }

    #[test]
    fn file_source_uses_file_name_and_reports_io_errors() {
        let src = FileSource::new("/definitely/not/here/cat.png");
        assert_eq!(src.name(), "cat.png");
        let err = src.decode().unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
        assert_eq!(err.to_string(), "cat.png: cannot read file");
    }

    #[test]
    fn dropped_files_prefer_path_then_bytes() {
        let dropped = vec![
            DroppedFile {
                path: Some(PathBuf::from("/tmp/one.png")),
                ..Default::default()
            },
            DroppedFile {
                name: "two.png".to_string(),
                bytes: Some(png_bytes(1, 1, [0, 0, 0, 255]).into()),
                ..Default::default()
            },
            DroppedFile {
                name: "three.png".to_string(),
                ..Default::default()
            },
        ];
        let sources = sources_from_dropped(&dropped);
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["one.png", "two.png", "three.png"]);
        assert!(sources[1].decode().is_ok());
        assert!(matches!(sources[2].decode(), Err(DecodeError::Empty { .. })));
    }
}
