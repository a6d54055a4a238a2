//! Path-based asset loading. Decoded data comes back as opaque handles;
//! failures carry the offending path so scenes can substitute placeholders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to load asset {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl AssetError {
    fn load(path: &Path, source: impl Into<anyhow::Error>) -> Self {
        Self::Load {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Decoded RGBA image.
#[derive(Clone)]
pub struct ImageHandle {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rgba: Arc<[u8]>,
}

impl std::fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHandle")
            .field("path", &self.path)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Raw font bytes; parsing happens in the font cache.
#[derive(Clone)]
pub struct FontAsset {
    pub path: PathBuf,
    pub data: Arc<[u8]>,
}

/// Undecoded sound bytes; playback is outside the framework.
#[derive(Clone)]
pub struct SoundHandle {
    pub path: PathBuf,
    pub data: Arc<[u8]>,
}

/// Loads assets relative to a root directory.
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn load_image(&self, path: impl AsRef<Path>) -> Result<ImageHandle, AssetError> {
        let full = self.resolve(path.as_ref());
        let img = image::open(&full)
            .map_err(|e| AssetError::load(&full, e))?
            .into_rgba8();
        let (width, height) = img.dimensions();
        Ok(ImageHandle {
            path: full,
            width,
            height,
            rgba: Arc::from(img.into_raw().into_boxed_slice()),
        })
    }

    pub fn load_font(&self, path: impl AsRef<Path>) -> Result<FontAsset, AssetError> {
        let full = self.resolve(path.as_ref());
        let data = std::fs::read(&full).map_err(|e| AssetError::load(&full, e))?;
        Ok(FontAsset {
            path: full,
            data: Arc::from(data.into_boxed_slice()),
        })
    }

    pub fn load_sound(&self, path: impl AsRef<Path>) -> Result<SoundHandle, AssetError> {
        let full = self.resolve(path.as_ref());
        let data = std::fs::read(&full).map_err(|e| AssetError::load(&full, e))?;
        Ok(SoundHandle {
            path: full,
            data: Arc::from(data.into_boxed_slice()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let loader = AssetLoader::new(dir.path());
        let err = loader.load_image("nope.png").unwrap_err();
        let AssetError::Load { path, .. } = err;
        assert!(path.ends_with("nope.png"));
    }

    #[test]
    fn decodes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let loader = AssetLoader::new(dir.path());
        let handle = loader.load_image("dot.png").unwrap();
        assert_eq!((handle.width, handle.height), (2, 3));
        assert_eq!(handle.rgba.len(), 2 * 3 * 4);
        assert_eq!(&handle.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn absolute_paths_bypass_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, b"data").unwrap();

        let loader = AssetLoader::new("/somewhere/else");
        let handle = loader.load_sound(&path).unwrap();
        assert_eq!(&*handle.data, b"data");
    }
}
