use std::path::{Path, PathBuf};

use image::RgbaImage;
use renderer::AssetProvider;

/// Gallery images and mask decoded from disk.
///
/// Files that fail to decode stay as empty slots; the stage refuses to build
/// a scene from them.
#[derive(Debug, Default)]
pub struct DiskAssets {
    images: Vec<Option<RgbaImage>>,
    mask: Option<RgbaImage>,
}

impl DiskAssets {
    pub fn load(images: &[PathBuf], mask: Option<&Path>) -> Self {
        let images: Vec<_> = images.iter().map(|path| decode(path)).collect();
        let mask = match mask {
            Some(path) => decode(path),
            None => {
                tracing::warn!("gallery config does not name a mask image");
                None
            }
        };
        let loaded = images.iter().filter(|slot| slot.is_some()).count();
        tracing::info!(loaded, total = images.len(), mask = mask.is_some(), "decoded gallery");
        Self { images, mask }
    }
}

impl AssetProvider for DiskAssets {
    fn image_count(&self) -> usize {
        self.images.len()
    }

    fn image(&self, index: usize) -> Option<&RgbaImage> {
        self.images.get(index).and_then(Option::as_ref)
    }

    fn mask(&self) -> Option<&RgbaImage> {
        self.mask.as_ref()
    }
}

fn decode(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            tracing::debug!(
                path = %path.display(),
                width = rgba.width(),
                height = rgba.height(),
                "decoded image"
            );
            Some(rgba)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to decode image");
            None
        }
    }
}
