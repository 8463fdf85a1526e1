use image::{Rgba, RgbaImage};

/// Source of decoded gallery images and the shared alpha mask.
///
/// Slots that failed to load report `None`; the scene turns that into a
/// [`crate::SceneError`] instead of rendering a partial group.
pub trait AssetProvider {
    fn image_count(&self) -> usize;
    fn image(&self, index: usize) -> Option<&RgbaImage>;
    fn mask(&self) -> Option<&RgbaImage>;
}

/// Images already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssets {
    images: Vec<Option<RgbaImage>>,
    mask: Option<RgbaImage>,
}

impl InMemoryAssets {
    pub fn new(images: Vec<RgbaImage>, mask: RgbaImage) -> Self {
        Self {
            images: images.into_iter().map(Some).collect(),
            mask: Some(mask),
        }
    }

    /// Builds a provider from possibly-missing slots.
    pub fn from_slots(images: Vec<Option<RgbaImage>>, mask: Option<RgbaImage>) -> Self {
        Self { images, mask }
    }
}

impl AssetProvider for InMemoryAssets {
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

/// Procedural gallery: diagonal gradients with a distinct hue per image and
/// a soft radial mask.
pub fn demo_assets(count: usize, width: u32, height: u32) -> InMemoryAssets {
    let images = (0..count)
        .map(|index| demo_image(index, count.max(1), width, height))
        .collect();
    InMemoryAssets::new(images, radial_mask(width, height))
}

fn demo_image(index: usize, count: usize, width: u32, height: u32) -> RgbaImage {
    let hue = index as f32 / count as f32;
    let base = hue_to_rgb(hue);
    let accent = hue_to_rgb((hue + 0.5).fract());
    RgbaImage::from_fn(width, height, |x, y| {
        let t = (x as f32 / width.max(1) as f32 + y as f32 / height.max(1) as f32) * 0.5;
        let stripe = if (x / 64 + y / 64) % 2 == 0 { 1.0 } else { 0.85 };
        let mut rgb = [0u8; 3];
        for channel in 0..3 {
            let mixed = base[channel] * (1.0 - t) + accent[channel] * t;
            rgb[channel] = (mixed * stripe * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        Rgba([rgb[0], rgb[1], rgb[2], 255])
    })
}

fn radial_mask(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let dx = (x as f32 + 0.5) / width.max(1) as f32 - 0.5;
        let dy = (y as f32 + 0.5) / height.max(1) as f32 - 0.5;
        let distance = (dx * dx + dy * dy).sqrt() * 2.0;
        let falloff = (1.0 - distance).clamp(0.0, 1.0);
        let value = (falloff * falloff * (3.0 - 2.0 * falloff) * 255.0).round() as u8;
        Rgba([value, value, value, 255])
    })
}

fn hue_to_rgb(hue: f32) -> [f32; 3] {
    let h = hue * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        3 => [0.0, x, 1.0],
        4 => [x, 0.0, 1.0],
        _ => [1.0, 0.0, x],
    }
}
