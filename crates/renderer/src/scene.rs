//! Panel groups, pointer-driven tilt and the oscillating layer depths.

use galleryconfig::GalleryConfig;
use glam::Vec2;
use image::RgbaImage;

use crate::assets::AssetProvider;
use crate::error::SceneError;
use crate::pointer::PointerState;

pub const PANEL_WIDTH: f32 = 1920.0;
pub const PANEL_HEIGHT: f32 = 1080.0;

/// Depth step between successive layers of one group.
const LAYER_SPACING: f32 = 100.0;
/// Peak-to-peak depth travel driven by the oscillator.
const OSCILLATION_DEPTH: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSettings {
    pub panel_spacing: f32,
    pub layers: usize,
    pub pointer_lerp: f32,
    pub pointer_sensitivity: f32,
    pub oscillator_step: f32,
    pub oscillator_frequency: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

impl SceneSettings {
    pub fn from_config(config: &GalleryConfig) -> Self {
        let scene = &config.scene;
        Self {
            panel_spacing: scene.panel_spacing,
            layers: scene.layers,
            pointer_lerp: scene.pointer_lerp,
            pointer_sensitivity: scene.pointer_sensitivity,
            oscillator_step: scene.oscillator_step,
            oscillator_frequency: scene.oscillator_frequency,
        }
    }
}

/// Oscillator value in [0, 1] for the accumulated phase `time`.
pub fn oscillation(time: f32, frequency: f32) -> f32 {
    (time * frequency).sin() * 0.5 + 0.5
}

/// Depth of layer `layer` for oscillator value `oscillator`.
pub fn panel_depth(layer: usize, oscillator: f32) -> f32 {
    (layer as f32 + 1.0) * LAYER_SPACING - oscillator * OSCILLATION_DEPTH
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub layer: usize,
    /// Layer 0 is opaque; every other layer is cut out by the mask.
    pub masked: bool,
    pub depth: f32,
}

#[derive(Debug, Clone)]
pub struct ImagePanelGroup {
    index: usize,
    offset_x: f32,
    /// Euler angles (x, y) in radians, applied X then Y.
    rotation: Vec2,
    panels: Vec<Panel>,
    texture: RgbaImage,
}

impl ImagePanelGroup {
    fn new(index: usize, texture: RgbaImage, settings: &SceneSettings) -> Self {
        let panels = (0..settings.layers)
            .map(|layer| Panel {
                layer,
                masked: layer > 0,
                depth: panel_depth(layer, 0.0),
            })
            .collect();
        Self {
            index,
            offset_x: index as f32 * settings.panel_spacing,
            rotation: Vec2::ZERO,
            panels,
            texture,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn texture(&self) -> &RgbaImage {
        &self.texture
    }
}

/// All panel groups plus the per-frame ambient motion state.
#[derive(Debug, Clone)]
pub struct SceneModel {
    settings: SceneSettings,
    groups: Vec<ImagePanelGroup>,
    mask: RgbaImage,
    pointer: PointerState,
    time: f32,
    oscillator: f32,
}

impl SceneModel {
    /// Builds one group per provided image. Fails on the first missing slot.
    pub fn from_provider(
        provider: &dyn AssetProvider,
        settings: SceneSettings,
    ) -> Result<Self, SceneError> {
        let count = provider.image_count();
        if count == 0 {
            return Err(SceneError::EmptyGallery);
        }
        let mask = provider.mask().ok_or(SceneError::MissingMask)?.clone();
        let groups = (0..count)
            .map(|index| {
                provider
                    .image(index)
                    .map(|texture| ImagePanelGroup::new(index, texture.clone(), &settings))
                    .ok_or(SceneError::MissingAsset { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            groups = groups.len(),
            layers = settings.layers,
            "scene model initialised"
        );

        let mut scene = Self {
            settings,
            groups,
            mask,
            pointer: PointerState::new(settings.pointer_lerp),
            time: 0.0,
            oscillator: oscillation(0.0, settings.oscillator_frequency),
        };
        scene.apply_motion();
        Ok(scene)
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn groups(&self) -> &[ImagePanelGroup] {
        &self.groups
    }

    pub fn mask(&self) -> &RgbaImage {
        &self.mask
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn oscillator(&self) -> f32 {
        self.oscillator
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Pointer position in [0, 1] x [0, 1] from the host.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer.set_normalized(x, y);
    }

    /// One frame of ambient motion: pointer smoothing, oscillator phase,
    /// group tilt and layer depths.
    pub fn update(&mut self) {
        self.pointer.step();
        self.time += self.settings.oscillator_step;
        self.oscillator = oscillation(self.time, self.settings.oscillator_frequency);
        self.apply_motion();
    }

    fn apply_motion(&mut self) {
        let smoothed = self.pointer.smoothed();
        let sensitivity = self.settings.pointer_sensitivity;
        let rotation = Vec2::new(-smoothed.y * sensitivity, -smoothed.x * sensitivity);
        let oscillator = self.oscillator;
        for group in &mut self.groups {
            group.rotation = rotation;
            for panel in &mut group.panels {
                panel.depth = panel_depth(panel.layer, oscillator);
            }
        }
    }
}
