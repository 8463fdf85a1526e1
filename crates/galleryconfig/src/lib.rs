use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to read configuration at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Interpolation curve names accepted in the `[transition]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EaseSetting {
    Linear,
    Smoothstep,
    #[serde(alias = "power3.inOut")]
    CubicInOut,
    #[serde(alias = "power4.inOut")]
    QuartInOut,
}

/// What the timeline does when a trigger fires while a schedule is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Start the new schedule anyway; the newest write to a field wins.
    #[default]
    Overlap,
    /// Drop the trigger without advancing the gallery.
    Skip,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GalleryConfig {
    pub version: u32,
    #[serde(default)]
    pub gallery: Gallery,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub transition: Transition,
    #[serde(default)]
    pub scene: Scene,
    #[serde(default)]
    pub render: Render,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Gallery {
    #[serde(default)]
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub mask: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Trigger {
    #[serde(
        default = "default_interval",
        deserialize_with = "deserialize_duration"
    )]
    pub interval: Duration,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Transition {
    #[serde(
        default = "default_camera_travel",
        deserialize_with = "deserialize_duration"
    )]
    pub camera_travel: Duration,
    #[serde(
        default = "default_half_leg",
        deserialize_with = "deserialize_duration"
    )]
    pub camera_dip: Duration,
    #[serde(
        default = "default_half_leg",
        deserialize_with = "deserialize_duration"
    )]
    pub effect: Duration,
    #[serde(default = "default_near_z")]
    pub camera_near_z: f32,
    #[serde(default = "default_far_z")]
    pub camera_far_z: f32,
    #[serde(default = "default_camera_ease")]
    pub camera_ease: EaseSetting,
    #[serde(default = "default_effect_ease")]
    pub effect_ease: EaseSetting,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scene {
    #[serde(default = "default_panel_spacing")]
    pub panel_spacing: f32,
    #[serde(default = "default_layers")]
    pub layers: usize,
    #[serde(default = "default_pointer_lerp")]
    pub pointer_lerp: f32,
    #[serde(default = "default_pointer_sensitivity")]
    pub pointer_sensitivity: f32,
    #[serde(default = "default_oscillator_step")]
    pub oscillator_step: f32,
    #[serde(default = "default_oscillator_frequency")]
    pub oscillator_frequency: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Render {
    #[serde(
        default = "default_surface_size",
        deserialize_with = "deserialize_surface_size"
    )]
    pub size: (u32, u32),
    #[serde(default = "default_render_scale")]
    pub render_scale: f32,
    #[serde(default)]
    pub fps: Option<f32>,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            overlap: OverlapPolicy::default(),
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            camera_travel: default_camera_travel(),
            camera_dip: default_half_leg(),
            effect: default_half_leg(),
            camera_near_z: default_near_z(),
            camera_far_z: default_far_z(),
            camera_ease: default_camera_ease(),
            effect_ease: default_effect_ease(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            panel_spacing: default_panel_spacing(),
            layers: default_layers(),
            pointer_lerp: default_pointer_lerp(),
            pointer_sensitivity: default_pointer_sensitivity(),
            oscillator_step: default_oscillator_step(),
            oscillator_frequency: default_oscillator_frequency(),
        }
    }
}

impl Default for Render {
    fn default() -> Self {
        Self {
            size: default_surface_size(),
            render_scale: default_render_scale(),
            fps: None,
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gallery: Gallery::default(),
            trigger: Trigger::default(),
            transition: Transition::default(),
            scene: Scene::default(),
            render: Render::default(),
        }
    }
}

fn default_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_camera_travel() -> Duration {
    Duration::from_secs_f32(1.5)
}

fn default_half_leg() -> Duration {
    Duration::from_secs(1)
}

fn default_near_z() -> f32 {
    700.0
}

fn default_far_z() -> f32 {
    900.0
}

fn default_camera_ease() -> EaseSetting {
    EaseSetting::QuartInOut
}

fn default_effect_ease() -> EaseSetting {
    EaseSetting::CubicInOut
}

fn default_panel_spacing() -> f32 {
    2500.0
}

fn default_layers() -> usize {
    3
}

fn default_pointer_lerp() -> f32 {
    0.1
}

fn default_pointer_sensitivity() -> f32 {
    0.3
}

fn default_oscillator_step() -> f32 {
    0.05
}

fn default_oscillator_frequency() -> f32 {
    0.1
}

fn default_surface_size() -> (u32, u32) {
    (1280, 720)
}

fn default_render_scale() -> f32 {
    0.5
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_duration_opt(deserializer)?
        .ok_or_else(|| de::Error::custom("duration must not be empty"))
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn deserialize_surface_size<'de, D>(deserializer: D) -> Result<(u32, u32), D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper {
        Str(String),
        Pair([u32; 2]),
    }

    match Helper::deserialize(deserializer)? {
        Helper::Str(raw) => parse_surface_size(&raw).map_err(de::Error::custom),
        Helper::Pair([width, height]) => {
            if width == 0 || height == 0 {
                Err(de::Error::custom("surface dimensions must be greater than zero"))
            } else {
                Ok((width, height))
            }
        }
    }
}

/// Parses `WIDTHxHEIGHT` (also `X` or `×` as separator).
pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X', '×'])
        .ok_or_else(|| "expected WxH format, e.g. 1920x1080".to_string())?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| "invalid width in size specification".to_string())?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| "invalid height in size specification".to_string())?;

    if width == 0 || height == 0 {
        return Err("surface dimensions must be greater than zero".to_string());
    }

    Ok((width, height))
}

impl GalleryConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: GalleryConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Image paths resolved against `base` (usually the config file's directory).
    pub fn image_paths(&self, base: &Path) -> Vec<PathBuf> {
        self.gallery
            .images
            .iter()
            .map(|path| resolve_relative(base, path))
            .collect()
    }

    pub fn mask_path(&self, base: &Path) -> Option<PathBuf> {
        self.gallery
            .mask
            .as_ref()
            .map(|path| resolve_relative(base, path))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        for image in &self.gallery.images {
            if image.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "gallery contains an image with an empty path".into(),
                ));
            }
        }

        if let Some(mask) = &self.gallery.mask {
            if mask.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("gallery.mask may not be empty".into()));
            }
        }

        if self.trigger.interval.is_zero() {
            return Err(ConfigError::Invalid(
                "trigger.interval must be greater than zero".into(),
            ));
        }

        let transition = &self.transition;
        for (name, value) in [
            ("camera_travel", transition.camera_travel),
            ("camera_dip", transition.camera_dip),
            ("effect", transition.effect),
        ] {
            if value.is_zero() {
                return Err(ConfigError::Invalid(format!(
                    "transition.{name} must be greater than zero"
                )));
            }
        }

        let scene = &self.scene;
        if !(scene.panel_spacing > 0.0) {
            return Err(ConfigError::Invalid(
                "scene.panel_spacing must be greater than zero".into(),
            ));
        }

        if scene.layers == 0 {
            return Err(ConfigError::Invalid(
                "scene.layers must be at least 1".into(),
            ));
        }

        if !(scene.pointer_lerp > 0.0 && scene.pointer_lerp <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "scene.pointer_lerp must be in (0, 1]; got {}",
                scene.pointer_lerp
            )));
        }

        if !(self.render.render_scale > 0.0 && self.render.render_scale <= 4.0) {
            return Err(ConfigError::Invalid(format!(
                "render.render_scale must be in (0, 4]; got {}",
                self.render.render_scale
            )));
        }

        if let Some(fps) = self.render.fps {
            if fps < 0.0 {
                return Err(ConfigError::Invalid("render.fps must be >= 0".into()));
            }
        }

        Ok(())
    }
}

fn resolve_relative(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1

[gallery]
images = ["img/1.jpg", "img/2.jpg", "/abs/3.jpg"]
mask = "img/mask.jpg"

[trigger]
interval = "4s"
overlap = "skip"

[transition]
camera_travel = 2
effect = "750ms"
camera_ease = "power4.inOut"
effect_ease = "linear"

[scene]
layers = 4

[render]
size = "800x600"
render_scale = 1.0
fps = 30
"#;

    #[test]
    fn parses_sample_config() {
        let config = GalleryConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.gallery.images.len(), 3);
        assert_eq!(config.trigger.interval, Duration::from_secs(4));
        assert_eq!(config.trigger.overlap, OverlapPolicy::Skip);
        assert_eq!(config.transition.camera_travel, Duration::from_secs(2));
        assert_eq!(config.transition.effect, Duration::from_millis(750));
        assert_eq!(config.transition.camera_dip, Duration::from_secs(1));
        assert_eq!(config.transition.camera_ease, EaseSetting::QuartInOut);
        assert_eq!(config.transition.effect_ease, EaseSetting::Linear);
        assert_eq!(config.scene.layers, 4);
        assert_eq!(config.render.size, (800, 600));
        assert_eq!(config.render.fps, Some(30.0));
    }

    #[test]
    fn minimal_config_uses_builtin_constants() {
        let config = GalleryConfig::from_toml_str("version = 1").expect("parse config");
        assert!(config.gallery.images.is_empty());
        assert_eq!(config.trigger.interval, Duration::from_secs(5));
        assert_eq!(config.trigger.overlap, OverlapPolicy::Overlap);
        assert_eq!(config.transition.camera_travel, Duration::from_secs_f32(1.5));
        assert_eq!(config.transition.camera_near_z, 700.0);
        assert_eq!(config.transition.camera_far_z, 900.0);
        assert_eq!(config.transition.effect_ease, EaseSetting::CubicInOut);
        assert_eq!(config.scene.panel_spacing, 2500.0);
        assert_eq!(config.scene.layers, 3);
        assert!((config.scene.pointer_lerp - 0.1).abs() < f32::EPSILON);
        assert!((config.scene.pointer_sensitivity - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn resolves_relative_paths_against_base() {
        let config = GalleryConfig::from_toml_str(SAMPLE).unwrap();
        let base = Path::new("/srv/gallery");
        let paths = config.image_paths(base);
        assert_eq!(paths[0], PathBuf::from("/srv/gallery/img/1.jpg"));
        assert_eq!(paths[2], PathBuf::from("/abs/3.jpg"));
        assert_eq!(
            config.mask_path(base),
            Some(PathBuf::from("/srv/gallery/img/mask.jpg"))
        );
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = GalleryConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_interval() {
        let err = GalleryConfig::from_toml_str(
            r#"
version = 1

[trigger]
interval = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_pointer_lerp() {
        let err = GalleryConfig::from_toml_str(
            r#"
version = 1

[scene]
pointer_lerp = 1.5
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_negative_duration() {
        let err = GalleryConfig::from_toml_str(
            r#"
version = 1

[transition]
effect = -1
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_non_finite_duration() {
        for input in [
            "version = 1\n[trigger]\ninterval = inf\n",
            "version = 1\n[trigger]\ninterval = nan\n",
            "version = 1\n[transition]\neffect = 1e300\n",
        ] {
            let err = GalleryConfig::from_toml_str(input).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{input}");
        }
    }

    #[test]
    fn accepts_size_pairs() {
        let config = GalleryConfig::from_toml_str(
            r#"
version = 1

[render]
size = [640, 480]
"#,
        )
        .unwrap();
        assert_eq!(config.render.size, (640, 480));
    }

    #[test]
    fn parse_surface_size_rejects_zero() {
        assert_eq!(parse_surface_size("1920x1080"), Ok((1920, 1080)));
        assert!(parse_surface_size("0x1080").is_err());
        assert!(parse_surface_size("1920").is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GalleryConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        fs::write(&path, SAMPLE).unwrap();
        let config = GalleryConfig::load(&path).unwrap();
        assert_eq!(config.gallery.images.len(), 3);
    }
}
