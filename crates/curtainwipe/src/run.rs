use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use galleryconfig::GalleryConfig;
use renderer::{demo_assets, AssetProvider, RenderPolicy, Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::assets::DiskAssets;
use crate::cli::{Cli, Command, RunArgs};
use crate::paths::AppPaths;

const DEMO_IMAGE_COUNT: usize = 6;
const DEMO_IMAGE_SIZE: (u32, u32) = (960, 540);

pub fn run(cli: Cli) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    tracing::debug!(config = %paths.config_dir().display(), "resolved curtainwipe paths");

    let (config, base_dir) = load_gallery_config(&cli.run, &paths)?;
    let config = apply_overrides(config, &cli.run)?;
    let policy = render_policy(&config, cli.command.as_ref());
    let assets = gallery_assets(&cli.run, &config, &base_dir);

    tracing::info!(
        images = assets.image_count(),
        policy = ?policy,
        "starting curtainwipe"
    );
    let renderer = Renderer::new(RendererConfig::from_gallery_config(&config, policy));
    renderer.run(assets.as_ref())
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the gallery file and returns it with the directory its relative
/// paths resolve against. A missing default file falls back to built-in
/// settings; a missing explicit `--config` is an error.
fn load_gallery_config(args: &RunArgs, paths: &AppPaths) -> Result<(GalleryConfig, PathBuf)> {
    let (path, explicit) = match &args.config {
        Some(path) => (path.clone(), true),
        None => (paths.gallery_file(), false),
    };

    if !explicit && !path.exists() {
        tracing::info!(path = %path.display(), "no gallery config found; using defaults");
        return Ok((GalleryConfig::default(), paths.config_dir().to_path_buf()));
    }

    let config = GalleryConfig::load(&path)
        .with_context(|| format!("failed to load gallery config {}", path.display()))?;
    tracing::info!(path = %path.display(), images = config.gallery.images.len(), "loaded gallery config");
    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base_dir))
}

fn apply_overrides(mut config: GalleryConfig, args: &RunArgs) -> Result<GalleryConfig> {
    if let Some(size) = args.size {
        config.render.size = size;
    }
    if let Some(scale) = args.render_scale {
        config.render.render_scale = scale;
    }
    if let Some(fps) = args.fps {
        config.render.fps = Some(fps);
    }
    if let Some(interval) = args.interval {
        config.trigger.interval = interval;
    }
    config
        .validate()
        .context("invalid command line override")?;
    Ok(config)
}

fn render_policy(config: &GalleryConfig, command: Option<&Command>) -> RenderPolicy {
    match command {
        Some(Command::Export(export)) => RenderPolicy::Export {
            directory: export.out.clone(),
            frames: export.frames,
            fps: export.fps,
        },
        None => RenderPolicy::Animate {
            target_fps: config.render.fps.filter(|fps| *fps > 0.0),
        },
    }
}

fn gallery_assets(
    args: &RunArgs,
    config: &GalleryConfig,
    base_dir: &Path,
) -> Box<dyn AssetProvider> {
    if args.demo {
        tracing::info!("using procedural demo gallery");
        return Box::new(demo_gallery());
    }
    if config.gallery.images.is_empty() {
        tracing::warn!("gallery config lists no images; using procedural demo gallery");
        return Box::new(demo_gallery());
    }

    let images = config.image_paths(base_dir);
    let mask = config.mask_path(base_dir);
    Box::new(DiskAssets::load(&images, mask.as_deref()))
}

fn demo_gallery() -> impl AssetProvider {
    demo_assets(DEMO_IMAGE_COUNT, DEMO_IMAGE_SIZE.0, DEMO_IMAGE_SIZE.1)
}
