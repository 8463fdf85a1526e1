use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use galleryconfig::parse_surface_size;

#[derive(Parser, Debug)]
#[command(
    name = "curtainwipe",
    author,
    version,
    about = "3D image gallery with curtain wipe transitions",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Gallery config file; defaults to `gallery.toml` in the config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Use the built-in procedural gallery instead of the configured images.
    #[arg(long)]
    pub demo: bool,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Offscreen render size relative to the window (e.g. `0.5`).
    #[arg(long, value_name = "SCALE")]
    pub render_scale: Option<f32>,

    /// Optional FPS cap for the window (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Time between automatic transitions (`5s`, `1500ms`, or seconds).
    #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
    pub interval: Option<Duration>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render frames headless into a directory of PNG files.
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Output directory (created if missing).
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Number of frames to write.
    #[arg(long, value_name = "COUNT", default_value_t = 150)]
    pub frames: u32,

    /// Simulated frame rate.
    #[arg(long, value_name = "FPS", default_value_t = 30.0)]
    pub fps: f32,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_interval(value: &str) -> Result<Duration, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("interval must not be empty".to_string());
    }

    let interval = match trimmed.parse::<f64>() {
        Ok(seconds) => Duration::try_from_secs_f64(seconds)
            .map_err(|err| format!("invalid interval '{trimmed}': {err}"))?,
        Err(_) => humantime::parse_duration(trimmed)
            .map_err(|err| format!("invalid interval '{trimmed}': {err}"))?,
    };

    if interval.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_flags() {
        let cli = Cli::try_parse_from([
            "curtainwipe",
            "--demo",
            "--size",
            "800x600",
            "--render-scale",
            "0.25",
            "--interval",
            "2s",
        ])
        .unwrap();
        assert!(cli.run.demo);
        assert_eq!(cli.run.size, Some((800, 600)));
        assert_eq!(cli.run.render_scale, Some(0.25));
        assert_eq!(cli.run.interval, Some(Duration::from_secs(2)));
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_export_subcommand_with_defaults() {
        let cli = Cli::try_parse_from(["curtainwipe", "--demo", "export", "--out", "frames"])
            .unwrap();
        match cli.command {
            Some(Command::Export(args)) => {
                assert_eq!(args.out, PathBuf::from("frames"));
                assert_eq!(args.frames, 150);
                assert_eq!(args.fps, 30.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_size() {
        assert!(Cli::try_parse_from(["curtainwipe", "--size", "wide"]).is_err());
    }

    #[test]
    fn interval_accepts_seconds_and_humantime() {
        assert_eq!(parse_interval("1.5").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_interval("250ms").unwrap(), Duration::from_millis(250));
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("-3").is_err());
        assert!(parse_interval("soon").is_err());
        assert!(parse_interval("inf").is_err());
        assert!(parse_interval("1e300").is_err());
    }
}
