//! `ember` binary: windowed field or headless PNG snapshot.

use std::path::PathBuf;

use clap::Parser;

use ember::{AppError, FieldConfig, FixedStepHost, FrameLoop, PixelCanvas};

#[derive(Parser)]
#[command(name = "ember")]
#[command(about = "Cursor-reactive firefly particle field", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON file with field settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render headlessly and write the last frame to this PNG file
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// Number of simulated 60 Hz frames for --snapshot
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Canvas size for --snapshot
    #[arg(long, value_name = "WxH", default_value = "1280x720", value_parser = parse_size)]
    size: (u32, u32),

    /// Seed for reproducible particle sets
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_size(text: &str) -> Result<(u32, u32), String> {
    let (w, h) = text
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", text))?;
    let width = w.trim().parse::<u32>().map_err(|e| format!("width: {}", e))?;
    let height = h.trim().parse::<u32>().map_err(|e| format!("height: {}", e))?;
    if width == 0 || height == 0 {
        return Err("size must be non-zero".to_string());
    }
    Ok((width, height))
}

/// Default log filter for a `-v` count. `RUST_LOG` still overrides it.
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    let config = match &cli.config {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            FieldConfig::load(path)?
        }
        None => FieldConfig::default(),
    };

    match cli.snapshot {
        Some(path) => {
            let (width, height) = cli.size;
            let mut canvas = PixelCanvas::new(width, height)?;
            let mut frame_loop = FrameLoop::new(width, height, config, cli.seed);
            frame_loop.run(&mut FixedStepHost::new(cli.frames), &mut canvas);
            canvas.save_png(&path)?;
            Ok(())
        }
        None => ember::window::run(config, cli.seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("640x480"), Ok((640, 480)));
        assert_eq!(parse_size("10X20"), Ok((10, 20)));
        assert!(parse_size("640").is_err());
        assert!(parse_size("0x480").is_err());
        assert!(parse_size("ax480").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["ember"]);
        assert!(cli.snapshot.is_none());
        assert_eq!(cli.frames, 120);
        assert_eq!(cli.size, (1280, 720));
        assert_eq!(log_filter(cli.verbose), "info");
    }

    #[test]
    fn test_verbose_raises_log_filter() {
        assert_eq!(log_filter(Cli::parse_from(["ember", "-v"]).verbose), "debug");
        assert_eq!(log_filter(Cli::parse_from(["ember", "-vv"]).verbose), "trace");
        assert_eq!(log_filter(Cli::parse_from(["ember", "-vvvv"]).verbose), "trace");
    }

    #[test]
    fn test_cli_snapshot_args() {
        let cli = Cli::parse_from([
            "ember", "--snapshot", "out.png", "--frames", "3", "--size", "320x200", "--seed", "7",
        ]);
        assert_eq!(cli.snapshot, Some(PathBuf::from("out.png")));
        assert_eq!(cli.frames, 3);
        assert_eq!(cli.size, (320, 200));
        assert_eq!(cli.seed, Some(7));
    }
}
