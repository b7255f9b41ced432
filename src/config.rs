use std::path::PathBuf;

use clap::Parser;

use crate::constants::*;

/// Full-screen flip showcase of paired images and videos.
#[derive(Parser, Debug)]
#[command(name = "flipshow", version, about)]
pub struct Args {
    /// JSON catalog listing the entries to show
    pub catalog: PathBuf,

    /// Seconds between automatic forward flips, 0 to disable
    #[arg(short, long, default_value_t = AUTO_ADVANCE_INTERVAL)]
    pub interval: f32,

    /// Columns of the secondary region
    #[arg(long, default_value_t = GRID_CELLS)]
    pub cells: usize,

    /// Prefer the lighter mobile variants of the media
    #[arg(long)]
    pub compact: bool,

    /// Shuffle the entries once at startup
    #[arg(long)]
    pub shuffle: bool,

    /// Also encode every rendered frame to this video file (requires ffmpeg)
    #[arg(short, long)]
    pub record: Option<PathBuf>,

    /// Run in a resizable window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,
}

/// Runtime settings of the showcase engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShowcaseOptions {
    pub interval: Option<f32>,
    pub flip_duration: f32,
    pub slide_duration: f32,
    pub cells: usize,
    pub compact: bool,
}

impl Default for ShowcaseOptions {
    fn default() -> Self {
        Self {
            interval: Some(AUTO_ADVANCE_INTERVAL),
            flip_duration: FLIP_DURATION,
            slide_duration: SLIDE_DURATION,
            cells: GRID_CELLS,
            compact: false,
        }
    }
}

impl From<&Args> for ShowcaseOptions {
    fn from(args: &Args) -> Self {
        Self {
            interval: (args.interval > 0.0).then_some(args.interval),
            cells: args.cells.max(1),
            compact: args.compact,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["flipshow", "catalog.json"]).unwrap();
        assert_eq!(args.catalog, PathBuf::from("catalog.json"));
        assert!(args.record.is_none());
        assert!(!args.windowed);
        let options = ShowcaseOptions::from(&args);
        assert_eq!(options, ShowcaseOptions::default());
        assert_eq!(options.interval, Some(8.0));
        assert_eq!(options.cells, 8);
    }

    #[test]
    fn test_zero_interval_disables_auto_advance() {
        let args = Args::try_parse_from(["flipshow", "c.json", "--interval", "0", "--cells", "0", "--compact"]).unwrap();
        let options = ShowcaseOptions::from(&args);
        assert_eq!(options.interval, None);
        assert_eq!(options.cells, 1);
        assert!(options.compact);
    }

    #[test]
    fn test_record_path() {
        let args = Args::try_parse_from(["flipshow", "c.json", "-r", "out.mp4", "--shuffle"]).unwrap();
        assert_eq!(args.record, Some(PathBuf::from("out.mp4")));
        assert!(args.shuffle);
    }

    #[test]
    fn test_windowed_flag() {
        let args = Args::try_parse_from(["flipshow", "c.json", "--windowed"]).unwrap();
        assert!(args.windowed);
        assert!(Args::try_parse_from(["flipshow", "c.json", "--fullscreen"]).is_err());
    }

    #[test]
    fn test_catalog_is_required() {
        assert!(Args::try_parse_from(["flipshow"]).is_err());
    }
}
