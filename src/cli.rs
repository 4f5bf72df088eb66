use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "panseared")]
#[command(about = "A guided pan-seared fish walkthrough with live ambient sound")]
pub struct Cli {
    /// Read settings from this file instead of the user config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Starting master volume, 0.0 to 1.0.
    #[arg(long)]
    pub volume: Option<f32>,

    /// Multiply every step duration (0.5 plays twice as fast).
    #[arg(long)]
    pub time_scale: Option<f64>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,

    /// Render the whole walkthrough to a WAV file and exit.
    #[arg(long, value_name = "WAV")]
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "panseared",
            "--volume",
            "0.3",
            "--time-scale",
            "0.5",
            "-v",
            "--export",
            "out.wav",
        ]);
        assert_eq!(cli.volume, Some(0.3));
        assert_eq!(cli.time_scale, Some(0.5));
        assert!(cli.verbose);
        assert_eq!(cli.export, Some(PathBuf::from("out.wav")));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn no_flags_is_interactive() {
        let cli = Cli::parse_from(["panseared"]);
        assert!(cli.export.is_none());
        assert!(!cli.verbose);
    }
}
