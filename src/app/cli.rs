use clap::Parser;
use std::path::PathBuf;

/// Glyphix - a keyboard-driven music player for your terminal 🎵
#[derive(Parser, Debug)]
#[command(name = "glyphix", version, about)]
pub struct Args {
    /// Folder to browse, or a file to start playing right away
    pub path: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    /// Path to the mpv binary
    #[arg(long, value_name = "PATH")]
    pub mpv: Option<PathBuf>,

    /// Write log files here
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["glyphix", "/music/a.mp3", "--mpv", "/opt/mpv", "--log-dir", "/tmp/logs"]);
        assert_eq!(args.path, Some(PathBuf::from("/music/a.mp3")));
        assert_eq!(args.mpv, Some(PathBuf::from("/opt/mpv")));
        assert_eq!(args.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert!(!args.generate_config);
    }
}
