//! Command-line interface definitions for the news transform stage.
//!
//! Flags override values from the optional YAML file given with `--config`.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for a transform run.
///
/// # Examples
///
/// ```sh
/// # Clean one scraped file into clean_eldeber_.csv
/// news_transform eldeber_.csv
///
/// # Several sources at once, with load-ready JSON
/// news_transform lostiempos_.csv opinion_.csv -j ./json
///
/// # Reproduce historical outputs exactly
/// news_transform larazon_.csv --legacy-order
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Raw source files, named `<newspaper_uid>_<suffix>`
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding stopword lists, one file per language (default: built-in lists)
    #[arg(long)]
    pub stopwords_dir: Option<PathBuf>,

    /// Stopword language (file name under the stopwords directory)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Prefix for cleaned output file names
    #[arg(long)]
    pub output_prefix: Option<String>,

    /// Newspaper uid to use instead of the one in the file name
    #[arg(short, long)]
    pub newspaper_uid: Option<String>,

    /// Also write load-ready JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<PathBuf>,

    /// Remove duplicates before dropping incomplete rows
    #[arg(long)]
    pub legacy_order: bool,

    /// Number of source files cleaned concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "news_transform",
            "eldeber_.csv",
            "opinion_.csv",
            "--json-output-dir",
            "./json",
        ]);

        assert_eq!(cli.inputs, vec![PathBuf::from("eldeber_.csv"), PathBuf::from("opinion_.csv")]);
        assert_eq!(cli.json_output_dir, Some(PathBuf::from("./json")));
        assert!(!cli.legacy_order);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "news_transform",
            "-n",
            "jornada",
            "-l",
            "spanish",
            "-c",
            "/etc/news_transform.yaml",
            "raw.csv",
        ]);

        assert_eq!(cli.newspaper_uid.as_deref(), Some("jornada"));
        assert_eq!(cli.language.as_deref(), Some("spanish"));
        assert_eq!(cli.config, Some(PathBuf::from("/etc/news_transform.yaml")));
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["news_transform"]).is_err());
    }
}
