use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Bulk-import PMKSY farmer survey data from CSV files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the datasets that can be imported, or the columns of one of them
    Targets(TargetsArgs),
    /// Parse an upload and report how its columns map onto a target
    Preview(PreviewArgs),
    /// Import every row of an upload into a target
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct TargetsArgs {
    /// Show the expected columns of this target instead of the target list
    #[arg(short = 't', long = "target")]
    pub target: Option<String>,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Import target key (see `targets`)
    #[arg(short = 't', long = "target")]
    pub target: String,
    /// CSV file to read (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|'); sniffed when omitted
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// YAML file with import settings
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    /// Number of data rows to show (defaults to the configured preview size)
    #[arg(long = "rows")]
    pub rows: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub upload: UploadArgs,
    /// JSON record store to load and update
    #[arg(long = "store", default_value = "survey-store.json")]
    pub store: PathBuf,
    /// Run the import without writing the store back
    #[arg(long = "dry-run")]
    pub dry_run: bool,
    /// Print the import summary as JSON
    #[arg(long)]
    pub json: bool,
    /// Exit with an error when any row fails
    #[arg(long)]
    pub strict: bool,
    /// Override how many row errors are reported in detail
    #[arg(long = "max-errors")]
    pub max_errors: Option<usize>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn delimiter_names_and_characters_are_accepted() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter("|"), Ok(b'|'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("§").is_err());
    }

    #[test]
    fn import_flags_parse() {
        let cli = Cli::try_parse_from([
            "survey-import",
            "import",
            "-t",
            "farmers",
            "-i",
            "farmers.csv",
            "--dry-run",
            "--max-errors",
            "5",
        ])
        .unwrap();
        let Commands::Import(args) = cli.command else {
            panic!("expected import command");
        };
        assert_eq!(args.upload.target, "farmers");
        assert!(args.dry_run);
        assert!(!args.strict);
        assert_eq!(args.max_errors, Some(5));
        assert_eq!(args.store, PathBuf::from("survey-store.json"));
    }
}
