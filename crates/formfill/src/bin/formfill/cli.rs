//! formfill cli interface

use clap::{Parser, Subcommand, ValueEnum};
use std::fmt::Formatter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fill and submit a form
    ///
    /// Prompts for every entry marked with `!`, all other entries use their default value.
    Submit(SubmitCommand),

    /// Validate a config file
    ///
    /// Parses every line and resolves all entries that are not prompted.
    Check(CheckCommand),

    /// Generate a config file from a form
    #[command(alias = "conv")]
    Convert(ConvertCommand),
}

#[derive(Parser, Debug)]
pub struct SubmitCommand {
    /// Config file
    pub config: PathBuf,

    /// Print the payload instead of submitting it
    #[clap(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    #[clap(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Config file
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConvertCommand {
    /// Form id, form url or internet shortcut (.url) file
    pub form: String,

    /// Write the config to this file instead of stdout
    #[clap(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Overwrite the output file without asking
    #[clap(short = 'f', long = "force")]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct OutputArgs {
    #[arg(short = 'F', long = "output-format", default_value_t)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Default, Debug)]
pub enum OutputFormat {
    Json,
    #[default]
    Yaml,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Yaml => f.write_str("yaml"),
        }
    }
}
