//! CLI tool for converting EPUB files.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{Parser, ValueEnum};

use zhepub::{ScriptVariant, UnchangedNamePolicy};

/// Convert simplified Chinese to traditional Chinese in EPUB files
#[derive(Parser)]
#[command(name = "zhepub")]
#[command(author, version, about = "Convert simplified Chinese to traditional Chinese in epub", long_about = None)]
pub struct Cli {
    /// EPUB files, or a single glob pattern such as "books/*.epub"
    #[arg(required = true)]
    files: Vec<String>,

    /// Target script variant
    #[arg(long, short = 'v', value_enum, default_value = "taiwan")]
    variant: Variant,

    /// What to do when converting the file name leaves it unchanged
    #[arg(long, value_enum, default_value = "suffix")]
    on_unchanged_name: UnchangedName,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human")]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    quiet: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Variant {
    Traditional,
    Taiwan,
}

impl From<Variant> for ScriptVariant {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Traditional => ScriptVariant::Traditional,
            Variant::Taiwan => ScriptVariant::Taiwan,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum UnchangedName {
    /// Write "<name>-tc.epub" next to the input
    Suffix,
    /// Skip the file as already converted
    Skip,
}

impl From<UnchangedName> for UnchangedNamePolicy {
    fn from(policy: UnchangedName) -> Self {
        match policy {
            UnchangedName::Suffix => UnchangedNamePolicy::Suffix,
            UnchangedName::Skip => UnchangedNamePolicy::Skip,
        }
    }
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    let exit_code = commands::convert(&commands::ConvertConfig {
        files: &cli.files,
        variant: cli.variant.into(),
        policy: cli.on_unchanged_name.into(),
        format: cli.format,
        quiet: cli.quiet,
    });

    std::process::exit(exit_code.code());
}
