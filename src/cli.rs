use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "videotable",
    version,
    about = "Browse a JSON dataset of videos in the terminal",
    long_about = "videotable loads a JSON array of video entries, shows totals, and lets you filter by year, format and free text, twenty rows per page.\n\nExamples:\n  videotable\n  videotable ./data.json --year 2020 --format Documentary\n  videotable https://example.com/data.json --export-html report.html"
)]
pub struct CliArgs {
    #[arg(
        value_name = "DATA",
        help = "Dataset path or http(s) URL [default: data.json]."
    )]
    pub data: Option<String>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Load settings from a YAML file instead of the default location."
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "lang",
        value_name = "LANG",
        help_heading = "Config",
        help = "Interface language (en, pt-br). Defaults to $LANG."
    )]
    pub language: Option<String>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = ArgAction::Count,
        help_heading = "Logging",
        help = "Increase log verbosity (-v, -vv, -vvv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "log-file",
        value_name = "FILE",
        help_heading = "Logging",
        help = "Write logs here instead of the default data directory."
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "year",
        value_name = "YEAR",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Only show this year (repeatable)."
    )]
    pub years: Vec<String>,

    #[arg(
        long = "format",
        value_name = "FORMAT",
        action = ArgAction::Append,
        help_heading = "Filters",
        help = "Only show this format (repeatable)."
    )]
    pub formats: Vec<String>,

    #[arg(
        short = 's',
        long = "search",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Case-insensitive match against title, channel and tags."
    )]
    pub search: Option<String>,

    #[arg(
        short = 'p',
        long = "page",
        value_name = "N",
        default_value_t = 1,
        help_heading = "Filters",
        help = "Start on this page."
    )]
    pub page: usize,

    #[arg(
        long = "export-html",
        value_name = "FILE",
        help_heading = "Output",
        help = "Render the selected page to a standalone HTML file and exit."
    )]
    pub export_html: Option<PathBuf>,
}
