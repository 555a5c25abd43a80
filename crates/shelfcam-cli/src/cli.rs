use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "shelfcam")]
#[command(bin_name = "shelfcam")]
#[command(version)]
#[command(about = "Photograph catalog products and upload the images to Dropbox")]
pub struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Settings file (default: ./settings.json, then ~/.config/shelfcam/settings.json)"
    )]
    pub settings: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Write a diagnostics log under ~/.config/shelfcam/diagnostics"
    )]
    pub diagnostics: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    #[command(about = "Run environment and configuration checks")]
    Doctor,
    #[command(about = "List spreadsheets under the configured Dropbox root")]
    Sheets,
    #[command(about = "Print the selectable models of one spreadsheet")]
    Catalog {
        #[arg(help = "Dropbox path of the spreadsheet, as printed by `shelfcam sheets`")]
        path: String,
    },
}
