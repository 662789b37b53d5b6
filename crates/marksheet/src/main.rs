#![allow(unused)]

use crate::prelude::*;
use clap::Parser;

mod parse;
mod prelude;
mod subjects;
mod tokens;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Reconstructs tabular semester results from the positioned text of university result PDFs"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Whether to display additional information.
    #[clap(long, env = "MARKSHEET_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Parse a result PDF into student records
    Parse(crate::parse::Options),

    /// Per-subject grade distribution across a result PDF
    Subjects(crate::subjects::Options),

    /// Dump the positioned text tokens of a result PDF
    Tokens(crate::tokens::Options),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Parse(options) => crate::parse::run(options, app.global),
        SubCommands::Subjects(options) => crate::subjects::run(options, app.global),
        SubCommands::Tokens(options) => crate::tokens::run(options, app.global),
    }
}
