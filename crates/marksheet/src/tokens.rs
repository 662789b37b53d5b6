use crate::prelude::{println, *};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Path to the result PDF
    #[clap(env = "MARKSHEET_FILE")]
    file: PathBuf,

    /// Only dump this page (1-indexed)
    #[arg(short, long)]
    page: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    let document = pdf::ParsedDocument::from_path(&options.file)
        .wrap_err_with(|| f!("could not open {}", options.file.display()))?;

    if global.verbose {
        println!("{} pages", document.page_count());
        println!();
    }

    let pages: Vec<(usize, Vec<pdf::TextToken>)> = match options.page {
        Some(number) => vec![(number, document.extract_page(number)?)],
        None => document.extract_tokens()?,
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    for (number, tokens) in &pages {
        println!(
            "{}",
            f!("Page {} ({} tokens)", number, tokens.len()).bold().cyan()
        );
        for token in tokens {
            println!("  x={:6.1} y={:6.1} \"{}\"", token.x, token.y, token.text);
        }
        println!();
    }

    Ok(())
}
