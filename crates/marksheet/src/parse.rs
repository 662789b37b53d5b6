use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use marksheet_core::grade::Grade;
use marksheet_core::parser::{parse_pages, ParseError, ParseReport};
use marksheet_core::student::Student;
use marksheet_core::token::Token;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Path to the result PDF
    #[clap(env = "MARKSHEET_FILE")]
    file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Write the records as JSON to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Reading {}", options.file.display());
        println!();
    }

    let report = parse_file(&options.file)?;

    if let Some(path) = &options.output {
        write_records(path, &report.students)?;
        if global.verbose {
            println!(
                "Wrote {} records to {}",
                report.students.len(),
                path.display()
            );
        }
    } else if options.json {
        println!("{}", serde_json::to_string_pretty(&report.students)?);
    } else {
        output_formatted(&report.students, global.verbose);
    }

    report_failures(&report)
}

/// Runs the extraction and layout pipeline on a PDF and returns the report.
///
/// Shared with the other subcommands so they all open documents the same way.
pub fn parse_file(path: &Path) -> Result<ParseReport> {
    let document = pdf::ParsedDocument::from_path(path)
        .wrap_err_with(|| f!("could not open {}", path.display()))?;
    log::debug!(
        "loaded {} ({} pages)",
        path.display(),
        document.page_count()
    );

    let pages: Vec<Vec<Token>> = document
        .extract_tokens()?
        .into_iter()
        .map(|(_, tokens)| {
            tokens
                .into_iter()
                .map(|token| Token::new(token.text, token.x, token.y))
                .collect()
        })
        .collect();

    let report = parse_pages(&pages);
    log::debug!(
        "parsed {} students, {} failed pages",
        report.students.len(),
        report.failed_pages.len()
    );
    Ok(report)
}

/// Prints every failed page and turns an incomplete report into the process
/// exit status. Records from the pages that did parse are already out by now.
pub fn report_failures(report: &ParseReport) -> Result<()> {
    if report.is_complete() {
        return Ok(());
    }

    for failed in &report.failed_pages {
        eprintln!("{}", failed.to_string().red());
    }

    Err(ParseError {
        failed_pages: report.failed_pages.clone(),
    }
    .into())
}

fn write_records(path: &Path, students: &[Student]) -> Result<()> {
    let json = serde_json::to_string_pretty(students)?;
    std::fs::write(path, json).wrap_err_with(|| f!("could not write {}", path.display()))
}

fn output_formatted(students: &[Student], verbose: bool) {
    if students.is_empty() {
        println!("No students found.");
        return;
    }

    println!("{} {}", "Students:".bold().cyan(), students.len());
    println!();

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Roll No.".bold().cyan(),
        "Name".bold().cyan(),
        "Batch".bold().cyan(),
        "Department".bold().cyan(),
        "Sem".bold().cyan(),
        "Credits".bold().cyan(),
        "SGPA".bold().cyan(),
        "Failed".bold().cyan()
    ]);
    for student in students {
        let roll_no = if student.roll_no.is_empty() {
            &student.first_year_roll_no
        } else {
            &student.roll_no
        };
        let department = match &student.department {
            Some(department) => department.code.bright_blue().to_string(),
            None => "-".bright_black().to_string(),
        };
        let sgpa = match student.semester.sgpa {
            Some(sgpa) => f!("{:.2}", sgpa).bright_yellow().to_string(),
            None => "-".bright_black().to_string(),
        };
        let failed_papers = student
            .semester
            .subjects
            .iter()
            .filter(|subject| subject.failed)
            .count();
        let failed_papers = if failed_papers > 0 {
            failed_papers.to_string().red().to_string()
        } else {
            failed_papers.to_string().bright_black().to_string()
        };
        table.add_row(prettytable::row![
            roll_no.green(),
            student.name.bright_white(),
            student.batch,
            department,
            student.current_semester,
            student.semester.total_credits,
            sgpa,
            failed_papers
        ]);
    }
    table.printstd();

    let ungraded: Vec<&Student> = students
        .iter()
        .filter(|student| {
            student
                .semester
                .subjects
                .iter()
                .any(|subject| subject.grade == Grade::Empty)
        })
        .collect();
    if !ungraded.is_empty() {
        println!();
        println!(
            "{}",
            f!("{} students have subjects without a grade", ungraded.len()).yellow()
        );
        if verbose {
            for student in &ungraded {
                println!("  {}", student.name);
            }
        }
    }
}
