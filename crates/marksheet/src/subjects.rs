use crate::prelude::{println, *};
use colored::Colorize;
use marksheet_core::grade::Grade;
use marksheet_core::stats::{SubjectAggregator, SubjectSummary};
use std::path::PathBuf;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct Options {
    /// Path to the result PDF
    #[clap(env = "MARKSHEET_FILE")]
    file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(options: Options, global: crate::Global) -> Result<()> {
    if global.verbose {
        println!("Reading {}", options.file.display());
        println!();
    }

    let report = crate::parse::parse_file(&options.file)?;

    let mut aggregator = SubjectAggregator::new();
    for student in &report.students {
        aggregator.record_student(student);
    }
    let summaries = aggregator.finalize();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        output_formatted(&summaries);
    }

    crate::parse::report_failures(&report)
}

fn output_formatted(summaries: &[SubjectSummary]) {
    if summaries.is_empty() {
        println!("No graded subjects found.");
        return;
    }

    let mut table = new_table();
    table.add_row(prettytable::row![
        "Code".bold().cyan(),
        "Subject".bold().cyan(),
        "Credits".bold().cyan(),
        "Graded".bold().cyan(),
        "Grades".bold().cyan(),
        "Average".bold().cyan(),
        "Median".bold().cyan()
    ]);
    for summary in summaries {
        table.add_row(prettytable::row![
            summary.code.green(),
            summary.name.bright_white(),
            summary.credits,
            summary.total_graded,
            format_frequencies(summary),
            f!("{:.2}", summary.average_gpa).bright_yellow(),
            summary.median_grade.as_str()
        ]);
    }
    table.printstd();
}

/// Compact nonzero slice of the distribution, best grade first.
fn format_frequencies(summary: &SubjectSummary) -> String {
    summary
        .grades_frequency
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(grade, count)| {
            if *grade == Grade::Empty {
                f!("blank:{}", count)
            } else {
                f!("{}:{}", grade.as_str(), count)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
