//! Per-subject grade distributions across a parsed document.
//!
//! The aggregator folds student records into one tally per subject code,
//! then summarizes each tally with a frequency map, an average GPA and a
//! median grade. Rows without an SGPA value never reach a tally; those
//! blocks predate the per-row SGPA column and carry no comparable signal.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::grade::Grade;
use crate::student::Student;

// ---------------------------------------------------------------------------
// Tallies
// ---------------------------------------------------------------------------

/// Running distribution for one subject code.
#[derive(Debug, Clone, PartialEq)]
struct Tally {
    name: String,
    credits: u32,
    frequency: BTreeMap<Grade, u32>,
    total: u32,
}

impl Tally {
    fn new(name: &str, credits: u32) -> Self {
        // seed every grade so the frequency map always carries the full
        // scale, zeroes included
        let frequency = Grade::ALL.iter().map(|&grade| (grade, 0)).collect();
        Self {
            name: name.to_string(),
            credits,
            frequency,
            total: 0,
        }
    }

    fn record(&mut self, grade: Grade) {
        *self.frequency.entry(grade).or_insert(0) += 1;
        self.total += 1;
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average_gpa(frequency: &BTreeMap<Grade, u32>, total: u32) -> f64 {
    let sum: f64 = frequency
        .iter()
        .map(|(grade, count)| grade.gpa() * f64::from(*count))
        .sum();
    round2(sum / f64::from(total))
}

/// Grade of the middle student when the distribution is laid out from best
/// to worst. Even counts take the upper middle.
fn median_grade(frequency: &BTreeMap<Grade, u32>, total: u32) -> Grade {
    let position = (total + 1).div_ceil(2);
    let mut seen = 0;
    for grade in Grade::ALL {
        seen += frequency.get(&grade).copied().unwrap_or(0);
        if seen >= position {
            return grade;
        }
    }
    Grade::Empty
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Finished distribution summary for one subject.
///
/// The serialized shape keeps the field names downstream consumers already
/// read: `average` and `median`, next to the camelCase counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSummary {
    pub code: String,
    pub name: String,
    pub credits: u32,
    pub total_graded: u32,
    pub grades_frequency: BTreeMap<Grade, u32>,
    #[serde(rename = "average")]
    pub average_gpa: f64,
    #[serde(rename = "median")]
    pub median_grade: Grade,
}

/// Folds students into per-subject tallies, keyed by subject code.
#[derive(Debug, Clone, Default)]
pub struct SubjectAggregator {
    subjects: BTreeMap<String, Tally>,
}

impl SubjectAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Fold one student in. Rows without an SGPA value are skipped whole.
    pub fn record_student(&mut self, student: &Student) {
        if student.semester.sgpa.is_none() {
            return;
        }
        for subject in &student.semester.subjects {
            let tally = self
                .subjects
                .entry(subject.code.clone())
                .or_insert_with(|| Tally::new(&subject.name, subject.credits));
            tally.record(subject.grade);
        }
    }

    /// Summaries for every tallied subject, ordered by subject code.
    pub fn finalize(&self) -> Vec<SubjectSummary> {
        self.subjects
            .iter()
            .map(|(code, tally)| SubjectSummary {
                code: code.clone(),
                name: tally.name.clone(),
                credits: tally.credits,
                total_graded: tally.total,
                grades_frequency: tally.frequency.clone(),
                average_gpa: average_gpa(&tally.frequency, tally.total),
                median_grade: median_grade(&tally.frequency, tally.total),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::student::{Semester, SemesterSubject};

    // -- Helpers for building test data -----------------------------------

    fn make_student(sgpa: Option<f64>, grades: &[(&str, Grade)]) -> Student {
        let subjects = grades
            .iter()
            .map(|&(code, grade)| SemesterSubject {
                name: format!("Subject {code}"),
                code: code.to_string(),
                credits: 4,
                grade,
                failed: grade.is_failing(),
            })
            .collect();
        Student {
            roll_no: "2K19/CO/001".to_string(),
            name: "SOME STUDENT".to_string(),
            first_year_roll_no: String::new(),
            current_semester: 4,
            batch: "2K19".to_string(),
            department: None,
            degree: "Bachelor of Technology".to_string(),
            semester: Semester {
                number: 4,
                total_credits: 8,
                sgpa,
                subjects,
            },
        }
    }

    fn summarize(students: &[Student]) -> Vec<SubjectSummary> {
        let mut aggregator = SubjectAggregator::new();
        for student in students {
            aggregator.record_student(student);
        }
        aggregator.finalize()
    }

    // =====================================================================
    // record_student
    // =====================================================================

    #[test]
    fn test_students_without_sgpa_are_skipped() {
        let students = vec![
            make_student(None, &[("MA101", Grade::A)]),
            make_student(Some(8.0), &[("MA101", Grade::O)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_graded, 1);
        assert_eq!(summaries[0].grades_frequency[&Grade::O], 1);
        assert_eq!(summaries[0].grades_frequency[&Grade::A], 0);
    }

    #[test]
    fn test_frequency_counts_across_students() {
        let students = vec![
            make_student(Some(8.0), &[("MA101", Grade::A), ("CS101", Grade::F)]),
            make_student(Some(9.0), &[("MA101", Grade::A), ("CS101", Grade::O)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries.len(), 2);

        let cs = &summaries[0];
        assert_eq!(cs.code, "CS101");
        assert_eq!(cs.grades_frequency[&Grade::F], 1);
        assert_eq!(cs.grades_frequency[&Grade::O], 1);

        let ma = &summaries[1];
        assert_eq!(ma.code, "MA101");
        assert_eq!(ma.grades_frequency[&Grade::A], 2);
        assert_eq!(ma.total_graded, 2);
    }

    #[test]
    fn test_frequency_carries_the_full_grade_scale() {
        let students = vec![make_student(Some(8.0), &[("MA101", Grade::A)])];
        let summaries = summarize(&students);
        assert_eq!(summaries[0].grades_frequency.len(), Grade::ALL.len());
        assert_eq!(summaries[0].grades_frequency[&Grade::UFM], 0);
        assert_eq!(summaries[0].grades_frequency[&Grade::Empty], 0);
    }

    #[test]
    fn test_blank_grades_count_toward_total() {
        let students = vec![
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(7.0), &[("MA101", Grade::Empty)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries[0].total_graded, 2);
        // blank carries a zero GPA, so (8 + 0) / 2
        assert_eq!(summaries[0].average_gpa, 4.0);
    }

    // =====================================================================
    // finalize
    // =====================================================================

    #[test]
    fn test_average_gpa_rounds_to_two_decimals() {
        let students = vec![
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(6.0), &[("MA101", Grade::B)]),
        ];
        let summaries = summarize(&students);
        // (8 + 8 + 6) / 3 = 7.333...
        assert_eq!(summaries[0].average_gpa, 7.33);
    }

    #[test]
    fn test_median_grade_odd_count() {
        let students = vec![
            make_student(Some(10.0), &[("MA101", Grade::O)]),
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(0.0), &[("MA101", Grade::F)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries[0].median_grade, Grade::A);
    }

    #[test]
    fn test_median_grade_even_count_takes_upper_middle() {
        let students = vec![
            make_student(Some(10.0), &[("MA101", Grade::O)]),
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(6.0), &[("MA101", Grade::B)]),
            make_student(Some(0.0), &[("MA101", Grade::F)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries[0].median_grade, Grade::B);
    }

    #[test]
    fn test_median_grade_failing_majority() {
        let students = vec![
            make_student(Some(8.0), &[("MA101", Grade::A)]),
            make_student(Some(0.0), &[("MA101", Grade::F)]),
            make_student(Some(0.0), &[("MA101", Grade::F)]),
            make_student(Some(0.0), &[("MA101", Grade::F)]),
        ];
        let summaries = summarize(&students);
        assert_eq!(summaries[0].median_grade, Grade::F);
    }

    #[test]
    fn test_summaries_sorted_by_code() {
        let students = vec![make_student(
            Some(8.0),
            &[("ZZ900", Grade::A), ("AA100", Grade::B), ("MM500", Grade::O)],
        )];
        let codes: Vec<String> = summarize(&students)
            .into_iter()
            .map(|summary| summary.code)
            .collect();
        assert_eq!(codes, vec!["AA100", "MM500", "ZZ900"]);
    }

    #[test]
    fn test_finalize_twice_yields_identical_output() {
        let mut aggregator = SubjectAggregator::new();
        aggregator.record_student(&make_student(
            Some(8.0),
            &[("MA101", Grade::A), ("CS101", Grade::F)],
        ));
        let first = aggregator.finalize();
        let second = aggregator.finalize();
        assert_eq!(first, second);
        assert_eq!(second[1].grades_frequency[&Grade::A], 1);
    }

    #[test]
    fn test_summary_serializes_export_field_names() {
        let students = vec![make_student(Some(8.0), &[("MA101", Grade::APlus)])];
        let summaries = summarize(&students);
        let value = serde_json::to_value(&summaries[0]).unwrap();

        assert_eq!(value["code"], "MA101");
        assert_eq!(value["totalGraded"], 1);
        assert_eq!(value["gradesFrequency"]["A+"], 1);
        assert_eq!(value["average"], 9.0);
        assert_eq!(value["median"], "A+");
    }
}
