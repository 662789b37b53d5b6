//! Parsed student records and their JSON export shape.
//!
//! Field names follow the camelCase export consumed downstream, so renames
//! here are breaking changes for every exporter built on top of this crate.

use serde::{Deserialize, Serialize};

use crate::grade::Grade;

/// Department resolved from the middle segment of a full roll number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    pub code: String,
}

/// One subject entry on a student's result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSubject {
    pub name: String,
    pub code: String,
    pub credits: u32,
    pub grade: Grade,
    pub failed: bool,
}

/// A student's results for the semester the report covers.
///
/// `sgpa` is absent when the block was printed without an SGPA column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub number: u32,
    pub total_credits: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sgpa: Option<f64>,
    pub subjects: Vec<SemesterSubject>,
}

/// One fully parsed student.
///
/// Exactly one of `roll_no` and `first_year_roll_no` is non-empty. The
/// department is resolved only for full roll numbers; first-year records
/// export without the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub roll_no: String,
    pub name: String,
    pub first_year_roll_no: String,
    pub current_semester: u32,
    pub batch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub degree: String,
    pub semester: Semester,
}
