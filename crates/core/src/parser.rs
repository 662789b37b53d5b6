//! Layout reconstruction for semester result pages.
//!
//! A result page carries no table markup. Rows and columns exist only as
//! approximate (x, y) alignments of independently positioned text fragments,
//! so this module rebuilds the structure with a stateful scan: anchor tokens
//! locate the page metadata and each result block, header cells define the
//! columns, and every student row is reassembled by matching token positions
//! against those columns. Every function is a pure transformation over an
//! in-memory token sequence -- token acquisition lives in the decoder, not
//! here.
//!
//! # Pipeline (per page)
//!
//! ```text
//! tokens  ->  PageMeta  ->  { HeaderColumns -> SubjectSchema -> rows }*  ->  Student[]
//!              scan_page_meta   scan_header_columns  parse_subject_schema  parse_rows
//! ```
//!
//! Pages are independent. A structural failure inside one page is recorded
//! against that page and never aborts its siblings.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::cursor::PageCursor;
use crate::department::{department_name, UnknownDepartment};
use crate::grade::Grade;
use crate::roman::{deromanize, InvalidRomanNumeral};
use crate::student::{Department, Semester, SemesterSubject, Student};
use crate::token::{x_aligned, Coords, Token};

// ---------------------------------------------------------------------------
// Anchors
// ---------------------------------------------------------------------------

/// Opens a result block and its header row.
const RESULT_BLOCK_START: &str = "Sr.No";
/// Precedes the degree name in the page metadata.
const PROGRAM_MARKER: &str = "Program :";
/// Precedes the Roman-numeral semester in the page metadata.
const SEMESTER_MARKER: &str = "Sem :";
/// Header cell above the student-name column.
const NAME_HEADER: &str = "Name";
/// Header cell above the roll-number column.
const ROLL_NO_HEADER: &str = "Roll No.";
/// Opens the subject legend inside a block header.
const SUBJECT_LEGEND_START: &str = "Credits";
/// Header cell of the per-row SGPA column; absent in older layouts.
const SGPA_HEADER: &str = "SGPA";

fn is_end_of_page(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Page\s\d+").unwrap()).is_match(text)
}

fn is_first_year_roll_no(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Unanchored: the shape may sit anywhere in the cell.
    RE.get_or_init(|| Regex::new(r"[AB]\d+").unwrap()).is_match(text)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Structural failure local to one page.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    /// The page's tokens ran out while a block still expected structure.
    #[error("token stream ended while a result block was still open")]
    UnexpectedEnd,
    /// A numeric cell did not parse.
    #[error("expected a number in the {field} cell, found \"{text}\"")]
    InvalidNumber { field: &'static str, text: String },
    #[error(transparent)]
    InvalidSemester(#[from] InvalidRomanNumeral),
    #[error(transparent)]
    UnknownDepartment(#[from] UnknownDepartment),
}

/// One failed page: 1-based page number plus the failure that aborted it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("page {page}: {error}")]
pub struct FailedPage {
    pub page: usize,
    #[source]
    pub error: PageError,
}

fn format_page_list(failed: &[FailedPage]) -> String {
    failed
        .iter()
        .map(|f| f.page.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Document-level failure naming every page that could not be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unable to parse pages {}", format_page_list(.failed_pages))]
pub struct ParseError {
    pub failed_pages: Vec<FailedPage>,
}

// ---------------------------------------------------------------------------
// Page metadata
// ---------------------------------------------------------------------------

/// Page-level context shared by every block on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub degree: String,
    pub current_semester: u32,
}

fn next_token<'a>(cursor: &mut PageCursor<'a>) -> Result<&'a Token, PageError> {
    cursor.advance().ok_or(PageError::UnexpectedEnd)
}

/// Read the degree and semester markers that precede the first result block.
///
/// Leaves the cursor on the block marker. A page can end before any block
/// appears; whatever metadata was collected by then comes back as-is.
pub fn scan_page_meta(cursor: &mut PageCursor) -> Result<PageMeta, PageError> {
    let mut meta = PageMeta::default();
    let mut token = next_token(cursor)?;
    loop {
        if token.text == RESULT_BLOCK_START || is_end_of_page(&token.text) {
            return Ok(meta);
        }
        if token.text == PROGRAM_MARKER {
            let first = next_token(cursor)?;
            meta.degree = first.text.clone();
            let column = first.coords();
            token = next_token(cursor)?;
            // a long degree name wraps onto further lines, same column
            while x_aligned(token.coords(), column) {
                meta.degree.push(' ');
                meta.degree.push_str(&token.text);
                token = next_token(cursor)?;
            }
            continue;
        }
        if token.text == SEMESTER_MARKER {
            let value = next_token(cursor)?;
            meta.current_semester = deromanize(&value.text)?;
        }
        token = next_token(cursor)?;
    }
}

// ---------------------------------------------------------------------------
// Student header columns
// ---------------------------------------------------------------------------

/// Positions of the per-student header cells.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeaderColumns {
    pub name: Coords,
    pub roll_no: Coords,
}

/// Record where the "Name" and "Roll No." header cells sit.
///
/// Runs from the block marker to the subject legend. Zeroed columns come
/// back if the page ends first.
pub fn scan_header_columns(cursor: &mut PageCursor) -> Result<HeaderColumns, PageError> {
    let mut columns = HeaderColumns::default();
    let mut token = cursor.current();
    while token.text != SUBJECT_LEGEND_START {
        if is_end_of_page(&token.text) {
            return Ok(columns);
        }
        if token.text == NAME_HEADER {
            columns.name = token.coords();
        } else if token.text == ROLL_NO_HEADER {
            columns.roll_no = token.coords();
        }
        token = next_token(cursor)?;
    }
    Ok(columns)
}

// ---------------------------------------------------------------------------
// Subject schema
// ---------------------------------------------------------------------------

/// Ordered subject layout for one result block.
///
/// Codes, names, credits and grade columns line up index-wise. The SGPA
/// column is optional; older layouts print the block without it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectSchema {
    pub codes: Vec<String>,
    pub names: Vec<String>,
    pub credits: Vec<u32>,
    pub grade_columns: Vec<Coords>,
    pub total_credits_column: Coords,
    pub sgpa_column: Option<Coords>,
    pub failed_column: Coords,
}

impl SubjectSchema {
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn has_sgpa(&self) -> bool {
        self.sgpa_column.is_some()
    }

    /// Index of the grade column this position falls into, if any.
    fn grade_column_index(&self, coords: Coords) -> Option<usize> {
        self.grade_columns.iter().position(|&c| x_aligned(c, coords))
    }
}

/// Entry of the subject legend: `"CODE : Subject Name"`.
fn split_legend_entry(text: &str) -> Option<(String, String)> {
    let (code, name) = text.split_once(':')?;
    Some((code.trim().to_string(), name.trim().to_string()))
}

/// Parse the subject legend, the column header row and the credits row.
///
/// Expects the cursor on (or just past) the legend marker and leaves it on
/// the first token after the credits row. An empty schema comes back when
/// the page already ended.
pub fn parse_subject_schema(cursor: &mut PageCursor) -> Result<SubjectSchema, PageError> {
    let mut schema = SubjectSchema::default();
    let mut token = cursor.current();
    if is_end_of_page(&token.text) {
        return Ok(schema);
    }
    if token.text == SUBJECT_LEGEND_START {
        token = next_token(cursor)?;
    }

    while let Some((code, name)) = split_legend_entry(&token.text) {
        schema.codes.push(code);
        schema.names.push(name);
        let column = token.coords();
        token = next_token(cursor)?;
        // a long subject name wraps onto the next line, same column
        while x_aligned(token.coords(), column) {
            if let Some(name) = schema.names.last_mut() {
                name.push(' ');
                name.push_str(&token.text);
            }
            token = next_token(cursor)?;
        }
    }

    // one header cell per declared subject, in declaration order
    for _ in 0..schema.codes.len() {
        schema.grade_columns.push(token.coords());
        token = next_token(cursor)?;
    }

    schema.total_credits_column = token.coords();
    token = next_token(cursor)?;

    if token.text == SGPA_HEADER {
        schema.sgpa_column = Some(token.coords());
        token = next_token(cursor)?;
    }

    schema.failed_column = token.coords();
    token = next_token(cursor)?;

    while schema.credits.len() != schema.codes.len() {
        let credits = token.text.parse::<u32>().map_err(|_| PageError::InvalidNumber {
            field: "credits",
            text: token.text.clone(),
        })?;
        schema.credits.push(credits);
        token = next_token(cursor)?;
    }

    Ok(schema)
}

// ---------------------------------------------------------------------------
// Student rows
// ---------------------------------------------------------------------------

/// Scratch for one student row before the final record is built.
#[derive(Debug, Default)]
struct RawRow {
    name: String,
    roll_no: String,
    first_year_roll_no: String,
    grades: Vec<Grade>,
    total_credits: u32,
    sgpa: Option<f64>,
}

impl RawRow {
    fn new(subject_count: usize) -> Self {
        Self {
            grades: vec![Grade::Empty; subject_count],
            ..Self::default()
        }
    }
}

/// Parse every student row of the current block.
///
/// Stops on the next block marker or the end-of-page marker. Fragments that
/// do not line up with the Name column are stray artifacts between rows and
/// are skipped; that also disposes of the failed-paper lists the layout
/// prints after the SGPA cell.
pub fn parse_rows(
    cursor: &mut PageCursor,
    meta: &PageMeta,
    columns: &HeaderColumns,
    schema: &SubjectSchema,
) -> Result<Vec<Student>, PageError> {
    let mut students = Vec::new();
    let mut token = cursor.current();

    while token.text != RESULT_BLOCK_START {
        if is_end_of_page(&token.text) {
            return Ok(students);
        }
        if !x_aligned(token.coords(), columns.name) {
            token = next_token(cursor)?;
            continue;
        }

        let mut row = RawRow::new(schema.len());

        // name, wrapping onto further lines in the same column
        while x_aligned(token.coords(), columns.name) {
            if !row.name.is_empty() {
                row.name.push(' ');
            }
            row.name.push_str(&token.text);
            token = next_token(cursor)?;
        }

        // token is the serial-number cell; step past it to the roll number
        token = next_token(cursor)?;
        if is_first_year_roll_no(&token.text) {
            row.first_year_roll_no = token.text.clone();
        } else {
            row.roll_no = token.text.clone();
        }
        token = next_token(cursor)?;

        // grades drop into whichever column they align with; unvisited
        // slots keep the blank sentinel
        while let Some(slot) = schema.grade_column_index(token.coords()) {
            row.grades[slot] = Grade::parse(&token.text).unwrap_or(Grade::Empty);
            token = next_token(cursor)?;
        }

        row.total_credits = token.text.parse::<u32>().map_err(|_| PageError::InvalidNumber {
            field: "total credits",
            text: token.text.clone(),
        })?;
        token = next_token(cursor)?;

        if schema.has_sgpa() {
            let sgpa = token.text.parse::<f64>().map_err(|_| PageError::InvalidNumber {
                field: "SGPA",
                text: token.text.clone(),
            })?;
            row.sgpa = Some(sgpa);
            token = next_token(cursor)?;
        }

        students.push(build_student(meta, schema, row)?);
    }

    Ok(students)
}

/// Assemble the final record from a parsed row.
fn build_student(
    meta: &PageMeta,
    schema: &SubjectSchema,
    row: RawRow,
) -> Result<Student, PageError> {
    let valid_roll_no = if row.roll_no.is_empty() {
        &row.first_year_roll_no
    } else {
        &row.roll_no
    };
    let batch = valid_roll_no.split('/').next().unwrap_or("").to_string();

    let department = if row.roll_no.is_empty() {
        None
    } else {
        let code = row.roll_no.split('/').nth(1).unwrap_or("");
        Some(Department {
            name: department_name(code)?.to_string(),
            code: code.to_string(),
        })
    };

    let subjects = (0..schema.len())
        .map(|i| SemesterSubject {
            name: schema.names[i].clone(),
            code: schema.codes[i].clone(),
            credits: schema.credits[i],
            grade: row.grades[i],
            failed: row.grades[i].is_failing(),
        })
        .collect();

    Ok(Student {
        roll_no: row.roll_no,
        name: row.name,
        first_year_roll_no: row.first_year_roll_no,
        current_semester: meta.current_semester,
        batch,
        department,
        degree: meta.degree.clone(),
        semester: Semester {
            number: meta.current_semester,
            total_credits: row.total_credits,
            sgpa: row.sgpa,
            subjects,
        },
    })
}

// ---------------------------------------------------------------------------
// Page driver
// ---------------------------------------------------------------------------

/// Parse one page's tokens into student records.
///
/// A page may carry any number of result blocks, including none. The error
/// is page-local; callers decide whether one failed page aborts the run.
pub fn parse_page(tokens: &[Token]) -> Result<Vec<Student>, PageError> {
    let mut cursor = PageCursor::new(tokens);
    let mut students = Vec::new();

    let meta = scan_page_meta(&mut cursor)?;
    while !is_end_of_page(&cursor.current().text) {
        let columns = scan_header_columns(&mut cursor)?;
        let schema = parse_subject_schema(&mut cursor)?;
        students.extend(parse_rows(&mut cursor, &meta, &columns, &schema)?);
    }

    Ok(students)
}

/// Outcome of parsing every page of a document.
///
/// Students from successful pages are preserved even when sibling pages
/// fail; [`into_students`](Self::into_students) collapses a report with
/// failures into a single error naming every failed page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub students: Vec<Student>,
    pub failed_pages: Vec<FailedPage>,
}

impl ParseReport {
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty()
    }

    pub fn into_students(self) -> Result<Vec<Student>, ParseError> {
        if self.failed_pages.is_empty() {
            Ok(self.students)
        } else {
            Err(ParseError {
                failed_pages: self.failed_pages,
            })
        }
    }
}

/// Parse every page of a document, isolating failures per page.
pub fn parse_pages(pages: &[Vec<Token>]) -> ParseReport {
    let mut report = ParseReport::default();
    for (index, page) in pages.iter().enumerate() {
        match parse_page(page) {
            Ok(mut students) => report.students.append(&mut students),
            Err(error) => report.failed_pages.push(FailedPage {
                page: index + 1,
                error,
            }),
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Fixture columns --------------------------------------------------

    const SERIAL_X: f32 = 2.0;
    const NAME_X: f32 = 5.0;
    const ROLL_X: f32 = 10.0;
    const LEGEND1_X: f32 = 18.0;
    const LEGEND2_X: f32 = 23.0;
    const GRADE1_X: f32 = 20.0;
    const GRADE2_X: f32 = 25.0;
    const TC_X: f32 = 30.0;
    const SGPA_X: f32 = 35.0;
    const FAILED_X: f32 = 40.0;

    fn tok(text: &str, x: f32, y: f32) -> Token {
        Token::new(text, x, y)
    }

    fn meta_tokens() -> Vec<Token> {
        vec![
            tok("Program :", 1.0, 1.0),
            tok("Bachelor of Technology", 3.0, 1.0),
            tok("Sem :", 1.0, 2.0),
            tok("IV", 2.0, 2.0),
        ]
    }

    fn block_header_tokens(y: f32) -> Vec<Token> {
        vec![
            tok(RESULT_BLOCK_START, SERIAL_X, y),
            tok("Name", NAME_X, y),
            tok("Roll No.", ROLL_X, y),
        ]
    }

    fn schema_tokens(y: f32, with_sgpa: bool) -> Vec<Token> {
        let mut tokens = vec![
            tok("Credits", 3.0, y),
            tok("MA101 : Mathematics", LEGEND1_X, y),
            tok("CS101 : Programming", LEGEND2_X, y),
            tok("MA101", GRADE1_X, y + 1.0),
            tok("CS101", GRADE2_X, y + 1.0),
            tok("TC", TC_X, y + 1.0),
        ];
        if with_sgpa {
            tokens.push(tok("SGPA", SGPA_X, y + 1.0));
        }
        tokens.push(tok("Papers Failed", FAILED_X, y + 1.0));
        tokens.push(tok("4", GRADE1_X, y + 2.0));
        tokens.push(tok("4", GRADE2_X, y + 2.0));
        tokens
    }

    /// One complete page: metadata, one block with two subjects and two
    /// students (one of them first-year with a blank grade cell), a stray
    /// failed-papers token after the first row, and the page marker.
    fn btech_page() -> Vec<Token> {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("RAHUL KUMAR", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/101", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("F", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("6.5", SGPA_X, 7.0),
            tok("CS101", FAILED_X, 7.0),
            tok("ANITA SINGH", NAME_X, 8.0),
            tok("2", SERIAL_X, 8.0),
            tok("A123", ROLL_X, 8.0),
            tok("O", GRADE1_X, 8.0),
            tok("8", TC_X, 8.0),
            tok("9.0", SGPA_X, 8.0),
            tok("Page 1", 1.0, 9.0),
        ]);
        page
    }

    // =====================================================================
    // scan_page_meta
    // =====================================================================

    #[test]
    fn test_page_meta_degree_and_semester() {
        let mut page = meta_tokens();
        page.push(tok(RESULT_BLOCK_START, SERIAL_X, 3.0));
        let mut cursor = PageCursor::new(&page);

        let meta = scan_page_meta(&mut cursor).unwrap();
        assert_eq!(meta.degree, "Bachelor of Technology");
        assert_eq!(meta.current_semester, 4);
        assert_eq!(cursor.current().text, RESULT_BLOCK_START);
    }

    #[test]
    fn test_page_meta_multi_line_degree() {
        let page = vec![
            tok("Program :", 1.0, 1.0),
            tok("Master of Design in", 3.0, 1.0),
            tok("Interaction Design", 3.0, 1.5),
            tok("Sem :", 1.0, 2.0),
            tok("II", 2.0, 2.0),
            tok(RESULT_BLOCK_START, SERIAL_X, 3.0),
        ];
        let mut cursor = PageCursor::new(&page);

        let meta = scan_page_meta(&mut cursor).unwrap();
        assert_eq!(meta.degree, "Master of Design in Interaction Design");
        assert_eq!(meta.current_semester, 2);
    }

    #[test]
    fn test_page_meta_returns_early_on_page_end() {
        let page = vec![
            tok("Program :", 1.0, 1.0),
            tok("Bachelor of Technology", 3.0, 1.0),
            tok("Page 7", 1.0, 2.0),
        ];
        let mut cursor = PageCursor::new(&page);

        let meta = scan_page_meta(&mut cursor).unwrap();
        assert_eq!(meta.degree, "Bachelor of Technology");
        assert_eq!(meta.current_semester, 0);
        assert_eq!(cursor.current().text, "Page 7");
    }

    #[test]
    fn test_page_meta_invalid_semester_fails() {
        let page = vec![
            tok("Sem :", 1.0, 1.0),
            tok("Fourth", 2.0, 1.0),
            tok(RESULT_BLOCK_START, SERIAL_X, 2.0),
        ];
        let mut cursor = PageCursor::new(&page);

        let err = scan_page_meta(&mut cursor).unwrap_err();
        assert!(matches!(err, PageError::InvalidSemester(_)));
    }

    #[test]
    fn test_page_meta_empty_page_fails() {
        let mut cursor = PageCursor::new(&[]);
        assert_eq!(scan_page_meta(&mut cursor), Err(PageError::UnexpectedEnd));
    }

    // =====================================================================
    // scan_header_columns
    // =====================================================================

    #[test]
    fn test_header_columns_recorded() {
        let mut page = block_header_tokens(3.0);
        page.push(tok("Credits", 3.0, 4.0));
        let mut cursor = PageCursor::new(&page);
        cursor.advance(); // sit on the block marker, as the driver does

        let columns = scan_header_columns(&mut cursor).unwrap();
        assert_eq!(columns.name, Coords { x: NAME_X, y: 3.0 });
        assert_eq!(columns.roll_no, Coords { x: ROLL_X, y: 3.0 });
        assert_eq!(cursor.current().text, SUBJECT_LEGEND_START);
    }

    #[test]
    fn test_header_columns_empty_when_page_ends() {
        let page = vec![tok(RESULT_BLOCK_START, SERIAL_X, 3.0), tok("Page 2", 1.0, 4.0)];
        let mut cursor = PageCursor::new(&page);
        cursor.advance();

        let columns = scan_header_columns(&mut cursor).unwrap();
        assert_eq!(columns, HeaderColumns::default());
        assert_eq!(cursor.current().text, "Page 2");
    }

    // =====================================================================
    // parse_subject_schema
    // =====================================================================

    fn schema_cursor(tokens: &[Token]) -> PageCursor<'_> {
        let mut cursor = PageCursor::new(tokens);
        cursor.advance(); // sit on the legend marker
        cursor
    }

    #[test]
    fn test_schema_basic() {
        let mut tokens = schema_tokens(4.0, true);
        tokens.push(tok("first row", NAME_X, 7.0));
        let mut cursor = schema_cursor(&tokens);

        let schema = parse_subject_schema(&mut cursor).unwrap();
        assert_eq!(schema.codes, vec!["MA101", "CS101"]);
        assert_eq!(schema.names, vec!["Mathematics", "Programming"]);
        assert_eq!(schema.credits, vec![4, 4]);
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.grade_columns[0].x, GRADE1_X);
        assert_eq!(schema.grade_columns[1].x, GRADE2_X);
        assert_eq!(schema.total_credits_column.x, TC_X);
        assert!(schema.has_sgpa());
        assert_eq!(schema.failed_column.x, FAILED_X);
        // the credits loop has already stepped onto the first row token
        assert_eq!(cursor.current().text, "first row");
    }

    #[test]
    fn test_schema_without_sgpa_column() {
        let mut tokens = schema_tokens(4.0, false);
        tokens.push(tok("first row", NAME_X, 7.0));
        let mut cursor = schema_cursor(&tokens);

        let schema = parse_subject_schema(&mut cursor).unwrap();
        assert!(!schema.has_sgpa());
        assert_eq!(schema.total_credits_column.x, TC_X);
        assert_eq!(schema.failed_column.x, FAILED_X);
        assert_eq!(schema.credits, vec![4, 4]);
    }

    #[test]
    fn test_schema_wrapped_subject_name() {
        let tokens = vec![
            tok("Credits", 3.0, 4.0),
            tok("CS102 : Data Structures", LEGEND1_X, 4.0),
            tok("and Algorithms", LEGEND1_X, 4.5),
            tok("CS102", GRADE1_X, 5.0),
            tok("TC", TC_X, 5.0),
            tok("SGPA", SGPA_X, 5.0),
            tok("Papers Failed", FAILED_X, 5.0),
            tok("4", GRADE1_X, 6.0),
            tok("row", NAME_X, 7.0),
        ];
        let mut cursor = schema_cursor(&tokens);

        let schema = parse_subject_schema(&mut cursor).unwrap();
        assert_eq!(schema.codes, vec!["CS102"]);
        assert_eq!(schema.names, vec!["Data Structures and Algorithms"]);
    }

    #[test]
    fn test_schema_splits_on_first_colon_only() {
        let tokens = vec![
            tok("Credits", 3.0, 4.0),
            tok("HU101 : Ethics: Theory and Practice", LEGEND1_X, 4.0),
            tok("HU101", GRADE1_X, 5.0),
            tok("TC", TC_X, 5.0),
            tok("SGPA", SGPA_X, 5.0),
            tok("Papers Failed", FAILED_X, 5.0),
            tok("2", GRADE1_X, 6.0),
            tok("row", NAME_X, 7.0),
        ];
        let mut cursor = schema_cursor(&tokens);

        let schema = parse_subject_schema(&mut cursor).unwrap();
        assert_eq!(schema.codes, vec!["HU101"]);
        assert_eq!(schema.names, vec!["Ethics: Theory and Practice"]);
    }

    #[test]
    fn test_schema_empty_at_page_end() {
        let tokens = vec![tok("Page 3", 1.0, 1.0)];
        let mut cursor = schema_cursor(&tokens);

        let schema = parse_subject_schema(&mut cursor).unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema, SubjectSchema::default());
    }

    #[test]
    fn test_schema_bad_credit_value() {
        let tokens = vec![
            tok("Credits", 3.0, 4.0),
            tok("MA101 : Mathematics", LEGEND1_X, 4.0),
            tok("MA101", GRADE1_X, 5.0),
            tok("TC", TC_X, 5.0),
            tok("SGPA", SGPA_X, 5.0),
            tok("Papers Failed", FAILED_X, 5.0),
            tok("four", GRADE1_X, 6.0),
            tok("row", NAME_X, 7.0),
        ];
        let mut cursor = schema_cursor(&tokens);

        let err = parse_subject_schema(&mut cursor).unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidNumber {
                field: "credits",
                text: "four".to_string()
            }
        );
    }

    #[test]
    fn test_schema_truncated_fails() {
        let tokens = vec![
            tok("Credits", 3.0, 4.0),
            tok("MA101 : Mathematics", LEGEND1_X, 4.0),
        ];
        let mut cursor = schema_cursor(&tokens);
        assert_eq!(
            parse_subject_schema(&mut cursor),
            Err(PageError::UnexpectedEnd)
        );
    }

    // =====================================================================
    // parse_page
    // =====================================================================

    #[test]
    fn test_parse_page_single_block() {
        let students = parse_page(&btech_page()).unwrap();
        assert_eq!(students.len(), 2);

        let rahul = &students[0];
        assert_eq!(rahul.name, "RAHUL KUMAR");
        assert_eq!(rahul.roll_no, "2K19/CO/101");
        assert_eq!(rahul.first_year_roll_no, "");
        assert_eq!(rahul.batch, "2K19");
        assert_eq!(rahul.current_semester, 4);
        assert_eq!(rahul.degree, "Bachelor of Technology");
        let department = rahul.department.as_ref().unwrap();
        assert_eq!(department.code, "CO");
        assert_eq!(department.name, "Computer Engineering");
        assert_eq!(rahul.semester.number, 4);
        assert_eq!(rahul.semester.total_credits, 8);
        assert_eq!(rahul.semester.sgpa, Some(6.5));
        assert_eq!(rahul.semester.subjects.len(), 2);
        assert_eq!(rahul.semester.subjects[0].grade, Grade::A);
        assert!(!rahul.semester.subjects[0].failed);
        assert_eq!(rahul.semester.subjects[1].grade, Grade::F);
        assert!(rahul.semester.subjects[1].failed);
        assert_eq!(rahul.semester.subjects[0].credits, 4);
    }

    #[test]
    fn test_parse_page_first_year_row() {
        let students = parse_page(&btech_page()).unwrap();
        let anita = &students[1];
        assert_eq!(anita.roll_no, "");
        assert_eq!(anita.first_year_roll_no, "A123");
        assert_eq!(anita.batch, "A123");
        assert!(anita.department.is_none());
        assert_eq!(anita.semester.sgpa, Some(9.0));
    }

    #[test]
    fn test_parse_page_blank_grade_cell() {
        let students = parse_page(&btech_page()).unwrap();
        let anita = &students[1];
        assert_eq!(anita.semester.subjects[0].grade, Grade::O);
        assert_eq!(anita.semester.subjects[1].grade, Grade::Empty);
        assert!(!anita.semester.subjects[1].failed);
    }

    #[test]
    fn test_parse_page_multi_line_name() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("VENKATANARASIMHA", NAME_X, 7.0),
            tok("RAJU", NAME_X, 7.5),
            tok("3", SERIAL_X, 7.5),
            tok("2K19/MC/055", ROLL_X, 7.5),
            tok("B+", GRADE1_X, 7.5),
            tok("C", GRADE2_X, 7.5),
            tok("8", TC_X, 7.5),
            tok("7.25", SGPA_X, 7.5),
            tok("Page 1", 1.0, 9.0),
        ]);

        let students = parse_page(&page).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].name, "VENKATANARASIMHA RAJU");
        assert_eq!(students[0].semester.subjects[0].grade, Grade::BPlus);
    }

    #[test]
    fn test_parse_page_unknown_grade_text_becomes_blank() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("SOME STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/102", ROLL_X, 7.0),
            tok("A*", GRADE1_X, 7.0),
            tok("B", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("6.0", SGPA_X, 7.0),
            tok("Page 1", 1.0, 9.0),
        ]);

        let students = parse_page(&page).unwrap();
        assert_eq!(students[0].semester.subjects[0].grade, Grade::Empty);
        assert!(!students[0].semester.subjects[0].failed);
        assert_eq!(students[0].semester.subjects[1].grade, Grade::B);
    }

    #[test]
    fn test_parse_page_no_sgpa_block() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, false));
        page.extend([
            tok("SOME STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/102", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("B", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("OTHER STUDENT", NAME_X, 8.0),
            tok("2", SERIAL_X, 8.0),
            tok("2K19/CO/103", ROLL_X, 8.0),
            tok("O", GRADE1_X, 8.0),
            tok("O", GRADE2_X, 8.0),
            tok("8", TC_X, 8.0),
            tok("Page 1", 1.0, 9.0),
        ]);

        let students = parse_page(&page).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].semester.sgpa, None);
        assert_eq!(students[0].semester.total_credits, 8);
        assert_eq!(students[1].semester.sgpa, None);
        assert_eq!(students[1].name, "OTHER STUDENT");
    }

    #[test]
    fn test_parse_page_multiple_blocks() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("FIRST STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/104", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("A", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("8.0", SGPA_X, 7.0),
        ]);
        page.extend(block_header_tokens(10.0));
        page.extend(schema_tokens(11.0, true));
        page.extend([
            tok("SECOND STUDENT", NAME_X, 14.0),
            tok("1", SERIAL_X, 14.0),
            tok("2K19/EC/055", ROLL_X, 14.0),
            tok("B", GRADE1_X, 14.0),
            tok("C", GRADE2_X, 14.0),
            tok("8", TC_X, 14.0),
            tok("5.5", SGPA_X, 14.0),
            tok("Page 4", 1.0, 16.0),
        ]);

        let students = parse_page(&page).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].name, "FIRST STUDENT");
        assert_eq!(students[1].name, "SECOND STUDENT");
        assert_eq!(students[1].department.as_ref().unwrap().code, "EC");
    }

    #[test]
    fn test_parse_page_skips_stray_tokens_between_rows() {
        // the stray failed-papers token after the first row must not derail
        // the second row
        let students = parse_page(&btech_page()).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].name, "ANITA SINGH");
    }

    #[test]
    fn test_parse_page_row_without_name_is_skipped() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            // no token in the name column; everything here gets skipped
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/105", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("A", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("8.0", SGPA_X, 7.0),
            tok("Page 1", 1.0, 9.0),
        ]);

        let students = parse_page(&page).unwrap();
        assert!(students.is_empty());
    }

    #[test]
    fn test_parse_page_marker_only() {
        let page = vec![tok("Page 3", 1.0, 1.0)];
        assert_eq!(parse_page(&page), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_page_metadata_without_block() {
        let mut page = meta_tokens();
        page.push(tok("Page 2", 1.0, 3.0));
        assert_eq!(parse_page(&page), Ok(Vec::new()));
    }

    #[test]
    fn test_parse_page_unknown_department_fails() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("SOME STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/ZZ/001", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("A", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("8.0", SGPA_X, 7.0),
            tok("Page 1", 1.0, 9.0),
        ]);

        let err = parse_page(&page).unwrap_err();
        assert_eq!(
            err,
            PageError::UnknownDepartment(UnknownDepartment("ZZ".to_string()))
        );
    }

    #[test]
    fn test_parse_page_truncated_mid_row_fails() {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("SOME STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/CO/106", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            // page ends without the rest of the row or a page marker
        ]);

        assert_eq!(parse_page(&page), Err(PageError::UnexpectedEnd));
    }

    #[test]
    fn test_parse_page_zero_tokens_fails() {
        assert_eq!(parse_page(&[]), Err(PageError::UnexpectedEnd));
    }

    // =====================================================================
    // parse_pages
    // =====================================================================

    fn bad_page() -> Vec<Token> {
        let mut page = meta_tokens();
        page.extend(block_header_tokens(3.0));
        page.extend(schema_tokens(4.0, true));
        page.extend([
            tok("SOME STUDENT", NAME_X, 7.0),
            tok("1", SERIAL_X, 7.0),
            tok("2K19/ZZ/001", ROLL_X, 7.0),
            tok("A", GRADE1_X, 7.0),
            tok("A", GRADE2_X, 7.0),
            tok("8", TC_X, 7.0),
            tok("8.0", SGPA_X, 7.0),
            tok("Page 2", 1.0, 9.0),
        ]);
        page
    }

    #[test]
    fn test_parse_pages_isolates_failures() {
        let pages = vec![btech_page(), bad_page(), btech_page()];
        let report = parse_pages(&pages);

        assert_eq!(report.students.len(), 4);
        assert!(!report.is_complete());
        assert_eq!(report.failed_pages.len(), 1);
        assert_eq!(report.failed_pages[0].page, 2);
        assert!(matches!(
            report.failed_pages[0].error,
            PageError::UnknownDepartment(_)
        ));
    }

    #[test]
    fn test_parse_pages_complete_report_into_students() {
        let pages = vec![btech_page(), btech_page()];
        let report = parse_pages(&pages);
        assert!(report.is_complete());
        let students = report.into_students().unwrap();
        assert_eq!(students.len(), 4);
    }

    #[test]
    fn test_parse_pages_error_names_every_failed_page() {
        let pages = vec![bad_page(), btech_page(), bad_page()];
        let report = parse_pages(&pages);
        assert_eq!(report.students.len(), 2);

        let err = report.into_students().unwrap_err();
        assert_eq!(err.to_string(), "unable to parse pages 1, 3");
        assert_eq!(err.failed_pages.len(), 2);
    }
}
