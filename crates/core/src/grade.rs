//! The letter-grade whitelist and the grade-to-GPA table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A letter grade as printed in a result row.
///
/// Declaration order is best to worst and doubles as the ranking used for
/// median computation and frequency display, which is why the derived `Ord`
/// matters: every passing grade sorts before every failing one, and the
/// blank sentinel sorts last. `Empty` stands in for a blank or unrecognized
/// grade cell; it is neither passing nor failing.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Grade {
    O,
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    P,
    F,
    DT,
    RW,
    RL,
    AB,
    I,
    UFM,
    #[serde(rename = "")]
    Empty,
}

impl Grade {
    /// Every grade, best first, sentinel last.
    pub const ALL: [Grade; 15] = [
        Grade::O,
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::P,
        Grade::F,
        Grade::DT,
        Grade::RW,
        Grade::RL,
        Grade::AB,
        Grade::I,
        Grade::UFM,
        Grade::Empty,
    ];

    /// Parse a grade cell. Text outside the whitelist yields `None`.
    pub fn parse(text: &str) -> Option<Grade> {
        let grade = match text {
            "O" => Grade::O,
            "A+" => Grade::APlus,
            "A" => Grade::A,
            "B+" => Grade::BPlus,
            "B" => Grade::B,
            "C" => Grade::C,
            "P" => Grade::P,
            "F" => Grade::F,
            "DT" => Grade::DT,
            "RW" => Grade::RW,
            "RL" => Grade::RL,
            "AB" => Grade::AB,
            "I" => Grade::I,
            "UFM" => Grade::UFM,
            "" => Grade::Empty,
            _ => return None,
        };
        Some(grade)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::O => "O",
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::P => "P",
            Grade::F => "F",
            Grade::DT => "DT",
            Grade::RW => "RW",
            Grade::RL => "RL",
            Grade::AB => "AB",
            Grade::I => "I",
            Grade::UFM => "UFM",
            Grade::Empty => "",
        }
    }

    /// Grade-point value used for averages.
    pub fn gpa(self) -> f64 {
        match self {
            Grade::O => 10.0,
            Grade::APlus => 9.0,
            Grade::A => 8.0,
            Grade::BPlus => 7.0,
            Grade::B => 6.0,
            Grade::C => 5.0,
            Grade::P => 4.0,
            _ => 0.0,
        }
    }

    pub fn is_passing(self) -> bool {
        matches!(
            self,
            Grade::O | Grade::APlus | Grade::A | Grade::BPlus | Grade::B | Grade::C | Grade::P
        )
    }

    /// Whether this grade flags the paper as failed. The blank sentinel is
    /// not failing.
    pub fn is_failing(self) -> bool {
        matches!(
            self,
            Grade::F
                | Grade::DT
                | Grade::RW
                | Grade::RL
                | Grade::AB
                | Grade::I
                | Grade::UFM
        )
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
