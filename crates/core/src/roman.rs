//! Roman numeral conversion for the semester marker.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Error for text that is not a classical Roman numeral.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("\"{0}\" is not a valid Roman numeral")]
pub struct InvalidRomanNumeral(pub String);

fn digit_value(digit: char) -> u32 {
    match digit {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

/// Convert a Roman numeral to its integer value.
///
/// Validation is strict classical form, so the empty string and malformed
/// sequences like `"IIX"` are rejected rather than guessed at.
pub fn deromanize(numeral: &str) -> Result<u32, InvalidRomanNumeral> {
    static FORM: OnceLock<Regex> = OnceLock::new();
    let form = FORM.get_or_init(|| {
        Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$").unwrap()
    });
    if numeral.is_empty() || !form.is_match(numeral) {
        return Err(InvalidRomanNumeral(numeral.to_string()));
    }

    let mut total = 0u32;
    let mut prev = 0u32;
    for digit in numeral.chars().rev() {
        let value = digit_value(digit);
        if value < prev {
            total -= value;
        } else {
            total += value;
            prev = value;
        }
    }
    Ok(total)
}
