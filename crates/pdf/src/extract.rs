//! Positioned-token extraction from PDF content streams.
//!
//! Result sheets carry no table markup, so downstream parsing works entirely
//! from the position of each text fragment. This module walks a page's
//! content stream with a simplified text-rendering state machine and emits
//! one [`TextToken`] per shown string, in content-stream order. Layout
//! reconstruction depends on that order; tokens are never re-sorted here.
//!
//! # Pipeline
//!
//! ```text
//! content ops  ->  state machine  ->  normalize  ->  TextToken[]
//!   (per page)     Tm/Td/Tj/TJ...     NFC, ligatures    (stream order)
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::backend::{get_number_from_value, PageId, PdfBackend, PdfValue};
use crate::PdfError;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A single run of text at a specific position on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextToken {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Approximate character width as a fraction of font size when no better
/// metric is available.  0.5 is a reasonable default for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

// ---------------------------------------------------------------------------
// Text normalization
// ---------------------------------------------------------------------------

/// Normalize one extracted token's text.
///
/// Applies Unicode NFC normalization, expands the common Latin ligatures,
/// drops replacement characters left behind by undecodable glyphs, collapses
/// interior whitespace runs and trims the ends. Anchor matching downstream
/// compares literal strings, so the same cell must normalize identically no
/// matter how the producer chunked it.
pub fn normalize_token(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    let ligatures = [
        ("\u{FB00}", "ff"),
        ("\u{FB01}", "fi"),
        ("\u{FB02}", "fl"),
        ("\u{FB03}", "ffi"),
        ("\u{FB04}", "ffl"),
    ];
    for (lig, replacement) in &ligatures {
        result = result.replace(lig, replacement);
    }

    result = result.replace('\u{FFFD}', "");

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"\s{2,}").unwrap());
    result = re_spaces.replace_all(&result, " ").to_string();

    result.trim().to_string()
}

// ---------------------------------------------------------------------------
// Internal: PDF text-state machine
// ---------------------------------------------------------------------------

/// Mutable state tracked while walking a page's content stream.
#[derive(Debug, Clone)]
struct TextState {
    /// Current font resource name (the `/F1`-style key, not the full name).
    font_key: Vec<u8>,
    /// Current font size in text-space units.
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix -- set by BT and updated by Td/TD/T*/Tm.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (percent / 100).  Default 1.0.
    horiz_scale: f32,
    /// Character spacing (Tc).
    char_spacing: f32,
    /// Word spacing (Tw).
    word_spacing: f32,
    /// Text rise (Ts).
    text_rise: f32,
    /// Leading (TL).
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_key: Vec::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            text_rise: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Current X position derived from the text matrix.
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    /// Current Y position derived from the text matrix.
    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    /// Advance the text matrix horizontally by `dx` text-space units.
    fn advance_x(&mut self, dx: f32) {
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    /// Multiply the text line matrix by a translation (used by Td / TD).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }
}

/// Advance the text matrix after rendering `text`.
///
/// Without glyph metrics each character contributes
/// `font_size * APPROX_CHAR_WIDTH_RATIO * horiz_scale`, plus the configured
/// character and word spacing.
fn advance_after_show(text: &str, state: &mut TextState) {
    let mut total_dx: f32 = 0.0;
    for ch in text.chars() {
        let char_w = state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale;
        total_dx += char_w + state.char_spacing;
        if ch == ' ' {
            total_dx += state.word_spacing;
        }
    }
    state.advance_x(total_dx);
}

/// Decode a single [`PdfValue::Str`] operand into a `String`, using the
/// backend's font-aware decoder.
fn decode_string(
    val: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    font_key: &[u8],
) -> String {
    match val {
        PdfValue::Str(bytes) => {
            let decoded = backend.decode_text(page_id, font_key, bytes);
            if decoded.is_empty() {
                crate::backend::decode_text_simple(bytes)
            } else {
                decoded
            }
        }
        _ => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Public API: token extraction
// ---------------------------------------------------------------------------

/// Walk a single page's content stream and produce its [`TextToken`]s in
/// content-stream order.
///
/// Implements a simplified PDF text-rendering state machine handling the
/// operators:
///
/// | Operator | Action |
/// |----------|--------|
/// | `BT`     | Begin text object -- reset matrices |
/// | `ET`     | End text object |
/// | `Tf`     | Set font and size |
/// | `Tm`     | Set text matrix directly |
/// | `Td`     | Translate text position |
/// | `TD`     | Translate and set leading |
/// | `T*`     | Move to start of next line |
/// | `TL`     | Set text leading |
/// | `Tc`     | Set character spacing |
/// | `Tw`     | Set word spacing |
/// | `Tz`     | Set horizontal scaling |
/// | `Ts`     | Set text rise |
/// | `Tj`     | Show a string |
/// | `TJ`     | Show strings with kerning adjustments |
/// | `'`      | Move to next line and show string |
/// | `"`      | Set spacing, move to next line and show string |
pub fn extract_page_tokens(
    backend: &dyn PdfBackend,
    page_id: PageId,
) -> Result<Vec<TextToken>, PdfError> {
    let raw_content = backend.page_content(page_id)?;
    let ops = backend.decode_content(&raw_content)?;

    let mut state = TextState::default();
    let mut tokens: Vec<TextToken> = Vec::new();

    for op in &ops {
        match op.operator.as_str() {
            // -- Text object delimiters --------------------------------
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {
                // Font state persists across text objects because some
                // producers set the font once and reuse it.
            }

            // -- Font ---------------------------------------------------
            "Tf" => {
                handle_tf(&op.operands, &mut state);
            }

            // -- Text matrix / position ---------------------------------
            "Tm" => {
                handle_tm(&op.operands, &mut state);
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // TD is equivalent to: -ty TL ; tx ty Td
                if op.operands.len() >= 2 {
                    let tx = get_number_from_value(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number_from_value(&op.operands[1]).unwrap_or(0.0);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                // Move to start of next line: equivalent to 0 -TL Td
                state.translate_line(0.0, -state.leading);
            }
            "TL" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.leading = v;
                }
            }

            // -- Spacing / scaling --------------------------------------
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Ts" => {
                if let Some(v) = op.operands.first().and_then(get_number_from_value) {
                    state.text_rise = v;
                }
            }

            // -- Show text ----------------------------------------------
            "Tj" => {
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut tokens);
                }
            }
            "TJ" => {
                if let Some(PdfValue::Array(arr)) = op.operands.first() {
                    handle_tj_array(arr, backend, page_id, &mut state, &mut tokens);
                }
            }

            // -- Convenience show operators -----------------------------
            "'" => {
                // Move to next line, then show string.
                state.translate_line(0.0, -state.leading);
                if let Some(first) = op.operands.first() {
                    emit_show_string(first, backend, page_id, &mut state, &mut tokens);
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, T*, Tj
                if op.operands.len() >= 3 {
                    if let Some(aw) = get_number_from_value(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = get_number_from_value(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    state.translate_line(0.0, -state.leading);
                    emit_show_string(&op.operands[2], backend, page_id, &mut state, &mut tokens);
                }
            }

            _ => { /* Ignore non-text operators */ }
        }
    }

    Ok(tokens)
}

/// Handle the `Tf` (set font) operator.
fn handle_tf(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 2 {
        return;
    }
    let key = match &operands[0] {
        PdfValue::Name(n) => n.clone(),
        PdfValue::Str(s) => s.clone(),
        _ => return,
    };
    state.font_size = get_number_from_value(&operands[1]).unwrap_or(0.0);
    state.font_key = key;
}

/// Handle the `Tm` (set text matrix) operator.
fn handle_tm(operands: &[PdfValue], state: &mut TextState) {
    if operands.len() < 6 {
        return;
    }
    let vals: Vec<f32> = operands
        .iter()
        .take(6)
        .filter_map(get_number_from_value)
        .collect();
    if vals.len() == 6 {
        state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
        state.line_matrix = state.text_matrix;
    }
}

/// Decode an operand as a string, emit a [`TextToken`], and advance the
/// text position.  Shared by `Tj`, `'`, and `"` operators.
fn emit_show_string(
    operand: &PdfValue,
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    tokens: &mut Vec<TextToken>,
) {
    let text = decode_string(operand, backend, page_id, &state.font_key);
    if text.is_empty() {
        return;
    }
    let x = state.x();
    let y = state.y() + state.text_rise;
    let normalized = normalize_token(&text);
    // position advances on the raw text even when nothing is emitted
    advance_after_show(&text, state);
    if normalized.is_empty() {
        return;
    }
    tokens.push(TextToken {
        text: normalized,
        x,
        y,
    });
}

/// Process a `TJ` array: elements are either strings to render or numeric
/// kerning adjustments (in thousandths of a unit of text space).
///
/// All fragments of one array are folded into a single token; the result
/// sheet producer splits individual cells this way, and downstream anchor
/// matching needs the whole cell text in one piece. A kerning displacement
/// wide enough to look like a word gap becomes a literal space.
fn handle_tj_array(
    arr: &[PdfValue],
    backend: &dyn PdfBackend,
    page_id: PageId,
    state: &mut TextState,
    tokens: &mut Vec<TextToken>,
) {
    let mut buf = String::new();
    let mut token_x = state.x();
    let token_y = state.y() + state.text_rise;

    for elem in arr {
        match elem {
            PdfValue::Str(_) => {
                let fragment = decode_string(elem, backend, page_id, &state.font_key);
                if buf.is_empty() {
                    token_x = state.x();
                }
                buf.push_str(&fragment);
                advance_after_show(&fragment, state);
            }
            val => {
                // Numeric kerning: negative value = move right, positive =
                // move left (in thousandths of a text-space unit).
                if let Some(adj) = get_number_from_value(val) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;

                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;

                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }

                    state.advance_x(dx);
                }
            }
        }
    }

    let normalized = normalize_token(&buf);
    if !normalized.is_empty() {
        tokens.push(TextToken {
            text: normalized,
            x: token_x,
            y: token_y,
        });
    }
}

// ---------------------------------------------------------------------------
// Public API: multi-page extraction
// ---------------------------------------------------------------------------

/// Extract tokens from every page in the document.
///
/// Returns a `Vec` of `(page_number, tokens)` where `page_number` is the
/// 1-based index from the backend's page map.
pub fn extract_all_pages(
    backend: &dyn PdfBackend,
) -> Result<Vec<(usize, Vec<TextToken>)>, PdfError> {
    let page_map = backend.pages();
    let mut result: Vec<(usize, Vec<TextToken>)> = Vec::with_capacity(page_map.len());

    for (&page_num, &page_id) in &page_map {
        let tokens = extract_page_tokens(backend, page_id)?;
        result.push((page_num as usize, tokens));
    }

    Ok(result)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
