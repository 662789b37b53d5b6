//! Core library for marksheet
//!
//! This crate implements the **Functional Core** of the marksheet application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The marksheet project uses a multi-crate architecture to enforce separation of concerns:
//!
//! - **`marksheet_core`** (this crate): Pure transformation functions with zero I/O
//! - **`pdf`**: Positioned-text extraction from PDF documents
//! - **`marksheet`**: I/O operations and orchestration (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Deterministic**: Behavior is predictable and reproducible
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! ## Benefits
//!
//! This architectural separation provides:
//!
//! - **Enhanced testability**: Layout reconstruction is exercised with hand-built
//!   token fixtures instead of binary PDF files
//! - **Better maintainability**: Parsing logic is isolated from I/O concerns
//! - **Improved reusability**: The same engine serves the CLI and future contexts
//! - **Clearer reasoning**: Functions can be understood in isolation
//!
//! # Module Organization
//!
//! The core crate is organized by domain:
//!
//! - [`parser`]: Layout reconstruction from positioned text tokens
//! - [`stats`]: Per-subject grade distributions across a document
//! - [`grade`], [`student`]: Domain models for grades and student records
//! - [`department`], [`roman`]: Roll-number department lookup and Roman numerals
//! - [`token`], [`cursor`]: Positioned tokens and the page-local scan cursor
//!
//! Each module contains:
//!
//! - **Domain models**: Structured types representing page structure and outputs
//! - **Transformation functions**: Pure functions that rebuild records from tokens
//! - **Comprehensive tests**: Unit tests using fixture data (no mocking)
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use marksheet_core::parser::parse_pages;
//! use marksheet_core::token::Token;
//!
//! // Create fixture data (no PDF required)
//! let page = vec![
//!     Token::new("Program :", 10.0, 40.0),
//!     Token::new("Bachelor of Technology", 30.0, 40.0),
//!     // ... the rest of the page
//! ];
//!
//! // Transform using pure function
//! let report = parse_pages(&[page]);
//!
//! // Assert on results (no mocking needed)
//! assert!(report.is_complete());
//! ```
//!
//! # Pattern Reference
//!
//! This architecture is based on Gary Bernhardt's Functional Core, Imperative Shell pattern.
//! The key insight: **data transformation logic should be pure and ignorant of where data
//! comes from or where it goes**.

pub mod cursor;
pub mod department;
pub mod grade;
pub mod parser;
pub mod roman;
pub mod stats;
pub mod student;
pub mod token;
