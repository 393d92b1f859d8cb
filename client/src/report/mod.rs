//! Client-side reporting over already-loaded query results.
//!
//! `hours` pairs punches into worked time; `export` lays the results out as
//! a spreadsheet and writes the `.xlsx` file.

pub mod export;
pub mod hours;
