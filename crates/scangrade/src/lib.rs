//! Core library for grading fixed-layout optical-scan admission exam sheets.
//!
//! The pipeline: scan files are parsed line by line into typed sheets with
//! per-line diagnostics ([`grading::ingest`]), response sheets are linked to
//! identification sheets and answer keys through composite keys with a
//! litho-only fallback, and a weighting plan expands into per-question point
//! values that the scoring engine applies per candidate
//! ([`grading::scoring`]). Storage, report formatting, and interfaces are
//! the caller's concern; everything here is pure over its inputs.

pub mod config;
pub mod error;
pub mod grading;
pub mod telemetry;
