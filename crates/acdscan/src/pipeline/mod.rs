//! Single-eye analysis pipeline.
//!
//! Glue layer that wires the stages together in a fixed order:
//! landmarks -> iris -> pupil -> features -> classification.
//!
//! Algorithmic pieces live in `crate::iris`, `crate::pupil`,
//! `crate::features` and `crate::classify`. This module owns call order,
//! stage logging and the failure points; it performs no computation itself.

mod result;
mod run;

pub use result::AnalysisResult;

pub(crate) use run::{analyze_landmarks, analyze_with_source};
