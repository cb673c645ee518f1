//! Drone color-class to acoustic species fusion.
//!
//! The drone model labels many birds only by plumage color (`white_birds`).
//! Recorders identify species but not counts of individuals. This module
//! combines per-survey counts from both to estimate which species make up
//! each color class.

mod inference;
mod mapping;
mod report;

pub use inference::{Inference, SpeciesShare, infer_color_class, rounded_percent};
pub use mapping::{Color, ColorSpeciesMapping};
pub use report::{AcousticScope, FusionReport, ReportScope, build_fusion_report, mapping_or_empty};
