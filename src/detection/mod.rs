//! Visual and acoustic detection records.
//!
//! Detections are produced upstream (YOLO on drone tiles, `BirdNET` on
//! recorder audio) and arrive here as read-only snapshots.

mod parser;
mod snapshot;
mod types;

pub use parser::{load_acoustic_detections, load_visual_detections};
pub use snapshot::{DetectionRef, Snapshot};
pub use types::{
    AcousticDetection, BoundingBox, DetectionCore, Fix, Modality, Sensed, VisualDetection,
};
