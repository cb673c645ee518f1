//! Caller-held detection snapshots.

use super::{AcousticDetection, DetectionCore, Modality, Sensed, VisualDetection};
use serde::Serialize;

/// Point-in-time view of both detection collections.
///
/// The core never refreshes or mutates a snapshot; callers load a new one
/// when the detection store changes.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Drone detections.
    pub visual: Vec<VisualDetection>,
    /// Recorder detections.
    pub acoustic: Vec<AcousticDetection>,
}

/// Borrowed detection of either modality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DetectionRef<'a> {
    /// A drone detection.
    Visual(&'a VisualDetection),
    /// A recorder detection.
    Acoustic(&'a AcousticDetection),
}

impl DetectionRef<'_> {
    /// Shared detection fields.
    pub fn core(&self) -> &DetectionCore {
        match self {
            Self::Visual(d) => d.core(),
            Self::Acoustic(d) => d.core(),
        }
    }

    /// Modality of the referenced detection.
    pub const fn modality(&self) -> Modality {
        match self {
            Self::Visual(_) => Modality::Visual,
            Self::Acoustic(_) => Modality::Acoustic,
        }
    }
}

impl Snapshot {
    /// Create a snapshot from two loaded collections.
    pub fn new(visual: Vec<VisualDetection>, acoustic: Vec<AcousticDetection>) -> Self {
        Self { visual, acoustic }
    }

    /// Look up a detection by id, searching visual detections first.
    pub fn find(&self, id: &str) -> Option<DetectionRef<'_>> {
        self.visual
            .iter()
            .find(|d| d.core.id == id)
            .map(DetectionRef::Visual)
            .or_else(|| {
                self.acoustic
                    .iter()
                    .find(|d| d.core.id == id)
                    .map(DetectionRef::Acoustic)
            })
    }

    /// Find a detection of a specific modality by id.
    pub fn find_in(&self, modality: Modality, id: &str) -> Option<DetectionRef<'_>> {
        match modality {
            Modality::Visual => self
                .visual
                .iter()
                .find(|d| d.core.id == id)
                .map(DetectionRef::Visual),
            Modality::Acoustic => self
                .acoustic
                .iter()
                .find(|d| d.core.id == id)
                .map(DetectionRef::Acoustic),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detection::DetectionCore;

    fn core(id: &str) -> DetectionCore {
        DetectionCore {
            id: id.to_string(),
            label: "x".to_string(),
            corrected_class: None,
            confidence: 0.5,
            lat: None,
            lon: None,
            timestamp: None,
            survey_id: None,
            survey_name: None,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![VisualDetection {
                core: core("1"),
                bbox: None,
                asset_id: None,
                image_url: None,
            }],
            vec![AcousticDetection {
                core: core("1"),
                audio_url: None,
                aru_id: None,
                radius: None,
            }],
        )
    }

    #[test]
    fn test_find_prefers_visual_on_id_clash() {
        let snap = snapshot();
        assert_eq!(snap.find("1").unwrap().modality(), Modality::Visual);
        assert!(snap.find("2").is_none());
    }

    #[test]
    fn test_find_in_modality() {
        let snap = snapshot();
        let found = snap.find_in(Modality::Acoustic, "1").unwrap();
        assert_eq!(found.modality(), Modality::Acoustic);
        assert_eq!(found.core().id, "1");
    }
}
