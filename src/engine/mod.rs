// src/engine/mod.rs
//! The evidence engine: per-URL sequencing, the site-search detection chain,
//! link harvesting and the per-feature state machine.

pub mod detect;
pub mod engine;
pub mod feature;
pub mod links;
pub mod types;

pub use detect::{SearchDetection, SearchHit, detect_search};
pub use engine::Surveyor;
pub use feature::{FeatureState, FollowOutcome};
pub use types::{DetectionKind, EvidenceItem, Feature, SurveyResult};
