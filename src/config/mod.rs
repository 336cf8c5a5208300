// src/config/mod.rs
pub mod clock;
pub mod consts;
pub mod keywords;
pub mod options;

pub use clock::SurveyClock;
pub use keywords::Keywords;
pub use options::{Mode, OutputStyle, SurveyOptions, Timing};
