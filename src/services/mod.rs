//! Services Layer
//!
//! Business logic composing the calendrical resolver, prompt builder,
//! model gateway and decoder into the synthesis pipeline. Called by the
//! CLI entry point and by any embedding application.

pub mod synthesis_service;

pub use synthesis_service::{AnalysisRecord, DestinyResult, SynthesisService, TimelinePoint};
