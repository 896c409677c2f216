//! Life Destiny K-Line
//!
//! Converts a Gregorian birth moment into a Four Pillars (Bazi) chart plus
//! decade luck cycle, then orchestrates an OpenAI-compatible completion
//! endpoint into a 120-point annual fortune timeline and a structured
//! narrative analysis for the rendering layer.

pub mod bazi;
pub mod decoder;
pub mod error;
pub mod gateway;
pub mod prompts;
pub mod services;

pub use bazi::{resolve, BaziChart, BirthInput, FourPillars, Gender, LuckCycle, LuckDirection};
pub use error::{AppError, ErrorResponse, Result};
pub use gateway::{ChatGateway, GatewayConfig, OpenAiGateway};
pub use services::{AnalysisRecord, DestinyResult, SynthesisService, TimelinePoint};
