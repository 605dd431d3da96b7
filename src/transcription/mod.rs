//! Transcription Module
//!
//! Provider catalog, selection policies and plan execution with retries
//! and fallbacks.

mod catalog;
mod gemini;
mod job;
mod openai;
mod orchestrator;
mod plan;
mod policy;
mod provider;

pub use catalog::*;
pub use gemini::*;
pub use job::*;
pub use openai::*;
pub use orchestrator::*;
pub use plan::*;
pub use policy::*;
pub use provider::*;
