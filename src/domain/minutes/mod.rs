//! Minutes domain module

mod language;
mod prompt;
mod stage;
mod text;

pub use language::{LanguageHint, DEFAULT_LANGUAGE};
pub use prompt::{ChatPrompt, REFINEMENT_TEMPERATURE, SUMMARY_TEMPERATURE};
pub use stage::PipelineStage;
pub use text::{Minutes, RefinedText, SummaryText, Transcript};
