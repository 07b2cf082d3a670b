//! Chat prompt value object

/// System role for the correction pass
const REFINEMENT_SYSTEM: &str = "あなたは文章の専門家です。";

/// Instruction for the correction pass; the transcript follows it
const REFINEMENT_INSTRUCTION: &str =
    "以下の文章で日本語としておかしい部分を修正し、自然で読みやすい文章にしてください。:";

/// System role for the summary pass
const SUMMARY_SYSTEM: &str = "あなたは文章要約の専門家です。";

/// Instruction for the summary pass; the corrected text follows it
const SUMMARY_INSTRUCTION: &str = "以下の文章を日本語で簡潔に箇条書きで要約してください:";

/// Low temperature keeps corrections close to what was said
pub const REFINEMENT_TEMPERATURE: f32 = 0.2;

/// Summaries are fully greedy
pub const SUMMARY_TEMPERATURE: f32 = 0.0;

/// Value object holding one system + user exchange for a chat model.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    system: String,
    user: String,
    temperature: f32,
}

impl ChatPrompt {
    /// Prompt asking for a grammatically natural Japanese rewrite
    pub fn refinement(transcript: &str) -> Self {
        Self {
            system: REFINEMENT_SYSTEM.to_string(),
            user: format!("{}\n\n{}", REFINEMENT_INSTRUCTION, transcript),
            temperature: REFINEMENT_TEMPERATURE,
        }
    }

    /// Prompt asking for a concise bulleted summary
    pub fn summary(corrected: &str) -> Self {
        Self {
            system: SUMMARY_SYSTEM.to_string(),
            user: format!("{}\n\n{}", SUMMARY_INSTRUCTION, corrected),
            temperature: SUMMARY_TEMPERATURE,
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}
