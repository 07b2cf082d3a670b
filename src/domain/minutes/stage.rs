//! Pipeline stage markers

use std::fmt;

/// Where a minutes request currently is.
///
/// Stages only move forward; a fault at any stage ends the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Received,
    Stored,
    Transcribed,
    Refined,
    Summarized,
    Done,
}

impl PipelineStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Stored => "stored",
            Self::Transcribed => "transcribed",
            Self::Refined => "refined",
            Self::Summarized => "summarized",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(PipelineStage::Received < PipelineStage::Stored);
        assert!(PipelineStage::Refined < PipelineStage::Summarized);
        assert!(PipelineStage::Summarized < PipelineStage::Done);
    }

    #[test]
    fn display() {
        assert_eq!(PipelineStage::Transcribed.to_string(), "transcribed");
    }
}
