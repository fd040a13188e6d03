use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExamError {
    #[error("Invalid {field} in section '{section}'{}", describe_question(.question_index))]
    Validation {
        section: String,
        question_index: Option<usize>,
        field: &'static str,
    },
    #[error(
        "Answer '{answer}' in section '{section}', question {} does not match any option",
        .question_index + 1
    )]
    AnswerMismatch {
        section: String,
        question_index: usize,
        answer: String,
    },
    #[error("Booklet imposition invariant violated: {0}")]
    ImpositionInvariant(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("No pages to impose")]
    NoPages,
    #[error("Question bank contains no questions")]
    NoQuestions,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

fn describe_question(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(", question {}", i + 1),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, ExamError>;

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    Letter,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Size of the sheet that holds two of these pages side by side
    pub fn booklet_sheet_mm(self) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        (w * 2.0, h)
    }
}

/// Density tier selecting one named size profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Density {
    Small,
    #[default]
    Medium,
    Large,
}

impl Density {
    pub fn name(self) -> &'static str {
        match self {
            Density::Small => "small",
            Density::Medium => "medium",
            Density::Large => "large",
        }
    }
}

/// Column layout of the question area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    OneColumn,
    #[default]
    TwoColumn,
}

impl LayoutMode {
    pub fn columns(self) -> usize {
        match self {
            LayoutMode::OneColumn => 1,
            LayoutMode::TwoColumn => 2,
        }
    }
}

/// Which rendition of a paper set is being laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperView {
    /// The paper handed to candidates
    Questions,
    /// Same paper with correct options marked and reasoning shown
    AnswerKey,
}
