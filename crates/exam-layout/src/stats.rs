use crate::model::{ExamBank, QuestionKind};
use crate::options::GenerationOptions;
use crate::paper::PaperSet;
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-section breakdown of a question bank
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SectionStatistics {
    pub name: String,
    pub description: Option<String>,
    pub pool_size: usize,
    pub required_questions: usize,
}

/// Statistics about a question bank, before any set is generated
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BankStatistics {
    pub sections: Vec<SectionStatistics>,
    /// Questions available across all pools
    pub total_questions: usize,
    /// Questions printed on each set
    pub emitted_questions: usize,
    pub kinds: BTreeMap<QuestionKind, usize>,
}

/// Statistics about one generated paper set
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaperStatistics {
    pub label: String,
    pub sections: usize,
    pub questions: usize,
    pub kinds: BTreeMap<QuestionKind, usize>,
    pub total_marks: u32,
    pub pages: usize,
    pub answer_pages: usize,
    pub sheets: Option<usize>,
    pub blank_pages_added: usize,
    pub overflow_count: usize,
}

/// Calculate statistics for a question bank
pub fn analyze_bank(bank: &ExamBank) -> BankStatistics {
    let mut kinds = BTreeMap::new();
    for record in bank.records() {
        *kinds.entry(record.kind).or_insert(0) += 1;
    }

    BankStatistics {
        sections: bank
            .sections()
            .iter()
            .map(|s| SectionStatistics {
                name: s.name.clone(),
                description: s.description.clone(),
                pool_size: s.pool_size(),
                required_questions: s.required_questions,
            })
            .collect(),
        total_questions: bank.records().len(),
        emitted_questions: bank.emitted_questions(),
        kinds,
    }
}

/// Calculate statistics for a generated paper set
pub fn calculate_statistics(
    bank: &ExamBank,
    set: &PaperSet,
    options: &GenerationOptions,
) -> PaperStatistics {
    let mut kinds = BTreeMap::new();
    for block in &set.blocks {
        *kinds.entry(block.kind).or_insert(0) += 1;
    }

    PaperStatistics {
        label: set.label.clone(),
        sections: bank.sections().len(),
        questions: set.blocks.len(),
        kinds,
        total_marks: set.total_marks(options.marks_per_question),
        pages: set.layout.page_count(),
        answer_pages: set.answer_layout.page_count(),
        sheets: set.sheets.as_ref().map(|s| s.sheets.len()),
        blank_pages_added: set.sheets.as_ref().map(|s| s.blank_pages()).unwrap_or(0),
        overflow_count: set.layout.warnings.len(),
    }
}
