use crate::model::{Fragment, QuestionId, QuestionKind, QuestionRecord};

/// A renderable question for one paper set.
///
/// Derived 1:1 from a [`QuestionRecord`] after shuffling. Blocks belong to a
/// single set and are never shared between sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Canonical identity of the source record
    pub id: QuestionId,
    /// Displayed question number (1-based, continuous across sections)
    pub number: usize,
    pub kind: QuestionKind,
    pub fragments: Vec<Fragment>,
    /// Options in displayed order
    pub options: Vec<String>,
    /// Shown only in the answer-key view
    pub reasoning: Option<String>,
    /// Estimated height, filled in by the height estimator
    pub height: f32,
}

impl Block {
    /// Build a block from `record` with options in `option_order`
    /// (displayed position -> canonical option index).
    pub fn from_record(record: &QuestionRecord, number: usize, option_order: &[usize]) -> Self {
        Self {
            id: record.id,
            number,
            kind: record.kind,
            fragments: record.fragments.clone(),
            options: option_order
                .iter()
                .map(|&i| record.options[i].clone())
                .collect(),
            reasoning: None,
            height: 0.0,
        }
    }
}
