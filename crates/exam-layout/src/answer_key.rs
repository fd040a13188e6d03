//! Answer keys derived from permutation maps, and their cross-set summary.

use crate::constants::option_letter;
use crate::model::{ExamBank, QuestionId};
use crate::paper::PaperSet;
use crate::shuffle::PermutationMap;
use crate::types::{ExamError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correct answer for one displayed question of one set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnswerKeyEntry {
    /// Displayed question number (1-based)
    pub number: usize,
    pub section: String,
    /// Displayed letter of the correct option
    pub letter: char,
    /// Text of the correct option
    pub answer: String,
    pub canonical: QuestionId,
}

/// Read the answer key for one set off its permutation map.
pub fn derive_answer_key(bank: &ExamBank, map: &PermutationMap) -> Result<Vec<AnswerKeyEntry>> {
    map.questions()
        .iter()
        .enumerate()
        .map(|(position, mapping)| {
            let record = bank.record(mapping.canonical).ok_or_else(|| {
                ExamError::Config(format!(
                    "question {} has no record {:?}",
                    position + 1,
                    mapping.canonical
                ))
            })?;
            let displayed = map.displayed_option(position, record.correct).ok_or_else(|| {
                ExamError::Config(format!(
                    "correct option of question {} is not displayed",
                    position + 1
                ))
            })?;
            let section = bank
                .sections()
                .get(mapping.canonical.section_index)
                .map(|s| s.name.clone())
                .unwrap_or_default();

            Ok(AnswerKeyEntry {
                number: position + 1,
                section,
                letter: option_letter(displayed),
                answer: record.correct_text().to_string(),
                canonical: mapping.canonical,
            })
        })
        .collect()
}

/// One CSV row: a question slot of a section and its letter in every set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeyRow {
    pub section: String,
    /// Position within the section (1-based)
    pub question_number: usize,
    /// One letter per set, `None` when the set has no such question
    pub letters: Vec<Option<char>>,
}

/// Full answer key of one set, as written to the detailed JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SetAnswerKey {
    pub label: String,
    pub seed: u64,
    pub total_marks: u32,
    pub entries: Vec<AnswerKeyEntry>,
}

/// Answer keys of every generated set side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKeySummary {
    pub set_labels: Vec<String>,
    pub rows: Vec<AnswerKeyRow>,
    pub sets: Vec<SetAnswerKey>,
}

impl AnswerKeySummary {
    pub fn from_sets(bank: &ExamBank, sets: &[PaperSet], marks_per_question: u32) -> Self {
        let set_labels: Vec<String> = sets.iter().map(|s| s.label.clone()).collect();

        let mut rows = Vec::new();
        for section in bank.sections() {
            let per_set: Vec<Vec<char>> = sets
                .iter()
                .map(|set| {
                    set.answer_key
                        .iter()
                        .filter(|e| e.canonical.section_index == section.index)
                        .map(|e| e.letter)
                        .collect()
                })
                .collect();

            for slot in 0..section.required_questions {
                rows.push(AnswerKeyRow {
                    section: section.name.clone(),
                    question_number: slot + 1,
                    letters: per_set.iter().map(|letters| letters.get(slot).copied()).collect(),
                });
            }
        }

        let sets = sets
            .iter()
            .map(|set| SetAnswerKey {
                label: set.label.clone(),
                seed: set.seed,
                total_marks: set.answer_key.len() as u32 * marks_per_question,
                entries: set.answer_key.clone(),
            })
            .collect();

        Self {
            set_labels,
            rows,
            sets,
        }
    }

    /// CSV with one column per set: `Section, Question Number, Set A, ...`
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec!["Section".to_string(), "Question Number".to_string()];
        header.extend(self.set_labels.iter().map(|l| format!("Set {}", l)));
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.section.clone(), row.question_number.to_string()];
            record.extend(
                row.letters
                    .iter()
                    .map(|l| l.map(String::from).unwrap_or_else(|| "?".to_string())),
            );
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExamError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| ExamError::Config(format!("CSV is not UTF-8: {}", e)))
    }

    /// Detailed per-set keys as pretty JSON, keyed by `Set <label>`.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        let by_set: std::collections::BTreeMap<String, &SetAnswerKey> = self
            .sets
            .iter()
            .map(|s| (format!("Set {}", s.label), s))
            .collect();
        Ok(serde_json::to_string_pretty(&by_set)?)
    }
}
