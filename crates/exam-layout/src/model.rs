//! Content model: validated question records built from raw sections.
//!
//! Records are created once by [`build`] and are read-only afterwards. Every
//! paper set works from the same [`ExamBank`], usually behind an `Arc`.

use crate::constants::OPTION_LETTERS;
use crate::types::{ExamError, Result};
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One piece of question content.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Fragment {
    /// Ordinary question text
    Text(String),
    /// A single labelled statement
    Statement(String),
    /// Numbered statements (i., ii., ...)
    Statements(Vec<String>),
    /// Two-column match-the-following table
    MatchTable { left: Vec<String>, right: Vec<String> },
    /// Indented reading passage
    Paragraph(String),
    /// Bulleted list
    List(Vec<String>),
    /// Items to be put in order
    Sequence(Vec<String>),
}

impl Fragment {
    /// Structured kind contributed by this fragment, `None` for plain text.
    pub fn kind(&self) -> Option<QuestionKind> {
        match self {
            Fragment::Text(_) => None,
            Fragment::Statement(_) => Some(QuestionKind::Statement),
            Fragment::Statements(_) => Some(QuestionKind::MultiStatement),
            Fragment::MatchTable { .. } => Some(QuestionKind::MatchTable),
            Fragment::Paragraph(_) => Some(QuestionKind::Paragraph),
            Fragment::List(_) => Some(QuestionKind::List),
            Fragment::Sequence(_) => Some(QuestionKind::Sequence),
        }
    }

    /// A fragment is empty when its text is blank or any of its items is.
    fn is_empty(&self) -> bool {
        fn blank(items: &[String]) -> bool {
            items.is_empty() || items.iter().any(|i| i.trim().is_empty())
        }
        match self {
            Fragment::Text(s) | Fragment::Statement(s) | Fragment::Paragraph(s) => {
                s.trim().is_empty()
            }
            Fragment::Statements(items) | Fragment::List(items) | Fragment::Sequence(items) => {
                blank(items)
            }
            Fragment::MatchTable { left, right } => blank(left) || blank(right),
        }
    }
}

/// Question kind, derived from the record's fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QuestionKind {
    Plain,
    Statement,
    MultiStatement,
    MatchTable,
    Paragraph,
    List,
    Sequence,
    Composite,
}

impl QuestionKind {
    /// Kind of a question made of `fragments`.
    pub fn classify(fragments: &[Fragment]) -> Self {
        let mut found: Option<QuestionKind> = None;
        for kind in fragments.iter().filter_map(Fragment::kind) {
            match found {
                None => found = Some(kind),
                Some(existing) if existing == kind => {}
                Some(_) => return QuestionKind::Composite,
            }
        }
        found.unwrap_or(QuestionKind::Plain)
    }

    pub fn name(self) -> &'static str {
        match self {
            QuestionKind::Plain => "plain",
            QuestionKind::Statement => "statement",
            QuestionKind::MultiStatement => "multi-statement",
            QuestionKind::MatchTable => "match-table",
            QuestionKind::Paragraph => "paragraph",
            QuestionKind::List => "list",
            QuestionKind::Sequence => "sequence",
            QuestionKind::Composite => "composite",
        }
    }
}

/// Canonical identity of a question in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuestionId {
    pub section_index: usize,
    pub question_index: usize,
}

impl QuestionId {
    pub fn new(section_index: usize, question_index: usize) -> Self {
        Self {
            section_index,
            question_index,
        }
    }
}

/// A question as supplied by the caller, before validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawQuestion {
    pub fragments: Vec<Fragment>,
    pub options: Vec<String>,
    pub answer: String,
    pub reasoning: Option<String>,
}

/// A section of the input bank.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Section {
    pub name: String,
    pub description: Option<String>,
    pub required_questions: Option<usize>,
    pub questions: Vec<RawQuestion>,
}

/// A validated, immutable question.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub kind: QuestionKind,
    pub fragments: Vec<Fragment>,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer
    pub correct: usize,
    pub reasoning: Option<String>,
}

impl QuestionRecord {
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct]
    }
}

/// Section metadata kept alongside the records.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInfo {
    pub index: usize,
    pub name: String,
    pub description: Option<String>,
    /// Number of questions each paper set draws from the pool
    pub required_questions: usize,
    /// Range of this section's records inside [`ExamBank::records`]
    pub records: Range<usize>,
}

impl SectionInfo {
    pub fn pool_size(&self) -> usize {
        self.records.len()
    }
}

/// Validated question bank: ordered records plus section metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamBank {
    sections: Vec<SectionInfo>,
    records: Vec<QuestionRecord>,
}

impl ExamBank {
    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    /// All records in canonical order (section by section).
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn section_records(&self, section_index: usize) -> &[QuestionRecord] {
        self.sections
            .get(section_index)
            .map(|s| &self.records[s.records.clone()])
            .unwrap_or(&[])
    }

    pub fn record(&self, id: QuestionId) -> Option<&QuestionRecord> {
        self.section_records(id.section_index).get(id.question_index)
    }

    /// Questions emitted per paper set, after subset selection.
    pub fn emitted_questions(&self) -> usize {
        self.sections.iter().map(|s| s.required_questions).sum()
    }
}

/// Validate `sections` and turn them into an [`ExamBank`].
///
/// Fails on the first malformed question; nothing is built partially.
pub fn build(sections: &[Section]) -> Result<ExamBank> {
    if sections.is_empty() {
        return Err(ExamError::NoQuestions);
    }

    let mut infos = Vec::with_capacity(sections.len());
    let mut records = Vec::new();

    for (section_index, section) in sections.iter().enumerate() {
        let invalid = |question_index: Option<usize>, field: &'static str| ExamError::Validation {
            section: section.name.clone(),
            question_index,
            field,
        };

        if section.name.trim().is_empty() {
            return Err(invalid(None, "name"));
        }
        if section.questions.is_empty() {
            return Err(invalid(None, "questions"));
        }

        let required = section.required_questions.unwrap_or(section.questions.len());
        if required == 0 || required > section.questions.len() {
            return Err(invalid(None, "required_questions"));
        }

        let start = records.len();
        for (question_index, raw) in section.questions.iter().enumerate() {
            let at = Some(question_index);

            if raw.fragments.is_empty() || raw.fragments.iter().any(Fragment::is_empty) {
                return Err(invalid(at, "content"));
            }
            if raw.options.is_empty()
                || raw.options.len() > OPTION_LETTERS.len()
                || raw.options.iter().any(|o| o.trim().is_empty())
            {
                return Err(invalid(at, "options"));
            }
            if raw.answer.is_empty() {
                return Err(invalid(at, "answer"));
            }

            let correct = raw
                .options
                .iter()
                .position(|o| *o == raw.answer)
                .ok_or_else(|| ExamError::AnswerMismatch {
                    section: section.name.clone(),
                    question_index,
                    answer: raw.answer.clone(),
                })?;

            records.push(QuestionRecord {
                id: QuestionId::new(section_index, question_index),
                kind: QuestionKind::classify(&raw.fragments),
                fragments: raw.fragments.clone(),
                options: raw.options.clone(),
                correct,
                reasoning: raw.reasoning.clone().filter(|r| !r.trim().is_empty()),
            });
        }

        infos.push(SectionInfo {
            index: section_index,
            name: section.name.clone(),
            description: section.description.clone().filter(|d| !d.trim().is_empty()),
            required_questions: required,
            records: start..records.len(),
        });
    }

    log::debug!(
        "Built question bank: {} sections, {} records",
        infos.len(),
        records.len()
    );

    Ok(ExamBank {
        sections: infos,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer: &str) -> RawQuestion {
        RawQuestion {
            fragments: vec![Fragment::Text("What is 2 + 2?".into())],
            options: vec!["3".into(), "4".into(), "5".into()],
            answer: answer.into(),
            reasoning: None,
        }
    }

    #[test]
    fn test_classify_kinds() {
        assert_eq!(
            QuestionKind::classify(&[Fragment::Text("a".into())]),
            QuestionKind::Plain
        );
        assert_eq!(
            QuestionKind::classify(&[
                Fragment::Text("a".into()),
                Fragment::List(vec!["x".into()]),
                Fragment::List(vec!["y".into()]),
            ]),
            QuestionKind::List
        );
        assert_eq!(
            QuestionKind::classify(&[
                Fragment::Paragraph("p".into()),
                Fragment::Statement("s".into()),
            ]),
            QuestionKind::Composite
        );
    }

    #[test]
    fn test_build_resolves_correct_index() {
        let bank = build(&[Section {
            name: "Arithmetic".into(),
            questions: vec![question("4")],
            ..Default::default()
        }])
        .unwrap();

        let record = &bank.records()[0];
        assert_eq!(record.correct, 1);
        assert_eq!(record.correct_text(), "4");
        assert_eq!(bank.sections()[0].required_questions, 1);
    }

    #[test]
    fn test_answer_must_match_exactly() {
        let result = build(&[Section {
            name: "Arithmetic".into(),
            questions: vec![question("4 ")],
            ..Default::default()
        }]);
        match result {
            Err(ExamError::AnswerMismatch { question_index, .. }) => assert_eq!(question_index, 0),
            other => panic!("Expected AnswerMismatch, got {:?}", other),
        }
    }

    fn content_error(fragments: Vec<Fragment>) -> bool {
        let mut q = question("4");
        q.fragments = fragments;
        matches!(
            build(&[Section {
                name: "S".into(),
                questions: vec![q],
                ..Default::default()
            }]),
            Err(ExamError::Validation { field: "content", .. })
        )
    }

    #[test]
    fn test_blank_text_rejected() {
        assert!(content_error(vec![Fragment::Text("   ".into())]));
        assert!(content_error(vec![Fragment::Text(String::new())]));
        assert!(!content_error(vec![Fragment::Text("What is 2 + 2?".into())]));
    }

    #[test]
    fn test_blank_items_rejected() {
        let text = || Fragment::Text("Consider:".into());
        assert!(content_error(vec![
            text(),
            Fragment::Statements(vec!["1. One".into(), "  ".into()]),
        ]));
        assert!(content_error(vec![text(), Fragment::List(vec!["".into()])]));
        assert!(content_error(vec![
            text(),
            Fragment::Sequence(vec!["a".into(), "\t".into()]),
        ]));
        assert!(content_error(vec![
            text(),
            Fragment::MatchTable {
                left: vec!["a".into(), "b".into()],
                right: vec!["1".into(), " ".into()],
            },
        ]));
        assert!(!content_error(vec![
            text(),
            Fragment::MatchTable {
                left: vec!["a".into(), "b".into()],
                right: vec!["1".into(), "2".into()],
            },
        ]));
    }

    #[test]
    fn test_empty_structured_fragment_rejected() {
        let mut q = question("4");
        q.fragments.push(Fragment::Statements(Vec::new()));
        let result = build(&[Section {
            name: "S".into(),
            questions: vec![q],
            ..Default::default()
        }]);
        assert!(matches!(
            result,
            Err(ExamError::Validation { field: "content", .. })
        ));
    }
}
