//! JSON question bank loading.
//!
//! The file format is a list of sections, each with a list of questions whose
//! `question_text` is either one string or a list of segments. A segment that
//! is exactly one of the markers `STATEMENT`, `STATEMENTS`, `LIST`, `MTF_DATA`
//! or `PARAGRAPH` is replaced by the structured payload stored next to the
//! text. Only the shape of the file is checked here; [`crate::build`] does the
//! semantic validation.

use crate::model::{Fragment, RawQuestion, Section};
use crate::types::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct BankFile {
    sections: Vec<SectionEntry>,
}

fn unnamed_section() -> String {
    "Unnamed Section".to_string()
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    #[serde(default = "unnamed_section")]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    required_questions: Option<usize>,
    #[serde(default)]
    questions: Vec<QuestionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionText {
    One(String),
    Segments(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
struct MatchData {
    #[serde(default)]
    left_column: Vec<String>,
    #[serde(default)]
    right_column: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    question_text: QuestionText,
    #[serde(default)]
    choices: Vec<String>,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    question_type: Option<String>,
    #[serde(default)]
    statement: Option<String>,
    #[serde(default)]
    statements: Option<Vec<String>>,
    #[serde(default)]
    sequence_items: Option<Vec<String>>,
    #[serde(default)]
    list_items: Option<Vec<String>>,
    #[serde(default)]
    paragraph: Option<String>,
    #[serde(default)]
    question_text_after: Option<String>,
    #[serde(default)]
    mtf_data: Option<MatchData>,
}

/// Structured payload a marker or question type refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Payload {
    Statement,
    Statements,
    List,
    Match,
    Paragraph,
    Sequence,
}

impl Payload {
    fn from_marker(segment: &str) -> Option<Self> {
        match segment {
            "STATEMENT" => Some(Payload::Statement),
            "STATEMENTS" => Some(Payload::Statements),
            "LIST" => Some(Payload::List),
            "MTF_DATA" => Some(Payload::Match),
            "PARAGRAPH" => Some(Payload::Paragraph),
            _ => None,
        }
    }

    fn from_question_type(question_type: &str) -> Option<Self> {
        match question_type {
            "s-mcq" => Some(Payload::Statement),
            "ms-mcq" => Some(Payload::Statements),
            "seq-mcq" => Some(Payload::Sequence),
            "p-mcq" => Some(Payload::Paragraph),
            "mtf-mcq" => Some(Payload::Match),
            _ => None,
        }
    }
}

impl QuestionEntry {
    /// Fragment for `payload`. A missing payload yields an empty fragment,
    /// which validation later rejects.
    fn payload(&self, payload: Payload) -> Fragment {
        match payload {
            Payload::Statement => match (&self.statement, &self.statements) {
                (None, Some(items)) => Fragment::Statements(items.clone()),
                (statement, _) => Fragment::Statement(statement.clone().unwrap_or_default()),
            },
            Payload::Statements => match (&self.statements, &self.statement) {
                (None, Some(statement)) => Fragment::Statement(statement.clone()),
                (items, _) => Fragment::Statements(items.clone().unwrap_or_default()),
            },
            Payload::List => Fragment::List(self.list_items.clone().unwrap_or_default()),
            Payload::Sequence => Fragment::Sequence(self.sequence_items.clone().unwrap_or_default()),
            Payload::Paragraph => Fragment::Paragraph(self.paragraph.clone().unwrap_or_default()),
            Payload::Match => {
                let data = self.mtf_data.as_ref();
                Fragment::MatchTable {
                    left: data.map(|d| d.left_column.clone()).unwrap_or_default(),
                    right: data.map(|d| d.right_column.clone()).unwrap_or_default(),
                }
            }
        }
    }

    fn into_raw(self) -> RawQuestion {
        let segments: Vec<String> = match &self.question_text {
            QuestionText::One(text) => vec![text.clone()],
            QuestionText::Segments(segments) => segments.clone(),
        };

        let mut fragments = Vec::with_capacity(segments.len() + 1);
        let mut referenced = Vec::new();
        for segment in segments {
            match Payload::from_marker(segment.trim()) {
                Some(payload) => {
                    fragments.push(self.payload(payload));
                    referenced.push(payload);
                }
                None if segment.trim().is_empty() => {}
                None => fragments.push(Fragment::Text(segment)),
            }
        }

        let typed = self.question_type.as_deref().and_then(|t| {
            let payload = Payload::from_question_type(t);
            if payload.is_none() && t != "mcq" {
                log::warn!("Unknown question_type '{}', treating as mcq", t);
            }
            payload
        });
        if let Some(payload) = typed {
            let covered = referenced.iter().any(|r| {
                *r == payload
                    || matches!(
                        (r, payload),
                        (Payload::Statement, Payload::Statements)
                            | (Payload::Statements, Payload::Statement)
                    )
            });
            if !covered {
                fragments.push(self.payload(payload));
            }
            if payload == Payload::Paragraph {
                if let Some(after) = self.question_text_after.as_ref().filter(|t| !t.trim().is_empty()) {
                    fragments.push(Fragment::Text(after.clone()));
                }
            }
        }

        RawQuestion {
            fragments,
            options: self.choices,
            answer: self.answer,
            reasoning: self.reasoning,
        }
    }
}

/// Parse a question bank from JSON text.
pub fn parse_bank(json: &str) -> Result<Vec<Section>> {
    let file: BankFile = serde_json::from_str(json)?;
    Ok(file
        .sections
        .into_iter()
        .map(|s| Section {
            name: s.name,
            description: s.description,
            required_questions: s.required_questions,
            questions: s.questions.into_iter().map(QuestionEntry::into_raw).collect(),
        })
        .collect())
}

/// Load a question bank from a JSON file.
pub async fn load_bank(path: impl AsRef<Path>) -> Result<Vec<Section>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await?;
    let sections = parse_bank(&text)?;
    log::debug!(
        "Loaded {} sections from {}",
        sections.len(),
        path.display()
    );
    Ok(sections)
}
