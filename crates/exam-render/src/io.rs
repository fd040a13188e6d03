use crate::booklet::render_booklet;
use crate::paper::render_paper;
use crate::types::*;
use exam_layout::{ExamBank, GenerationOptions, PaperSet, PaperView};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory names under the output directory
pub const QUESTIONS_DIR: &str = "Questions";
pub const ANSWERS_DIR: &str = "Answers";
pub const BOOKLETS_DIR: &str = "Booklets";

/// Files written for one set
#[derive(Debug, Clone, PartialEq)]
pub struct SetOutputs {
    pub questions: PathBuf,
    pub answers: PathBuf,
    pub booklet: Option<PathBuf>,
}

struct RenderedSet {
    questions: Vec<u8>,
    answers: Vec<u8>,
    booklet: Option<Vec<u8>>,
}

fn render_set(set: &PaperSet, bank: &ExamBank, options: &GenerationOptions) -> Result<RenderedSet> {
    Ok(RenderedSet {
        questions: render_paper(set, bank, options, PaperView::Questions)?,
        answers: render_paper(set, bank, options, PaperView::AnswerKey)?,
        booklet: match set.sheets {
            Some(_) => Some(render_booklet(set, bank, options)?),
            None => None,
        },
    })
}

async fn write_file(path: &Path, bytes: Vec<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Render every output of `set` and write it below `output_dir`.
///
/// Layout: `Questions/set_<L>.pdf`, `Answers/set_<L>_answers.pdf` and, when
/// the set was imposed, `Booklets/set_<L>_booklet.pdf`.
pub async fn write_set(
    set: &PaperSet,
    bank: Arc<ExamBank>,
    options: &GenerationOptions,
    output_dir: impl AsRef<Path>,
) -> Result<SetOutputs> {
    let output_dir = output_dir.as_ref().to_owned();
    let label = set.label.clone();
    let set = set.clone();
    let options = options.clone();

    // PDF generation is CPU-bound, spawn blocking
    let rendered = tokio::task::spawn_blocking(move || render_set(&set, &bank, &options)).await??;

    let outputs = SetOutputs {
        questions: output_dir.join(QUESTIONS_DIR).join(format!("set_{}.pdf", label)),
        answers: output_dir.join(ANSWERS_DIR).join(format!("set_{}_answers.pdf", label)),
        booklet: rendered
            .booklet
            .as_ref()
            .map(|_| output_dir.join(BOOKLETS_DIR).join(format!("set_{}_booklet.pdf", label))),
    };

    write_file(&outputs.questions, rendered.questions).await?;
    write_file(&outputs.answers, rendered.answers).await?;
    if let (Some(path), Some(bytes)) = (&outputs.booklet, rendered.booklet) {
        write_file(path, bytes).await?;
    }

    log::info!("Wrote set {} to {}", label, output_dir.display());
    Ok(outputs)
}
