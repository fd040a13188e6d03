use exam_layout::ExamError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Layout error: {0}")]
    Layout(#[from] ExamError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
