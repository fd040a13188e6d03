use crate::constants::*;
use crate::profile::{ColumnGeometry, SizeProfile};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Everything that shapes a generation run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationOptions {
    // Title block
    pub title: String,
    pub subtitle: String,
    pub exam_title: String,

    // Sets
    pub num_sets: usize,
    pub base_seed: u64,
    pub shuffle: bool,

    // Page layout
    pub density: Density,
    pub layout: LayoutMode,
    pub paper_size: PaperSize,
    pub show_student_info: bool,

    // Scoring
    pub marks_per_question: u32,

    // Output
    pub booklet: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            title: "Examination".to_string(),
            subtitle: "Question Paper".to_string(),
            exam_title: "Examination".to_string(),
            num_sets: 1,
            base_seed: 0,
            shuffle: true,
            density: Density::Medium,
            layout: LayoutMode::TwoColumn,
            paper_size: PaperSize::A4,
            show_student_info: true,
            marks_per_question: 1,
            booklet: true,
        }
    }
}

impl GenerationOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ExamError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExamError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        check_text("Title", &self.title, MAX_TITLE_CHARS)?;
        check_text("Subtitle", &self.subtitle, MAX_SUBTITLE_CHARS)?;
        check_text("Exam title", &self.exam_title, MAX_EXAM_TITLE_CHARS)?;

        if self.num_sets == 0 || self.num_sets > MAX_SETS {
            return Err(ExamError::Config(format!(
                "Number of sets must be between 1 and {}, got {}",
                MAX_SETS, self.num_sets
            )));
        }

        if self.marks_per_question == 0 {
            return Err(ExamError::Config(
                "Marks per question must be at least 1".to_string(),
            ));
        }

        if let PaperSize::Custom {
            width_mm,
            height_mm,
        } = self.paper_size
        {
            // Two columns plus margins need some room to work with
            if width_mm < 100.0 || height_mm < 150.0 {
                return Err(ExamError::Config(format!(
                    "Custom paper {}x{}mm is too small",
                    width_mm, height_mm
                )));
            }
        }

        Ok(())
    }

    /// Size profile for the configured density, paper and layout
    pub fn size_profile(&self) -> SizeProfile {
        SizeProfile::for_layout(self.density, self.paper_size, self.layout.columns())
    }

    /// Column geometry for the configured layout
    pub fn column_geometry(&self) -> ColumnGeometry {
        ColumnGeometry::new(self.layout.columns(), self.show_student_info)
    }
}

fn check_text(label: &str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ExamError::Config(format!("{} cannot be empty", label)));
    }
    let len = value.chars().count();
    if len > max {
        return Err(ExamError::Config(format!(
            "{} must be at most {} characters, got {}",
            label, max, len
        )));
    }
    Ok(())
}
