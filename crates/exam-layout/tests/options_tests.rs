use exam_layout::*;

#[test]
fn test_default_options_are_valid() {
    assert!(GenerationOptions::default().validate().is_ok());
}

#[test]
fn test_validation_set_count() {
    let mut options = GenerationOptions::default();

    options.num_sets = 0;
    assert!(options.validate().is_err());

    options.num_sets = 26;
    assert!(options.validate().is_ok());

    options.num_sets = 27;
    match options.validate() {
        Err(ExamError::Config(msg)) => assert!(msg.contains("between 1 and 26")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_text_limits() {
    let mut options = GenerationOptions {
        title: "T".repeat(60),
        ..Default::default()
    };
    assert!(options.validate().is_ok());

    options.title = "T".repeat(61);
    assert!(options.validate().is_err());

    options.title = "Final Exam".into();
    options.subtitle = "   ".into();
    match options.validate() {
        Err(ExamError::Config(msg)) => assert!(msg.contains("Subtitle")),
        _ => panic!("Expected Config error"),
    }
}

#[test]
fn test_validation_marks_and_custom_paper() {
    let mut options = GenerationOptions {
        marks_per_question: 0,
        ..Default::default()
    };
    assert!(options.validate().is_err());

    options.marks_per_question = 2;
    options.paper_size = PaperSize::Custom {
        width_mm: 90.0,
        height_mm: 200.0,
    };
    assert!(options.validate().is_err());

    options.paper_size = PaperSize::Custom {
        width_mm: 180.0,
        height_mm: 250.0,
    };
    assert!(options.validate().is_ok());
}

#[test]
fn test_layout_mode_drives_geometry() {
    let options = GenerationOptions {
        layout: LayoutMode::OneColumn,
        show_student_info: false,
        ..Default::default()
    };
    let geometry = options.column_geometry();
    assert_eq!(geometry.columns_per_page, 1);
    assert!(geometry.first_page_reserved < ColumnGeometry::default().first_page_reserved);

    let one = options.size_profile();
    let two = GenerationOptions::default().size_profile();
    assert!(one.column_width > two.column_width);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = GenerationOptions {
        title: "Midterm".into(),
        num_sets: 4,
        base_seed: 99,
        shuffle: false,
        density: Density::Large,
        layout: LayoutMode::OneColumn,
        paper_size: PaperSize::Letter,
        marks_per_question: 2,
        booklet: false,
        ..Default::default()
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    // Save
    options.save(path).await.unwrap();

    // Load
    let loaded = GenerationOptions::load(path).await.unwrap();
    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_partial_options_file_uses_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(temp_file.path(), r#"{"num_sets": 3}"#)
        .await
        .unwrap();

    let loaded = GenerationOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.num_sets, 3);
    assert_eq!(loaded.title, GenerationOptions::default().title);
    assert!(loaded.booklet);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_bank_from_file() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    tokio::fs::write(
        temp_file.path(),
        r#"{"sections": [{"name": "Geography", "questions": [
            {"question_text": "Largest ocean?", "choices": ["Atlantic", "Pacific"], "answer": "Pacific",
             "reasoning": "By area."}
        ]}]}"#,
    )
    .await
    .unwrap();

    let sections = load_bank(temp_file.path()).await.unwrap();
    let bank = build(&sections).unwrap();
    assert_eq!(bank.records()[0].correct, 1);
    assert_eq!(bank.records()[0].reasoning.as_deref(), Some("By area."));

    let stats = analyze_bank(&bank);
    assert_eq!(stats.total_questions, 1);
    assert_eq!(stats.kinds.get(&QuestionKind::Plain), Some(&1));
}
