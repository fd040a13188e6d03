use exam_layout::booklet::verify;
use exam_layout::*;

fn block(section: usize, number: usize, height: f32) -> Block {
    Block {
        id: QuestionId::new(section, number - 1),
        number,
        kind: QuestionKind::Plain,
        fragments: vec![Fragment::Text(format!("Question {}", number))],
        options: vec!["yes".into(), "no".into()],
        reasoning: None,
        height,
    }
}

fn text_block(text: &str) -> Block {
    Block {
        fragments: vec![Fragment::Text(text.to_string())],
        ..block(0, 1, 0.0)
    }
}

#[test]
fn test_estimate_grows_with_text() {
    let profile = SizeProfile::default();
    let short = estimate(&text_block("Short question?"), &profile);
    let long = estimate(&text_block(&"A much longer question text. ".repeat(20)), &profile);
    assert!(short > 0.0);
    assert!(long > short);
}

#[test]
fn test_estimate_grows_with_fragments() {
    let profile = SizeProfile::default();
    let plain = text_block("Consider the following statements.");
    let mut with_statements = plain.clone();
    with_statements.fragments.push(Fragment::Statements(vec![
        "1. The first statement.".into(),
        "2. The second statement.".into(),
    ]));
    assert!(estimate(&with_statements, &profile) > estimate(&plain, &profile));
}

/// Grow one part of a question word by word; the estimate must never shrink.
fn assert_monotonic(grow: impl Fn(&mut Block, &str)) {
    let profile = SizeProfile::default();
    let mut block = Block {
        fragments: vec![
            Fragment::Text("Consider the following.".into()),
            Fragment::Statement("The statement.".into()),
            Fragment::Statements(vec!["1. One".into(), "2. Two".into()]),
            Fragment::List(vec!["first".into()]),
            Fragment::Sequence(vec!["earlier".into(), "later".into()]),
            Fragment::MatchTable {
                left: vec!["a".into(), "b".into()],
                right: vec!["1".into(), "2".into()],
            },
            Fragment::Paragraph("A passage.".into()),
        ],
        options: vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into()],
        ..block(0, 1, 0.0)
    };

    let mut previous = estimate(&block, &profile);
    for step in 0..40 {
        let word = if step % 7 == 6 { "extraordinarilylongword" } else { "word" };
        grow(&mut block, word);
        let current = estimate(&block, &profile);
        assert!(current >= previous, "estimate fell from {} to {} at step {}", previous, current, step);
        previous = current;
    }
}

fn append(text: &mut String, word: &str) {
    text.push(' ');
    text.push_str(word);
}

#[test]
fn test_estimate_monotonic_for_every_fragment_kind() {
    for target in 0..7 {
        assert_monotonic(|block, word| match &mut block.fragments[target] {
            Fragment::Text(s) | Fragment::Statement(s) | Fragment::Paragraph(s) => append(s, word),
            Fragment::Statements(items) | Fragment::List(items) | Fragment::Sequence(items) => {
                append(&mut items[0], word)
            }
            Fragment::MatchTable { right, .. } => append(&mut right[1], word),
        });
    }
}

#[test]
fn test_estimate_monotonic_when_items_are_added() {
    assert_monotonic(|block, word| {
        if let Fragment::Statements(items) = &mut block.fragments[2] {
            items.push(word.to_string());
        }
        if let Fragment::MatchTable { left, .. } = &mut block.fragments[5] {
            left.push(word.to_string());
        }
    });
}

#[test]
fn test_estimate_monotonic_for_option_text() {
    for option in 0..5 {
        assert_monotonic(|block, word| append(&mut block.options[option], word));
    }
}

#[test]
fn test_larger_density_needs_more_room() {
    let block = text_block(&"Words that wrap across several lines. ".repeat(6));
    let small = SizeProfile::for_layout(Density::Small, PaperSize::A4, 2);
    let large = SizeProfile::for_layout(Density::Large, PaperSize::A4, 2);
    assert!(estimate(&block, &large) > estimate(&block, &small));
}

#[test]
fn test_oversized_block_gets_fresh_column_and_warning() {
    let profile = SizeProfile::default();
    let geometry = ColumnGeometry {
        columns_per_page: 2,
        first_page_reserved: 0.0,
    };
    let usable = profile.usable_column_height;
    let blocks = vec![
        block(0, 1, 40.0),
        block(0, 2, usable + 50.0),
        block(0, 3, 40.0),
    ];

    let plan = layout(&blocks, &[], &profile, &geometry);

    let oversized = plan.question(1).unwrap();
    assert_eq!((oversized.page, oversized.column), (1, 1));
    assert_eq!(oversized.offset, 0.0);
    assert_eq!(plan.warnings.len(), 1);
    assert_eq!(plan.warnings[0].number, 2);

    // The next question starts on a fresh page
    let next = plan.question(2).unwrap();
    assert_eq!((next.page, next.column), (2, 0));
    assert!(plan.check_invariants(&profile, &geometry).is_empty());
}

#[test]
fn test_first_page_block_waits_for_taller_column() {
    let profile = SizeProfile::default();
    let geometry = ColumnGeometry::two_column(true);
    let height = profile.usable_column_height - 5.0;

    let plan = layout(&[block(0, 1, height)], &[], &profile, &geometry);

    let placed = plan.question(0).unwrap();
    assert_eq!(placed.page, 2);
    assert!(plan.warnings.is_empty());
}

#[test]
fn test_every_column_used_before_new_page() {
    let profile = SizeProfile::default();
    let geometry = ColumnGeometry::two_column(false);
    let blocks: Vec<Block> = (1..=40).map(|n| block(0, n, 35.0)).collect();

    let plan = layout(&blocks, &[], &profile, &geometry);
    assert!(plan.check_invariants(&profile, &geometry).is_empty());

    for page in 1..plan.page_count() {
        assert!(plan.placements_on(page, 0).count() > 0);
        assert!(plan.placements_on(page, 1).count() > 0);
    }
}

#[test]
fn test_booklet_pads_five_pages_to_eight() {
    let plan = impose(5).unwrap();
    assert_eq!(plan.padded_count, 8);
    assert_eq!(plan.sheets.len(), 2);
    assert_eq!(plan.blank_pages(), 3);
    assert_eq!(plan.side_count(), 4);

    let mut positions: Vec<usize> = plan
        .sheets
        .iter()
        .flat_map(|s| s.slots())
        .map(PageSlot::position)
        .collect();
    positions.sort();
    assert_eq!(positions, (1..=8).collect::<Vec<_>>());

    let blanks: Vec<usize> = plan
        .sheets
        .iter()
        .flat_map(|s| s.slots())
        .filter(|slot| slot.is_blank())
        .map(PageSlot::position)
        .collect();
    assert_eq!(blanks.len(), 3);
    assert!(blanks.iter().all(|&p| p > 5));
}

#[test]
fn test_booklet_outer_sheet_pairs_first_and_last() {
    let plan = impose(12).unwrap();
    let outer = &plan.sheets[0];
    assert_eq!(outer.front_left, PageSlot::Page(12));
    assert_eq!(outer.front_right, PageSlot::Page(1));
    assert_eq!(outer.back_left, PageSlot::Page(2));
    assert_eq!(outer.back_right, PageSlot::Page(11));
    verify(&plan).unwrap();
}

#[test]
fn test_booklet_rejects_zero_pages() {
    match impose(0) {
        Err(ExamError::NoPages) => {}
        _ => panic!("Expected NoPages error"),
    }
}
