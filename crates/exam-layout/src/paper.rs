//! Per-set pipeline: shuffle, estimate, flow, answer key, imposition.
//!
//! Sets only read the shared [`ExamBank`], so [`generate_sets`] runs each one
//! on its own blocking worker and joins them in ordinal order.

use crate::answer_key::{AnswerKeyEntry, derive_answer_key};
use crate::block::Block;
use crate::booklet::{SheetPlan, impose};
use crate::constants::{MAX_SETS, option_letter};
use crate::estimate::estimate;
use crate::flow::{LayoutPlan, SectionHeader, layout};
use crate::model::ExamBank;
use crate::options::GenerationOptions;
use crate::profile::{ColumnGeometry, SizeProfile};
use crate::shuffle::{PermutationMap, derive_seed, shuffle};
use crate::types::*;
use std::sync::Arc;

/// One independently shuffled instance of the exam.
#[derive(Debug, Clone)]
pub struct PaperSet {
    /// "A", "B", ...
    pub label: String,
    pub ordinal: usize,
    pub seed: u64,
    pub profile: SizeProfile,
    pub geometry: ColumnGeometry,
    pub headers: Vec<SectionHeader>,
    /// Question view blocks
    pub blocks: Vec<Block>,
    /// Answer view blocks (reasoning attached, heights re-estimated)
    pub answer_blocks: Vec<Block>,
    pub permutation: PermutationMap,
    pub layout: LayoutPlan,
    pub answer_layout: LayoutPlan,
    pub answer_key: Vec<AnswerKeyEntry>,
    /// Booklet imposition of the question view
    pub sheets: Option<SheetPlan>,
}

impl PaperSet {
    pub fn blocks_for(&self, view: PaperView) -> &[Block] {
        match view {
            PaperView::Questions => &self.blocks,
            PaperView::AnswerKey => &self.answer_blocks,
        }
    }

    pub fn layout_for(&self, view: PaperView) -> &LayoutPlan {
        match view {
            PaperView::Questions => &self.layout,
            PaperView::AnswerKey => &self.answer_layout,
        }
    }

    pub fn total_marks(&self, marks_per_question: u32) -> u32 {
        self.blocks.len() as u32 * marks_per_question
    }
}

/// Label of the set at `ordinal`.
pub fn set_label(ordinal: usize) -> String {
    option_letter(ordinal).to_string()
}

fn estimate_all(blocks: &mut [Block], profile: &SizeProfile) {
    for block in blocks {
        block.height = estimate(block, profile);
    }
}

fn flow_blocks(
    blocks: &[Block],
    headers: &[SectionHeader],
    profile: &SizeProfile,
    geometry: &ColumnGeometry,
    label: &str,
) -> LayoutPlan {
    let plan = layout(blocks, headers, profile, geometry);
    for violation in plan.check_invariants(profile, geometry) {
        log::warn!("Set {}: layout invariant violated: {}", label, violation);
    }
    plan
}

/// Build the set at `ordinal` from `bank`.
pub fn generate_set(bank: &ExamBank, ordinal: usize, options: &GenerationOptions) -> Result<PaperSet> {
    if ordinal >= MAX_SETS {
        return Err(ExamError::Config(format!(
            "Set ordinal {} exceeds the {} available labels",
            ordinal, MAX_SETS
        )));
    }

    let label = set_label(ordinal);
    let seed = derive_seed(options.base_seed, ordinal);
    log::debug!("Generating set {} with seed {:#018x}", label, seed);

    let (mut blocks, permutation) = shuffle(bank, seed, options.shuffle);
    permutation.verify(bank)?;

    let profile = options.size_profile();
    let geometry = options.column_geometry();
    let headers: Vec<SectionHeader> = bank
        .sections()
        .iter()
        .map(|s| SectionHeader::for_section(s, &profile))
        .collect();

    estimate_all(&mut blocks, &profile);
    let mut answer_blocks = blocks.clone();
    for block in &mut answer_blocks {
        block.reasoning = bank.record(block.id).and_then(|r| r.reasoning.clone());
    }
    estimate_all(&mut answer_blocks, &profile);

    let question_layout = flow_blocks(&blocks, &headers, &profile, &geometry, &label);
    let answer_layout = flow_blocks(&answer_blocks, &headers, &profile, &geometry, &label);

    let answer_key = derive_answer_key(bank, &permutation)?;

    let sheets = if options.booklet {
        Some(impose(question_layout.page_count())?)
    } else {
        None
    };

    log::info!(
        "Set {} ready: {} questions on {} pages",
        label,
        blocks.len(),
        question_layout.page_count()
    );

    Ok(PaperSet {
        label,
        ordinal,
        seed,
        profile,
        geometry,
        headers,
        blocks,
        answer_blocks,
        permutation,
        layout: question_layout,
        answer_layout,
        answer_key,
        sheets,
    })
}

/// Build every set requested by `options`, one blocking worker per set.
pub async fn generate_sets(bank: Arc<ExamBank>, options: &GenerationOptions) -> Result<Vec<PaperSet>> {
    options.validate()?;

    let handles: Vec<_> = (0..options.num_sets)
        .map(|ordinal| {
            let bank = Arc::clone(&bank);
            let options = options.clone();
            tokio::task::spawn_blocking(move || generate_set(&bank, ordinal, &options))
        })
        .collect();

    let mut sets = Vec::with_capacity(handles.len());
    for handle in handles {
        sets.push(handle.await??);
    }
    Ok(sets)
}
