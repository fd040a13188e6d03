//! Deterministic per-set shuffling of questions and options.
//!
//! Each paper set owns its generator, seeded from [`derive_seed`], so sets can
//! be produced on separate workers without sharing random state. The
//! canonical records are never reordered; the [`PermutationMap`] returned with
//! the blocks records how the displayed paper maps back onto them.

use crate::block::Block;
use crate::model::{ExamBank, QuestionId};
use crate::types::{ExamError, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use std::collections::HashSet;

/// Seed for the paper set at `ordinal`, derived from `base_seed`.
///
/// Distinct ordinals always give distinct seeds for the same base seed.
pub fn derive_seed(base_seed: u64, ordinal: usize) -> u64 {
    // splitmix64 finaliser over an odd-multiplier offset; every step is a bijection
    let mut z = base_seed ^ (ordinal as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Mapping for one displayed question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionMapping {
    pub canonical: QuestionId,
    /// Displayed option position -> canonical option index
    pub options: Vec<usize>,
}

/// Bijection between the displayed paper and the canonical bank for one set.
///
/// Dropped questions (sections drawing a subset of their pool) are absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PermutationMap {
    questions: Vec<QuestionMapping>,
}

impl PermutationMap {
    pub fn questions(&self) -> &[QuestionMapping] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Canonical identity of the question displayed at `position` (0-based).
    pub fn canonical_question(&self, position: usize) -> Option<QuestionId> {
        self.questions.get(position).map(|q| q.canonical)
    }

    /// Displayed position of the canonical question `id`, if it was emitted.
    pub fn displayed_position(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|q| q.canonical == id)
    }

    /// Canonical option index behind displayed option `option` of the
    /// question at `position`.
    pub fn canonical_option(&self, position: usize, option: usize) -> Option<usize> {
        self.questions.get(position)?.options.get(option).copied()
    }

    /// Displayed option position of canonical option `canonical` for the
    /// question at `position`.
    pub fn displayed_option(&self, position: usize, canonical: usize) -> Option<usize> {
        self.questions
            .get(position)?
            .options
            .iter()
            .position(|&c| c == canonical)
    }

    /// True when every emitted question and option keeps its canonical order.
    pub fn is_identity(&self) -> bool {
        let mut expected: Option<QuestionId> = None;
        for q in &self.questions {
            let in_order = match expected {
                Some(next) if next.section_index == q.canonical.section_index => q.canonical == next,
                Some(previous) => {
                    q.canonical.question_index == 0
                        && q.canonical.section_index > previous.section_index
                }
                None => q.canonical.question_index == 0,
            };
            if !in_order || q.options.iter().enumerate().any(|(i, &c)| i != c) {
                return false;
            }
            expected = Some(QuestionId::new(
                q.canonical.section_index,
                q.canonical.question_index + 1,
            ));
        }
        true
    }

    /// Check that the map is a bijection onto records of `bank`.
    pub fn verify(&self, bank: &ExamBank) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.questions.len());
        for (position, q) in self.questions.iter().enumerate() {
            let record = bank.record(q.canonical).ok_or_else(|| {
                ExamError::Config(format!(
                    "question {} maps to unknown record {:?}",
                    position + 1,
                    q.canonical
                ))
            })?;
            if !seen.insert(q.canonical) {
                return Err(ExamError::Config(format!(
                    "record {:?} is displayed twice",
                    q.canonical
                )));
            }
            let mut options = q.options.clone();
            options.sort_unstable();
            if options != (0..record.options.len()).collect::<Vec<_>>() {
                return Err(ExamError::Config(format!(
                    "option order of question {} is not a permutation",
                    position + 1
                )));
            }
        }
        Ok(())
    }

    /// Undo the shuffle: canonical identities with options in canonical
    /// order, sorted by canonical identity.
    pub fn restore(&self, blocks: &[Block]) -> Vec<(QuestionId, Vec<String>)> {
        let mut restored: Vec<(QuestionId, Vec<String>)> = self
            .questions
            .iter()
            .zip(blocks)
            .map(|(mapping, block)| {
                let mut options = vec![String::new(); mapping.options.len()];
                for (displayed, &canonical) in mapping.options.iter().enumerate() {
                    options[canonical] = block.options[displayed].clone();
                }
                (mapping.canonical, options)
            })
            .collect();
        restored.sort_by_key(|(id, _)| *id);
        restored
    }
}

/// Produce the displayed blocks for one paper set.
///
/// With `enabled` false the identity permutation is returned (sections that
/// draw fewer questions than their pool keep the leading ones). With `enabled`
/// true each section draws a uniform subset if needed, then questions and
/// each question's options are Fisher-Yates shuffled from one generator
/// seeded with `seed`.
pub fn shuffle(bank: &ExamBank, seed: u64, enabled: bool) -> (Vec<Block>, PermutationMap) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut blocks = Vec::with_capacity(bank.emitted_questions());
    let mut questions = Vec::with_capacity(bank.emitted_questions());

    for section in bank.sections() {
        let pool = section.pool_size();
        let required = section.required_questions;

        let mut chosen: Vec<usize> = if enabled && required < pool {
            let mut subset = index::sample(&mut rng, pool, required).into_vec();
            subset.sort_unstable();
            subset
        } else {
            (0..required).collect()
        };
        if enabled {
            chosen.shuffle(&mut rng);
        }

        let records = bank.section_records(section.index);
        for question_index in chosen {
            let record = &records[question_index];
            let mut order: Vec<usize> = (0..record.options.len()).collect();
            if enabled {
                order.shuffle(&mut rng);
            }
            blocks.push(Block::from_record(record, blocks.len() + 1, &order));
            questions.push(QuestionMapping {
                canonical: record.id,
                options: order,
            });
        }
    }

    log::debug!(
        "Shuffled {} questions (seed {:#018x}, shuffle {})",
        blocks.len(),
        seed,
        if enabled { "on" } else { "off" }
    );

    (blocks, PermutationMap { questions })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_seed_distinct_per_ordinal() {
        let seeds: HashSet<u64> = (0..64).map(|k| derive_seed(42, k)).collect();
        assert_eq!(seeds.len(), 64);
        assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
        assert_ne!(derive_seed(1, 0), derive_seed(2, 0));
    }

    #[test]
    fn test_identity_detection() {
        let map = PermutationMap {
            questions: vec![
                QuestionMapping {
                    canonical: QuestionId::new(0, 0),
                    options: vec![0, 1],
                },
                QuestionMapping {
                    canonical: QuestionId::new(1, 0),
                    options: vec![0, 1, 2],
                },
            ],
        };
        assert!(map.is_identity());

        let swapped = PermutationMap {
            questions: vec![QuestionMapping {
                canonical: QuestionId::new(0, 0),
                options: vec![1, 0],
            }],
        };
        assert!(!swapped.is_identity());
        assert_eq!(swapped.displayed_option(0, 0), Some(1));
        assert_eq!(swapped.canonical_option(0, 0), Some(1));
    }
}
