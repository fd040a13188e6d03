mod answer_key;
#[cfg(feature = "serde")]
mod bank;
mod block;
pub mod booklet;
pub mod constants;
mod estimate;
pub mod flow;
mod model;
mod options;
mod paper;
mod profile;
mod shuffle;
mod stats;
mod types;
mod wrap;

pub use answer_key::*;
#[cfg(feature = "serde")]
pub use bank::{load_bank, parse_bank};
pub use block::Block;
pub use booklet::{PageSlot, Sheet, SheetPlan, impose};
pub use estimate::*;
pub use flow::{LayoutPlan, OverflowWarning, PlacedItem, Placement, SectionHeader, layout};
pub use model::*;
pub use options::GenerationOptions;
pub use paper::{PaperSet, generate_set, generate_sets, set_label};
pub use profile::*;
pub use shuffle::*;
pub use stats::*;
pub use types::*;
pub use wrap::{line_capacity, text_width, wrap_text, wrapped_lines};
