mod booklet;
mod canvas;
mod io;
mod paper;
mod types;

pub use booklet::render_booklet;
pub use io::*;
pub use paper::{BLANK_PAGE_TEXT, render_paper};
pub use types::*;
