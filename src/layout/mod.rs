//! Drawing and layout on top of a [`Surface`](crate::surface::Surface):
//! cells, gradients, multiline text, page chrome and paginated tables.

pub mod cell;
pub mod chrome;
pub mod gradient;
pub mod table;
pub mod text;

pub use cell::{Alignment, CellStyle, draw_cell};
pub use chrome::{ContinuedSection, PageChrome, draw_heading};
pub use gradient::{band_colors, draw_gradient};
pub use table::{Column, HeaderStyle, PageContinuation, Table, TableFrame, TablePaginator, TableRun};
pub use text::{MultilineStyle, draw_multiline, truncate_to_width};
