pub mod loc_counter;

pub use loc_counter::{classify_line, count_lines, count_range, LineKind, LocCounter};
