//! Page layout analysis: column splitting and document orientation.

pub mod column_splitter;
pub mod orientation;

pub use column_splitter::{split_columns, ColumnSplit};
pub use orientation::PageOrientation;
