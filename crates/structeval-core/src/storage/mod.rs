//! Persistence of labeled signed matrices.
//!
//! Matrices are exchanged as delimited tables: a header row of variable names
//! (top-left cell empty or an index label), then one row per variable whose
//! first field is the row label.

pub mod csv_matrix;

pub use csv_matrix::{
    read_labeled_matrix, read_labeled_matrix_from, write_labeled_matrix, write_labeled_matrix_to,
};
