use thiserror::Error;

/// A bracket whose matching partner does not exist.
///
/// Scanning past the end of the program (an open `[`) and past the start
/// (a stray `]`) are the same failure; `bracket` tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unmatched '{bracket}' at offset {offset}")]
pub struct SyntaxError {
    /// Byte offset of the bracket in the program source.
    pub offset: usize,
    pub bracket: char,
}

/// Everything a run can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("cursor moved off the tape to cell {cell} (tape length {len}) at offset {offset}")]
    TapeBounds {
        /// The cell the cursor tried to reach; `-1` when moving left of cell 0.
        cell: isize,
        len: usize,
        offset: usize,
    },

    #[error("step limit of {limit} reached")]
    StepLimit { limit: usize },
}
