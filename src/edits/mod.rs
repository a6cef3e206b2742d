pub mod interpret;
pub mod outcome;

pub use interpret::{interpret_outcomes, EditVerdict};
pub use outcome::{EditBatch, EditKind, EditOutcome};
