pub mod prompt;
pub mod timestamp;
