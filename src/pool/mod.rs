// Types representing the structure of an examination question pool

mod types;

// Re-export all public symbols
pub use types::*;
