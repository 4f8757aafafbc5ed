//! Document input: format detection and plain text extraction
//! for resumes and job descriptions

pub mod format;
pub mod text_extractor;
pub mod manager;

pub use format::DocumentFormat;
pub use manager::InputManager;
