//! Command handlers - extracted from main.rs for testability

pub mod compare;
pub mod input;
pub mod ocr;
pub mod score;

pub use compare::{execute_compare, load_config, SkipOcr};
pub use input::{is_allowed_image, read_image, ALLOWED_EXTENSIONS};
pub use ocr::execute_ocr;
pub use score::execute_score;
