pub mod classifier;
pub mod clickable;
pub mod ocr;
pub mod pipeline;
pub mod screenshot;
pub mod traits;
pub mod types;
