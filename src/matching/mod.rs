pub mod encoder;
pub mod matcher;
pub mod resolve;
