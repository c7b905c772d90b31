pub mod resolve;
pub mod token;
pub mod wrap;
