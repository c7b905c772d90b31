pub mod decode;
pub mod pool;
