pub mod block;
pub mod fonts;
