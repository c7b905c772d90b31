pub mod poster;
pub mod surface;
