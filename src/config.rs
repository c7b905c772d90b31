pub mod model;
pub mod overrides;
