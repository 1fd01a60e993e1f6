pub mod analysis;
pub mod resume;
