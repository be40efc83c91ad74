// Domain layer - Core business logic

pub mod model;
pub mod segments;
pub mod timeline;
