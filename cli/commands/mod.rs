pub mod completion;
pub mod export;
pub mod plan;
