//! Infrastructure layer - storage and spreadsheet containers

pub mod storage;
pub mod tabular;
