//! API layer - native and REST interfaces

pub mod native;
pub mod rest;
