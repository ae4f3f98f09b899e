//! Domain layer - business logic and services

pub mod clock;
pub mod priority;
pub mod repository;
pub mod service;
pub mod tabular;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use repository::{ObjectRepository, PriorityRepository, ReferenceRepository};
pub use service::Service;
pub use tabular::{Cell, CodecSet, Grid, TabularCodec};
