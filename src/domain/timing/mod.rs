//! Time budget value objects

mod duration;

pub use duration::Duration;
