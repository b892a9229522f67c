pub(crate) mod atomic_write;
pub mod clock;
pub mod core;
pub mod error;
pub(crate) mod math;
pub mod ring;
