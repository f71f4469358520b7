//! Shared primitives: pixel surfaces, colors, errors, clocks and numeric helpers.

pub(crate) mod clock;
pub(crate) mod color;
pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
