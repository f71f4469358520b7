//! Text overlay state: typewriter reveal, resolved style and color transitions.

pub(crate) mod engine;
pub(crate) mod style;
pub(crate) mod typewriter;
