pub(crate) mod render_core;
pub(crate) mod scheduler;
pub(crate) mod target;
