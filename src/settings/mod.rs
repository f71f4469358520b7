//! Render settings, their string-keyed mutation API and the configuration file format.

pub(crate) mod config_file;
pub(crate) mod model;
pub(crate) mod setting;
