pub(crate) mod analyzer;
pub(crate) mod model;
pub(crate) mod provider;
