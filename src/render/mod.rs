//! Pixel pipeline: gradient painting, blend math and the layer compositor.

pub(crate) mod advanced;
pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod gradient;
