pub(crate) mod distortion;
