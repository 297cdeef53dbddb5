pub(crate) mod circular;
pub(crate) mod geometry;
