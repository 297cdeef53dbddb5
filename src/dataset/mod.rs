pub(crate) mod lenient;
pub(crate) mod load;
pub(crate) mod model;
