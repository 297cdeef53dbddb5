pub(crate) mod speech;
