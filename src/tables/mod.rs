pub(crate) mod acts;
pub(crate) mod bechdel;
pub(crate) mod corpus;
pub(crate) mod pairs;
pub(crate) mod sort;
