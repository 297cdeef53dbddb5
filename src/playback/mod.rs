pub(crate) mod pulse;
pub(crate) mod scheduler;
