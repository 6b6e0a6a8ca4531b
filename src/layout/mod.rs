pub(crate) mod dimensions;
pub(crate) mod metrics;
pub(crate) mod scale;
pub(crate) mod solver;
