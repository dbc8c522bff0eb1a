pub(crate) mod solver;
