pub mod templated;
