pub mod aggregate;
pub mod join;
