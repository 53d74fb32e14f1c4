mod compare;
mod flatten;

pub use compare::run_compare;
pub use flatten::run_flatten;
