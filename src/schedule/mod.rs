pub mod retention;
pub mod scheduler;
