pub mod aggregator;
pub mod renderer;
