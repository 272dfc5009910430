//! Foundation layer: plain data types and bearing math.

pub mod math;
pub mod types;
