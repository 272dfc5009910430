//! Geographic projection layer.

mod flat_earth;

pub use flat_earth::FlatEarthTransformer;
