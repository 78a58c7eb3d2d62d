pub mod math;
pub mod time;

// Geometry and time primitives with no dependencies; everything above builds on these.
pub use time::*;
