pub mod markers;
pub mod picking;
pub mod satellites;

pub use markers::*;
pub use picking::*;
pub use satellites::*;
