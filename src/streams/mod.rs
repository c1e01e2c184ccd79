pub mod generators;
mod stream;

pub use generators::{SeaGenerator, StaggerGenerator};
pub use stream::Stream;
