pub mod scan;
pub mod tags;

pub use scan::{scan, Occurrence};
pub use tags::{TagKind, TagStyle};
