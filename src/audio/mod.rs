pub mod file;
pub mod sphere;

pub use file::{AudioError, AudioFile, AudioInfo};
pub use sphere::{SphereHeader, SphereValue};
