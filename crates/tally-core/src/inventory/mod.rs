pub mod kind;
pub mod scan;

pub use kind::{ArtifactKind, Language};
pub use scan::{ArtifactFile, CodeDirectoryInventory, scan};
