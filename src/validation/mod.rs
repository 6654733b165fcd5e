pub mod metadata_composer;
pub mod sbom_locator;
pub mod snapshot_gate;

pub use metadata_composer::MetadataComposer;
pub use sbom_locator::{SbomFile, SbomLocator};
pub use snapshot_gate::SnapshotGate;
