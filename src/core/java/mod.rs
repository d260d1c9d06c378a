pub mod compatibility;
pub mod registry;

pub use compatibility::CompatibilityTable;
pub use registry::{JavaInstallation, JavaRegistry};
