pub mod error;
#[allow(clippy::module_inception)]
pub mod launcher;
pub mod registry;
pub mod toolchain;

pub use error::LaunchError;
pub use launcher::BuildOrchestrator;
pub use registry::{list_releases, Release};
pub use toolchain::{SystemToolchain, Toolchain};
