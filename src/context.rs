use log::{info, warn};
use std::env;
use std::path::{Path, PathBuf};

use crate::launcher::{list_releases, BuildOrchestrator, Release, SystemToolchain, Toolchain};

/// Everything the window needs. Created in `main`, dropped with the window.
pub struct AppContext {
    pub project_root: PathBuf,
    pub releases: Vec<Release>,
    toolchain: Box<dyn Toolchain>,
}

impl AppContext {
    pub fn new(project_root: PathBuf, toolchain: Box<dyn Toolchain>) -> AppContext {
        AppContext {
            project_root,
            releases: list_releases(),
            toolchain,
        }
    }

    pub fn discover() -> AppContext {
        let releases = list_releases();
        let from_exe = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .and_then(|dir| find_project_root(&dir, &releases));

        let project_root = match from_exe {
            Some(root) => root,
            None => env::current_dir().unwrap_or_else(|e| {
                warn!("Could not read the working directory: {}", e);
                PathBuf::from(".")
            }),
        };
        info!("Project root: {}", project_root.display());

        AppContext::new(project_root, Box::new(SystemToolchain::new()))
    }

    pub fn orchestrator(&self) -> BuildOrchestrator<'_> {
        BuildOrchestrator::new(&self.project_root, self.toolchain.as_ref())
    }

    pub fn release_dir(&self, release: &Release) -> PathBuf {
        self.project_root.join(release.dir_name)
    }
}

/// Nearest ancestor of `start` (inclusive) holding at least one release directory.
pub fn find_project_root(start: &Path, releases: &[Release]) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| releases.iter().any(|r| dir.join(r.dir_name).is_dir()))
        .map(Path::to_path_buf)
}
