//! Failures of a single launch attempt.

use std::path::PathBuf;
use thiserror::Error;

use super::launcher::Stage;

/// Which external program a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Compiler,
    Runtime,
}

impl Tool {
    pub fn executable(self) -> &'static str {
        match self {
            Tool::Compiler => crate::config::COMPILER,
            Tool::Runtime => crate::config::RUNTIME,
        }
    }
}

/// Every variant ends the attempt; the user has to click again.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Folder not found:\n{}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Source file not found:\n{}", .0.display())]
    MissingSource(PathBuf),

    /// Carries every missing library, not just the first.
    #[error("Required jar files are missing:\n{}", display_paths(.0))]
    MissingDependency(Vec<PathBuf>),

    #[error("{} was not found in PATH. Install JDK and try again.", .0.executable())]
    ToolNotFound(Tool),

    #[error("Failed to start {}: {source}", .tool.executable())]
    Spawn {
        tool: Tool,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    CompileFailed(String),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl LaunchError {
    /// Title shown on the error dialog.
    pub fn title(&self) -> &'static str {
        match self {
            LaunchError::MissingDirectory(_) => "Missing Folder",
            LaunchError::MissingSource(_) => "Missing Source",
            LaunchError::MissingDependency(_) => "Missing Libraries",
            LaunchError::ToolNotFound(Tool::Compiler) => "JDK Not Found",
            LaunchError::ToolNotFound(Tool::Runtime) => "Java Not Found",
            LaunchError::Spawn { .. } => "Launch Failed",
            LaunchError::CompileFailed(_) => "Compilation Failed",
        }
    }

    /// The stage the attempt was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            LaunchError::MissingDirectory(_) => Stage::ValidatingDirectory,
            LaunchError::MissingSource(_) => Stage::ValidatingSource,
            LaunchError::MissingDependency(_) => Stage::ValidatingDependencies,
            LaunchError::ToolNotFound(tool) | LaunchError::Spawn { tool, .. } => match tool {
                Tool::Compiler => Stage::Compiling,
                Tool::Runtime => Stage::Running,
            },
            LaunchError::CompileFailed(_) => Stage::Compiling,
        }
    }
}
