use log::{debug, info, warn};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::error::{LaunchError, Tool};
use super::registry::Release;
use super::toolchain::Toolchain;
use crate::config::{
    CLASSPATH_SEPARATOR, CURRENT_DIR_MARKER, EMPTY_DIAGNOSTIC, ENTRY_POINT, REQUIRED_LIBRARIES,
    SOURCE_FILE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ValidatingDirectory,
    ValidatingSource,
    ValidatingDependencies,
    Compiling,
    Running,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A successful launch. The window should close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launched {
    pub release_dir: PathBuf,
    pub pid: u32,
}

/// `.` followed by every required library, joined with the platform separator.
pub fn build_classpath() -> String {
    std::iter::once(CURRENT_DIR_MARKER)
        .chain(REQUIRED_LIBRARIES.iter().copied())
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR)
}

/// One button click worth of work.
struct BuildAttempt {
    release_dir: PathBuf,
    stage: Stage,
}

impl BuildAttempt {
    fn new(release_dir: PathBuf) -> BuildAttempt {
        BuildAttempt {
            release_dir,
            stage: Stage::Idle,
        }
    }

    fn enter(&mut self, stage: Stage) {
        debug!("{}: {} -> {}", self.release_dir.display(), self.stage, stage);
        self.stage = stage;
    }

    fn check_directory(&mut self) -> Result<(), LaunchError> {
        self.enter(Stage::ValidatingDirectory);
        if self.release_dir.is_dir() {
            Ok(())
        } else {
            Err(LaunchError::MissingDirectory(self.release_dir.clone()))
        }
    }

    fn check_source(&mut self) -> Result<(), LaunchError> {
        self.enter(Stage::ValidatingSource);
        let source = self.release_dir.join(SOURCE_FILE);
        if source.exists() {
            Ok(())
        } else {
            Err(LaunchError::MissingSource(source))
        }
    }

    fn check_dependencies(&mut self) -> Result<(), LaunchError> {
        self.enter(Stage::ValidatingDependencies);
        let missing: Vec<PathBuf> = REQUIRED_LIBRARIES
            .iter()
            .map(|lib| self.release_dir.join(lib))
            .filter(|path| !path.exists())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LaunchError::MissingDependency(missing))
        }
    }

    fn compile(&mut self, toolchain: &dyn Toolchain, classpath: &str) -> Result<(), LaunchError> {
        self.enter(Stage::Compiling);
        info!("Compiling {} in {}...", SOURCE_FILE, self.release_dir.display());
        let output = toolchain
            .compile(&self.release_dir, classpath, SOURCE_FILE)
            .map_err(|e| spawn_error(Tool::Compiler, e))?;
        if output.success() {
            return Ok(());
        }
        warn!("{} exited with code {:?}", Tool::Compiler.executable(), output.code);
        Err(LaunchError::CompileFailed(diagnostic_text(&output.stderr)))
    }

    fn run(&mut self, toolchain: &dyn Toolchain, classpath: &str) -> Result<u32, LaunchError> {
        self.enter(Stage::Running);
        let handed_off = toolchain
            .run(&self.release_dir, classpath, ENTRY_POINT)
            .map_err(|e| spawn_error(Tool::Runtime, e))?;
        Ok(handed_off.pid)
    }
}

fn spawn_error(tool: Tool, source: io::Error) -> LaunchError {
    if source.kind() == io::ErrorKind::NotFound {
        LaunchError::ToolNotFound(tool)
    } else {
        LaunchError::Spawn { tool, source }
    }
}

fn diagnostic_text(stderr: &str) -> String {
    let stripped = strip_ansi_escapes::strip(stderr.as_bytes());
    let stripped = String::from_utf8_lossy(&stripped);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        EMPTY_DIAGNOSTIC.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validates, compiles and starts releases that live under one project root.
pub struct BuildOrchestrator<'a> {
    project_root: &'a Path,
    toolchain: &'a dyn Toolchain,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(project_root: &'a Path, toolchain: &'a dyn Toolchain) -> BuildOrchestrator<'a> {
        BuildOrchestrator {
            project_root,
            toolchain,
        }
    }

    /// Runs every step in order and stops at the first failure.
    pub fn launch(&self, release: &Release) -> Result<Launched, LaunchError> {
        info!("Launching {}...", release.label);

        let mut attempt = BuildAttempt::new(self.project_root.join(release.dir_name));
        let result = self.drive(&mut attempt);
        match &result {
            Ok(launched) => {
                attempt.enter(Stage::Closed);
                info!("{} handed off as PID {}", release.label, launched.pid);
            }
            Err(e) => warn!("{} failed while {}: {}", release.label, e.stage(), e),
        }
        result
    }

    fn drive(&self, attempt: &mut BuildAttempt) -> Result<Launched, LaunchError> {
        attempt.check_directory()?;
        attempt.check_source()?;
        attempt.check_dependencies()?;

        let classpath = build_classpath();
        attempt.compile(self.toolchain, &classpath)?;
        let pid = attempt.run(self.toolchain, &classpath)?;

        Ok(Launched {
            release_dir: attempt.release_dir.clone(),
            pid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::toolchain::{CompileOutput, HandedOff};
    use std::cell::RefCell;
    use std::fs;

    const RELEASE: Release = Release {
        label: "Release 1.4",
        dir_name: "Full Release",
    };

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Compile { dir: PathBuf, classpath: String, source: String },
        Run { dir: PathBuf, classpath: String, entry_point: String },
    }

    /// Records invocations and replays canned results.
    struct FakeToolchain {
        compile_result: fn() -> io::Result<CompileOutput>,
        run_result: fn() -> io::Result<HandedOff>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeToolchain {
        fn new() -> FakeToolchain {
            FakeToolchain {
                compile_result: || Ok(CompileOutput { code: Some(0), stderr: String::new() }),
                run_result: || Ok(HandedOff { pid: 4242 }),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl Toolchain for FakeToolchain {
        fn compile(&self, dir: &Path, classpath: &str, source: &str) -> io::Result<CompileOutput> {
            self.calls.borrow_mut().push(Call::Compile {
                dir: dir.to_path_buf(),
                classpath: classpath.to_string(),
                source: source.to_string(),
            });
            (self.compile_result)()
        }

        fn run(&self, dir: &Path, classpath: &str, entry_point: &str) -> io::Result<HandedOff> {
            self.calls.borrow_mut().push(Call::Run {
                dir: dir.to_path_buf(),
                classpath: classpath.to_string(),
                entry_point: entry_point.to_string(),
            });
            (self.run_result)()
        }
    }

    fn project(files: &[&str]) -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        let release_dir = root.path().join(RELEASE.dir_name);
        fs::create_dir(&release_dir).unwrap();
        for file in files {
            fs::write(release_dir.join(file), b"").unwrap();
        }
        root
    }

    fn complete_project() -> tempfile::TempDir {
        project(&[SOURCE_FILE, "json-simple-1.1.1.jar", "gson-2.10.1.jar"])
    }

    #[test]
    fn classpath_is_stable() {
        let sep = CLASSPATH_SEPARATOR;
        let expected = format!(".{sep}json-simple-1.1.1.jar{sep}gson-2.10.1.jar");
        assert_eq!(build_classpath(), expected);
        assert_eq!(build_classpath(), build_classpath());
    }

    #[test]
    fn missing_directory_spawns_nothing() {
        let root = tempfile::tempdir().unwrap();
        let toolchain = FakeToolchain::new();
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert!(matches!(&err, LaunchError::MissingDirectory(p) if p == &root.path().join("Full Release")));
        assert_eq!(err.stage(), Stage::ValidatingDirectory);
        assert!(toolchain.calls().is_empty());
    }

    #[test]
    fn missing_source_skips_compiler() {
        let root = project(&["json-simple-1.1.1.jar", "gson-2.10.1.jar"]);
        let toolchain = FakeToolchain::new();
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert!(matches!(err, LaunchError::MissingSource(p) if p.ends_with("Full Release/oreminer.java")));
        assert!(toolchain.calls().is_empty());
    }

    #[test]
    fn missing_dependencies_are_all_named() {
        let root = project(&[SOURCE_FILE]);
        let toolchain = FakeToolchain::new();
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        let release_dir = root.path().join("Full Release");
        match err {
            LaunchError::MissingDependency(missing) => assert_eq!(
                missing,
                vec![
                    release_dir.join("json-simple-1.1.1.jar"),
                    release_dir.join("gson-2.10.1.jar"),
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(toolchain.calls().is_empty());
    }

    #[test]
    fn single_missing_dependency() {
        let root = project(&[SOURCE_FILE, "json-simple-1.1.1.jar"]);
        let toolchain = FakeToolchain::new();
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        match err {
            LaunchError::MissingDependency(missing) => {
                assert_eq!(missing.len(), 1);
                assert!(missing[0].ends_with("gson-2.10.1.jar"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn compile_failure_carries_diagnostics_and_skips_runtime() {
        let root = complete_project();
        let mut toolchain = FakeToolchain::new();
        toolchain.compile_result = || {
            Ok(CompileOutput {
                code: Some(1),
                stderr: "\u{1b}[31moreminer.java:3: error: ';' expected\u{1b}[0m\n1 error\n".to_string(),
            })
        };
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        match &err {
            LaunchError::CompileFailed(text) => {
                assert_eq!(text, "oreminer.java:3: error: ';' expected\n1 error")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.title(), "Compilation Failed");
        assert_eq!(toolchain.calls().len(), 1);
        assert!(matches!(toolchain.calls()[0], Call::Compile { .. }));
    }

    #[test]
    fn silent_compile_failure_gets_placeholder() {
        let root = complete_project();
        let mut toolchain = FakeToolchain::new();
        toolchain.compile_result = || Ok(CompileOutput { code: Some(2), stderr: "  \n".to_string() });
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert_eq!(err.to_string(), EMPTY_DIAGNOSTIC);
    }

    #[test]
    fn missing_compiler() {
        let root = complete_project();
        let mut toolchain = FakeToolchain::new();
        toolchain.compile_result = || Err(io::Error::from(io::ErrorKind::NotFound));
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert!(matches!(err, LaunchError::ToolNotFound(Tool::Compiler)));
        assert_eq!(toolchain.calls().len(), 1);
    }

    #[test]
    fn missing_runtime() {
        let root = complete_project();
        let mut toolchain = FakeToolchain::new();
        toolchain.run_result = || Err(io::Error::from(io::ErrorKind::NotFound));
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert!(matches!(err, LaunchError::ToolNotFound(Tool::Runtime)));
        assert_eq!(err.stage(), Stage::Running);
    }

    #[test]
    fn other_spawn_errors_are_kept() {
        let root = complete_project();
        let mut toolchain = FakeToolchain::new();
        toolchain.run_result = || Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap_err();

        assert!(matches!(err, LaunchError::Spawn { tool: Tool::Runtime, .. }));
        assert_eq!(err.title(), "Launch Failed");
    }

    #[test]
    fn compiles_then_runs_once() {
        let root = complete_project();
        let toolchain = FakeToolchain::new();
        let launched = BuildOrchestrator::new(root.path(), &toolchain)
            .launch(&RELEASE)
            .unwrap();

        let release_dir = root.path().join("Full Release");
        assert_eq!(
            launched,
            Launched {
                release_dir: release_dir.clone(),
                pid: 4242
            }
        );
        assert_eq!(
            toolchain.calls(),
            vec![
                Call::Compile {
                    dir: release_dir.clone(),
                    classpath: build_classpath(),
                    source: "oreminer.java".to_string(),
                },
                Call::Run {
                    dir: release_dir,
                    classpath: build_classpath(),
                    entry_point: "oreminer".to_string(),
                },
            ]
        );
    }
}
