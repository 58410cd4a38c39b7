use log::{debug, info};
use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::config::{CLASSPATH_FLAG, COMPILER, RUNTIME};

/// Result of a finished compiler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl CompileOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// A process the launcher started and no longer owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandedOff {
    pub pid: u32,
}

impl From<Child> for HandedOff {
    // Dropping a `Child` neither waits on nor kills the process.
    fn from(child: Child) -> Self {
        HandedOff { pid: child.id() }
    }
}

/// The two external programs a launch needs.
pub trait Toolchain {
    /// Compiles `source` inside `dir` and blocks until the compiler exits.
    fn compile(&self, dir: &Path, classpath: &str, source: &str) -> io::Result<CompileOutput>;

    /// Starts `entry_point` inside `dir` without waiting for it.
    fn run(&self, dir: &Path, classpath: &str, entry_point: &str) -> io::Result<HandedOff>;
}

/// `javac` and `java` resolved through the search path.
pub struct SystemToolchain {
    compiler: String,
    runtime: String,
}

impl SystemToolchain {
    pub fn new() -> SystemToolchain {
        SystemToolchain::with_executables(COMPILER, RUNTIME)
    }

    pub fn with_executables(compiler: &str, runtime: &str) -> SystemToolchain {
        SystemToolchain {
            compiler: compiler.to_string(),
            runtime: runtime.to_string(),
        }
    }
}

impl Default for SystemToolchain {
    fn default() -> Self {
        SystemToolchain::new()
    }
}

impl Toolchain for SystemToolchain {
    fn compile(&self, dir: &Path, classpath: &str, source: &str) -> io::Result<CompileOutput> {
        let mut cmd = Command::new(&self.compiler);
        cmd.current_dir(dir);
        cmd.arg(CLASSPATH_FLAG);
        cmd.arg(classpath);
        cmd.arg(source);
        cmd.stdin(Stdio::null());

        debug!("Generated command: {:?}", cmd);

        let output = cmd.output()?;
        Ok(CompileOutput {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run(&self, dir: &Path, classpath: &str, entry_point: &str) -> io::Result<HandedOff> {
        let mut cmd = Command::new(&self.runtime);
        cmd.current_dir(dir);
        cmd.arg(CLASSPATH_FLAG);
        cmd.arg(classpath);
        cmd.arg(entry_point);

        debug!("Generated command: {:?}", cmd);

        let process = cmd.spawn()?;
        info!("{} launched with PID {}", entry_point, process.id());
        Ok(HandedOff::from(process))
    }
}
