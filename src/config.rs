//! Fixed values describing the OreMiner release layout and the Java toolchain.

pub const WINDOW_TITLE: &str = "OreMiner 1.4 Launcher";
pub const WINDOW_SIZE: [f32; 2] = [360.0, 230.0];
pub const HEADING: &str = "Choose a Build";
pub const SUBTITLE: &str = "Compile and run from this launcher";

/// (display label, directory relative to the project root), in display order.
pub const RELEASES: &[(&str, &str)] = &[
    ("Snapshot 1.4.1", "Beta Snapshot"),
    ("Release 1.4", "Full Release"),
    ("Release Candidate", "Release Canidate"),
];

pub const SOURCE_FILE: &str = "oreminer.java";
pub const ENTRY_POINT: &str = "oreminer";

/// Libraries that must sit next to the source file, in classpath order.
pub const REQUIRED_LIBRARIES: &[&str] = &["json-simple-1.1.1.jar", "gson-2.10.1.jar"];

pub const CURRENT_DIR_MARKER: &str = ".";

#[cfg(windows)]
pub const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
pub const CLASSPATH_SEPARATOR: &str = ":";

pub const COMPILER: &str = "javac";
pub const RUNTIME: &str = "java";
pub const CLASSPATH_FLAG: &str = "-cp";

pub const EMPTY_DIAGNOSTIC: &str = "Compilation failed with no stderr output.";
