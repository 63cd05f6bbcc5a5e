//! Shared test utilities for satchel-bundler tests

#![allow(dead_code)]
#![allow(clippy::disallowed_methods)]

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use satchel_bundler::test_utils::TestRuntime;
use satchel_bundler::{BuildOptions, BuildResult};

/// Build options rooted at `root`, reading through a test runtime.
pub fn test_build_options(root: &Path, entry: &str) -> BuildOptions {
    BuildOptions::new(entry)
        .root(root)
        .runtime(Arc::new(TestRuntime::new(root.to_path_buf())))
}

pub async fn build_project(root: &Path, entry: &str) -> BuildResult {
    test_build_options(root, entry)
        .build()
        .await
        .expect("build should succeed")
}

/// Whether a `node` binary is available to execute bundles.
///
/// Execution tests return early (and pass) when it is not.
pub fn node_available() -> bool {
    let available = Command::new("node")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("skipping: node is not installed");
    }
    available
}

/// Output of running a bundle with node.
pub struct NodeRun {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl NodeRun {
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Write `bundle` to `dir/bundle.js` and execute it with node.
pub fn run_with_node(dir: &Path, bundle: &str) -> NodeRun {
    let file = dir.join("bundle.js");
    std::fs::write(&file, bundle).expect("write bundle");
    let output = Command::new("node")
        .arg(&file)
        .output()
        .expect("run node");
    NodeRun {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}
