#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use sha2::{Digest, Sha256};

/// Runs the oligobind CLI with given arguments and returns its stdout
pub fn run_oligobind(args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("oligobind")?;
    cmd.args(args);

    let output = cmd.assert().success().get_output().stdout.clone();
    Ok(String::from_utf8(output)?)
}

/// Runs `relations` into `output` with the given worker count
pub fn run_relations(
    length: usize,
    output: &Path,
    threads: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("oligobind")?;
    cmd.arg("relations")
        .arg("-l")
        .arg(length.to_string())
        .arg("-o")
        .arg(output)
        .arg("-j")
        .arg(threads.to_string())
        .arg("-q");

    cmd.assert().success();
    Ok(())
}

/// Hex SHA-256 of a file's bytes
pub fn sha256_file(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
