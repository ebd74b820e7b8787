use assert_cmd::prelude::*;
use std::path::Path;
use std::process::Command;

#[allow(dead_code)]
pub fn bin_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("themeloc-cli").expect("themeloc-cli built");
    cmd.current_dir(dir);
    cmd
}

#[allow(dead_code)]
pub fn write_locales(dir: &Path, files: &[(&str, &str)]) {
    let locales = dir.join("locales");
    std::fs::create_dir_all(&locales).unwrap();
    for (name, body) in files {
        std::fs::write(locales.join(name), body).unwrap();
    }
}

/// stdout carries log-free JSON on its last non-empty line.
#[allow(dead_code)]
pub fn last_json_line(stdout: &[u8]) -> String {
    String::from_utf8_lossy(stdout)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .expect("stdout has output")
        .to_string()
}
