#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use deepsig_core::model::fixtures;
use tempfile::TempDir;

pub use deepsig_core::model::fixtures::{
    OTHER_SEQUENCE as OTHER, SIGNAL_PEPTIDE_SEQUENCE as SIGNAL_PEPTIDE,
    TRANSMEMBRANE_SEQUENCE as TRANSMEMBRANE,
};

/// Writes a complete model root into a fresh temporary directory
pub fn model_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fixtures::write_model_dir(dir.path()).unwrap();
    dir
}

/// Writes `records` as FASTA into `dir`
pub fn write_fasta(dir: &Path, name: &str, records: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let text: String = records
        .iter()
        .map(|(id, seq)| format!(">{}\n{}\n", id, seq))
        .collect();
    fs::write(&path, text).unwrap();
    path
}

/// One record of each class
pub fn three_classes(dir: &Path) -> PathBuf {
    write_fasta(
        dir,
        "input.fasta",
        &[
            ("sp1 secreted protein", SIGNAL_PEPTIDE),
            ("tm1", TRANSMEMBRANE),
            ("other1", OTHER),
        ],
    )
}

/// DeepSig command with the model root set and the environment cleared
pub fn deepsig(models: &Path) -> Command {
    let mut cmd = Command::cargo_bin("deepsig").unwrap();
    cmd.env_remove("DEEPSIG_ROOT")
        .env_remove("RUST_LOG")
        .arg("-d")
        .arg(models);
    cmd
}

/// Runs a prediction and returns the output file contents
pub fn run_deepsig(
    models: &Path,
    input: &Path,
    output: &Path,
    organism: &str,
    format: &str,
    threads: usize,
) -> String {
    deepsig(models)
        .arg("-f")
        .arg(input)
        .arg("-o")
        .arg(output)
        .arg("-k")
        .arg(organism)
        .arg("-m")
        .arg(format)
        .arg("-t")
        .arg(threads.to_string())
        .arg("-q")
        .assert()
        .success();
    fs::read_to_string(output).unwrap()
}
