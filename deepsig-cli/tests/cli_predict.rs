mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

use crate::common::{
    OTHER, SIGNAL_PEPTIDE, TRANSMEMBRANE, deepsig, model_dir, run_deepsig, three_classes,
    write_fasta,
};

/// (header, sequence) pairs of a FASTA file
fn read_fasta(path: &Path) -> Vec<(String, String)> {
    fs::read_to_string(path)
        .unwrap()
        .split('>')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let mut lines = chunk.lines();
            let header = lines.next().unwrap_or_default().to_string();
            let sequence = lines.map(str::trim).collect();
            (header, sequence)
        })
        .collect()
}

fn workspaces_left(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("deepsig-"))
        .count()
}

#[test]
fn predicts_each_class_in_input_order() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.gff3");

    let text = run_deepsig(models.path(), &input, &output, "euk", "gff3", 1);
    let classes: Vec<_> = text
        .lines()
        .skip(1)
        .map(|line| line.split('\t').nth(2).unwrap().to_string())
        .collect();
    assert_eq!(
        classes,
        ["Signal peptide", "Chain", "Transmembrane", "Other"]
    );
}

#[test]
fn pool_size_does_not_change_output() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let records: Vec<(String, &str)> = (0..30)
        .map(|i| {
            let sequence = [SIGNAL_PEPTIDE, TRANSMEMBRANE, OTHER][i % 3];
            (format!("seq{}", i), sequence)
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = records.iter().map(|(id, s)| (id.as_str(), *s)).collect();
    let input = write_fasta(work.path(), "many.fasta", &borrowed);

    for format in ["gff3", "json"] {
        let single = run_deepsig(
            models.path(),
            &input,
            &work.path().join(format!("single.{}", format)),
            "gramp",
            format,
            1,
        );
        let parallel = run_deepsig(
            models.path(),
            &input,
            &work.path().join(format!("parallel.{}", format)),
            "gramp",
            format,
            4,
        );
        assert_eq!(single, parallel, "{} output depends on pool size", format);
    }
}

#[test]
fn writes_processed_and_noss_sequences() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let processed = work.path().join("processed.fasta");
    let noss = work.path().join("noss.fasta");

    deepsig(models.path())
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(work.path().join("out.gff3"))
        .arg("-k")
        .arg("euk")
        .arg("--output-processed")
        .arg(&processed)
        .arg("--output-noss")
        .arg(&noss)
        .assert()
        .success();

    let processed = read_fasta(&processed);
    assert_eq!(processed.len(), 3);
    assert_eq!(processed[0].0, "sp1 secreted protein mature");
    assert_eq!(processed[0].1, &SIGNAL_PEPTIDE[22..]);
    assert_eq!(processed[1], ("tm1".to_string(), TRANSMEMBRANE.to_string()));
    assert_eq!(processed[2], ("other1".to_string(), OTHER.to_string()));

    let noss = read_fasta(&noss);
    let ids: Vec<_> = noss.iter().map(|(header, _)| header.as_str()).collect();
    assert_eq!(ids, ["tm1", "other1"]);

    assert_eq!(workspaces_left(work.path()), 0);
}

#[test]
fn model_root_from_environment() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.gff3");

    Command::cargo_bin("deepsig")
        .unwrap()
        .env("DEEPSIG_ROOT", models.path())
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-k")
        .arg("euk")
        .assert()
        .success();
    assert!(fs::read_to_string(&output).unwrap().starts_with("##gff-version 3"));
}

#[test]
fn fails_without_model_root() {
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());

    Command::cargo_bin("deepsig")
        .unwrap()
        .env_remove("DEEPSIG_ROOT")
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(work.path().join("out.gff3"))
        .arg("-k")
        .arg("euk")
        .assert()
        .failure();
}

#[test]
fn missing_model_directory_keeps_workspace() {
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.gff3");

    let assert = deepsig(&work.path().join("no-models"))
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-k")
        .arg("euk")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Invalid model directory"), "stderr: {}", stderr);

    assert!(!output.exists());
    assert_eq!(workspaces_left(work.path()), 1);
}

#[test]
fn unwritable_side_output_leaves_no_results() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.gff3");

    deepsig(models.path())
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-k")
        .arg("euk")
        .arg("--output-noss")
        .arg(work.path().join("missing-dir").join("noss.fasta"))
        .assert()
        .failure();

    assert!(!output.exists());
    assert_eq!(workspaces_left(work.path()), 1);
}

#[test]
fn malformed_artifact_is_reported() {
    let models = model_dir();
    fs::write(models.path().join("crf").join("gramn.json"), "[]").unwrap();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());

    let assert = deepsig(models.path())
        .arg("-f")
        .arg(&input)
        .arg("-o")
        .arg(work.path().join("out.json"))
        .arg("-k")
        .arg("gramn")
        .arg("-m")
        .arg("json")
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("gramn.json"), "stderr: {}", stderr);

    // Other organisms are unaffected.
    run_deepsig(
        models.path(),
        &input,
        &work.path().join("out.gff3"),
        "euk",
        "gff3",
        1,
    );
}

#[test]
fn rejects_unknown_organism_and_format() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());

    for (organism, format) in [("plant", "gff3"), ("euk", "gbk")] {
        deepsig(models.path())
            .arg("-f")
            .arg(&input)
            .arg("-o")
            .arg(work.path().join("out"))
            .arg("-k")
            .arg(organism)
            .arg("-m")
            .arg(format)
            .assert()
            .failure();
    }
}

#[test]
fn unknown_residues_do_not_crash() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = write_fasta(
        work.path(),
        "odd.fasta",
        &[("unknown", &"X".repeat(150)), ("mixed", "mkbzj*ouxLLLLLLLLLLDDD"), ("one", "L")],
    );
    let output = work.path().join("out.gff3");

    let text = run_deepsig(models.path(), &input, &output, "euk", "gff3", 2);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[1], "unknown\tDeepSig\tOther\t1\t150\t0.46\t.\t.\t.");
    assert!(lines.iter().any(|line| line.starts_with("one\tDeepSig\tSignal peptide\t1\t1\t")));
}

#[test]
fn prints_version() {
    let assert = Command::cargo_bin("deepsig")
        .unwrap()
        .arg("--version")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
