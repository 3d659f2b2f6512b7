mod common;

use insta::assert_snapshot;
use serde_json::Value;
use tempfile::TempDir;

use crate::common::{model_dir, run_deepsig, three_classes};

// Golden GFF3 for one sequence of each class
#[test]
fn gff3_output_snapshot() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.gff3");

    let text = run_deepsig(models.path(), &input, &output, "euk", "gff3", 2);
    assert_snapshot!(text.replace('\t', " | "), @r"
    ##gff-version 3
    sp1 | DeepSig | Signal peptide | 1 | 22 | 0.96 | . | . | .
    sp1 | DeepSig | Chain | 23 | 50 | . | . | . | evidence=ECO:0000256
    tm1 | DeepSig | Transmembrane | 1 | 40 | 1.00 | . | . | .
    other1 | DeepSig | Other | 1 | 27 | 0.88 | . | . | .
    ");
}

// JSON carries the same predictions as GFF3
#[test]
fn json_output_matches_gff3() {
    let models = model_dir();
    let work = TempDir::new().unwrap();
    let input = three_classes(work.path());
    let output = work.path().join("out.json");

    let text = run_deepsig(models.path(), &input, &output, "gramn", "json", 1);
    let value: Value = serde_json::from_str(&text).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    assert_eq!(entries[0]["accession"], "sp1");
    assert_eq!(entries[0]["prediction"], "Signal peptide");
    assert_eq!(entries[0]["reliability"], 0.96);
    assert_eq!(entries[0]["cleavage_site"], 22);
    assert_eq!(entries[0]["sequence"]["length"], 50);
    assert_eq!(entries[0]["features"][0]["type"], "SIGNAL");
    assert_eq!(entries[0]["features"][1]["type"], "CHAIN");
    assert_eq!(entries[0]["features"][1]["begin"], 23);

    assert_eq!(entries[1]["prediction"], "Transmembrane");
    assert_eq!(entries[1]["reliability"], 1.0);
    assert!(entries[1]["cleavage_site"].is_null());

    assert_eq!(entries[2]["prediction"], "Other");
    assert_eq!(entries[2]["reliability"], 0.88);
    assert!(entries[2]["features"].as_array().unwrap().is_empty());
}

// Help lists every option of the command-line surface
#[test]
fn cli_help_lists_options() {
    let output = common::deepsig(std::path::Path::new("models"))
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    for option in [
        "--fasta",
        "--outf",
        "--organism",
        "--outfmt",
        "--output-processed",
        "--output-noss",
        "--threads",
        "--model-dir",
        "--quiet",
        "DEEPSIG_ROOT",
    ] {
        assert!(text.contains(option), "help is missing {}", option);
    }
}
