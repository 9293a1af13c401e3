use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HAP_A: &str = "ACGTTGCAACGTTGCAACGTTGCAACGTTGCAACGTTGCA\
                     GGGGCCCCGGGGCCCCGGGGCCCCGGGGCCCCGGGGCCCC\
                     TTAACCGGTTAACCGGTTAACCGGTTAACCGGTTAACCGG";
const HAP_B: &str = "ACGTTGCAACGTTGCAACGTTGCAACGTTGCAACGTTGCA\
                     TTAACCGGTTAACCGGTTAACCGGTTAACCGGTTAACCGG";

fn svfind(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_svfind"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run svfind")
}

fn setup_pair() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("hapA.fa"), format!(">a\n{}\n", HAP_A)).unwrap();
    fs::write(dir.path().join("hapB.fa"), format!(">b\n{}\n", HAP_B)).unwrap();
    fs::write(
        dir.path().join("pair.1aln"),
        "1 3 aln 1 0\n< 7 hapA.fa 1\n< 7 hapB.fa 2\nA 0 0 40 0 0 40\nA 0 80 120 0 40 80\n",
    )
    .unwrap();
    dir
}

#[test]
fn writes_insertions_for_both_sets() {
    let dir = setup_pair();
    let output = svfind(dir.path(), &["-a", "a.1sv", "-b", "b.1sv", "pair.1aln"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let a = fs::read_to_string(dir.path().join("a.1sv")).unwrap();
    assert!(a.contains("< 7 hapA.fa 1\n< 7 hapB.fa 2\n"));
    assert!(a.contains("V 0 40 80\nB 0 40 40\n"));
    assert!(a.contains("S 40 ggggccccggggccccggggccccggggccccggggcccc\n"));
    assert!(a.contains("I 15 0:40-80_0:40-40\n"));

    let b = fs::read_to_string(dir.path().join("b.1sv")).unwrap();
    assert!(b.contains("< 7 hapB.fa 1\n< 7 hapA.fa 2\n"));
    assert!(!b.contains("\nV "));

    let log = String::from_utf8_lossy(&output.stderr);
    assert!(log.contains("read 2 overlaps"));
    assert!(log.contains("wrote 1 insertions in hapA.fa to a.1sv"));
}

#[test]
fn b_output_needs_a_second_sequence_set() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("self.fa"), format!(">a\n{}\n", HAP_A)).unwrap();
    fs::write(
        dir.path().join("self.1aln"),
        "1 3 aln 1 0\n< 7 self.fa 1\nA 0 0 10 0 50 60\n",
    )
    .unwrap();

    let output = svfind(dir.path(), &["-b", "b.1sv", "self.1aln"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("-b not possible: input self.1aln has no b source"));
}

#[test]
fn zero_overhang_is_a_usage_error() {
    let dir = setup_pair();
    let output = svfind(dir.path(), &["-w", "0", "-a", "a.1sv", "pair.1aln"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("max_overhang 0 must be a positive integer"));
}

#[test]
fn missing_alignment_argument_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let output = svfind(dir.path(), &["-a", "a.1sv"]);
    assert_eq!(output.status.code(), Some(1));
}
