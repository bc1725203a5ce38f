use abpack_test_data::TestFile;
use assert_cmd::Command;
use std::path::Path;

fn fill_structure_dir(dir: &Path) {
    TestFile::antibody_01().write_to(dir.join("1mlb.pdb")).unwrap();
    TestFile::antibody_02().write_to(dir.join("2fb4.pdb")).unwrap();
    TestFile::antibody_03().write_to(dir.join("1mfa.pdb")).unwrap();
    TestFile::antibody_04().write_to(dir.join("3hfm.pdb")).unwrap();
}

#[cfg(unix)]
fn write_stub_tool(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    // called as `<tool> -p <code> -q <path>`, prints `<code>: <angle>`
    let tool = dir.join("stub-angle-tool");
    std::fs::write(&tool, "#!/bin/sh\necho \"$2: -44.5\"\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
    tool
}

#[test]
fn test_cli_extract() {
    let dir = tempfile::tempdir().unwrap();
    fill_structure_dir(dir.path());
    let out = dir.path().join("residues.csv");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .arg("--loops");
    cmd.assert().success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("code,position,residue"));
    assert!(text.contains("1mlb,L38,Q"));
    assert!(text.contains("1mlb,L30A,N"));
    // 1mfa's pyroglutamate is outside the alphabet
    assert!(!text.contains("1mfa,L46"));
}

#[test]
fn test_cli_extract_with_position_file() {
    let dir = tempfile::tempdir().unwrap();
    TestFile::antibody_01().write_to(dir.path().join("1mlb.pdb")).unwrap();
    let (positions, _tmp) = TestFile::positions_01().create_temp().unwrap();
    let out = dir.path().join("residues.csv");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .arg("--positions")
        .arg(&positions);
    cmd.assert().success();

    let text = std::fs::read_to_string(&out).unwrap();
    // 13 interface rows, no loops requested
    assert_eq!(text.lines().count(), 14);
    assert!(!text.contains("L24"));
}

#[test]
fn test_cli_encode_and_nonred() {
    let dir = tempfile::tempdir().unwrap();
    fill_structure_dir(dir.path());
    let residues = dir.path().join("residues.csv");
    let (angles, _tmp) = TestFile::angles_01().create_temp().unwrap();
    let train = dir.path().join("train.csv");
    let reduced = dir.path().join("train_nr.csv");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&residues)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("encode")
        .arg("--residues")
        .arg(&residues)
        .arg("--angles")
        .arg(&angles)
        .arg("--out")
        .arg(&train)
        .arg("--loops");
    cmd.assert().success();

    let text = std::fs::read_to_string(&train).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("code,L38a,L38b,L38c,L38d,"));
    assert!(header.ends_with("L1_length,H2_length,H3_length,angle"));
    // 1mfa has holes, zzzz has no structure; 3 labelled rows survive
    assert_eq!(text.lines().count(), 4);
    assert!(!text.contains("1mfa"));
    assert!(!text.contains("zzzz"));

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("nonred")
        .arg("--input")
        .arg(&train)
        .arg("--out")
        .arg(&reduced);
    cmd.assert().success();

    // 2fb4 shares 1mlb's interface; the earlier code wins
    let text = std::fs::read_to_string(&reduced).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("1mlb"));
    assert!(!text.contains("2fb4"));
    assert!(text.contains("3hfm"));
}

#[test]
fn test_cli_train_predict_plot() {
    let dir = tempfile::tempdir().unwrap();
    fill_structure_dir(dir.path());
    let residues = dir.path().join("residues.csv");
    let (angles, _tmp) = TestFile::angles_01().create_temp().unwrap();
    let train = dir.path().join("train.csv");
    let model = dir.path().join("model.safetensors");
    let predictions = dir.path().join("predictions.csv");
    let plots = dir.path().join("plots");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&residues)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("encode")
        .arg("--residues")
        .arg(&residues)
        .arg("--angles")
        .arg(&angles)
        .arg("--out")
        .arg(&train)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("train")
        .arg("--input")
        .arg(&train)
        .arg("--model")
        .arg(&model)
        .arg("--epochs")
        .arg("150");
    cmd.assert().success();
    assert!(model.exists());
    assert!(model.with_extension("json").exists());

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("predict")
        .arg("--input")
        .arg(&train)
        .arg("--model")
        .arg(&model)
        .arg("--out")
        .arg(&predictions);
    cmd.assert().success();

    let text = std::fs::read_to_string(&predictions).unwrap();
    assert!(text.starts_with("code,angle,predicted,error"));
    assert_eq!(text.lines().count(), 4);

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("plot")
        .arg("--input")
        .arg(&predictions)
        .arg("--out-dir")
        .arg(&plots);
    cmd.assert().success();
    assert!(plots.join("predicted_vs_actual.svg").exists());
    assert!(plots.join("error_distribution.svg").exists());
}

#[test]
fn test_cli_predict_seq() {
    let dir = tempfile::tempdir().unwrap();
    fill_structure_dir(dir.path());
    let residues = dir.path().join("residues.csv");
    let (angles, _tmp) = TestFile::angles_01().create_temp().unwrap();
    let train = dir.path().join("train.csv");
    let model = dir.path().join("model.safetensors");
    let seq = dir.path().join("1mlb.seq");
    TestFile::seq_01().write_to(&seq).unwrap();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&residues)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("encode")
        .arg("--residues")
        .arg(&residues)
        .arg("--angles")
        .arg(&angles)
        .arg("--out")
        .arg(&train)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("train")
        .arg("--input")
        .arg(&train)
        .arg("--model")
        .arg(&model)
        .arg("--epochs")
        .arg("150");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("predict-seq")
        .arg("--seq")
        .arg(&seq)
        .arg("--model")
        .arg(&model);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.starts_with("1mlb "));
}

#[test]
fn test_cli_predict_seq_incomplete_sequence_fails() {
    let dir = tempfile::tempdir().unwrap();
    fill_structure_dir(dir.path());
    let residues = dir.path().join("residues.csv");
    let (angles, _tmp) = TestFile::angles_01().create_temp().unwrap();
    let train = dir.path().join("train.csv");
    let model = dir.path().join("model.safetensors");
    // antibody_03's listing: no H91, L46 outside the alphabet
    let seq = dir.path().join("1mfa.seq");
    TestFile::seq_03().write_to(&seq).unwrap();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("extract")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&residues)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("encode")
        .arg("--residues")
        .arg(&residues)
        .arg("--angles")
        .arg(&angles)
        .arg("--out")
        .arg(&train)
        .arg("--loops");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("train")
        .arg("--input")
        .arg(&train)
        .arg("--model")
        .arg(&model)
        .arg("--epochs")
        .arg("150");
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("predict-seq")
        .arg("--seq")
        .arg(&seq)
        .arg("--model")
        .arg(&model);
    cmd.assert().failure();
}

#[cfg(unix)]
#[test]
fn test_cli_angles_with_stub_tool() {
    let dir = tempfile::tempdir().unwrap();
    TestFile::antibody_01().write_to(dir.path().join("1mlb.pdb")).unwrap();
    TestFile::antibody_02().write_to(dir.path().join("2fb4.pdb")).unwrap();
    let tool_dir = tempfile::tempdir().unwrap();
    let tool = write_stub_tool(tool_dir.path());
    let out = dir.path().join("angles.csv");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("angles")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .arg("--tool")
        .arg(&tool);
    cmd.assert().success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("code,angle"));
    assert!(text.contains("1mlb,-44.5"));
    assert!(text.contains("2fb4,-44.5"));
}

#[test]
fn test_cli_angles_missing_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    TestFile::antibody_01().write_to(dir.path().join("1mlb.pdb")).unwrap();
    let out = dir.path().join("angles.csv");

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("angles")
        .arg("--dir")
        .arg(dir.path())
        .arg("--out")
        .arg(&out)
        .arg("--tool")
        .arg("no-such-angle-tool");
    cmd.assert().failure();
}

#[cfg(unix)]
#[test]
fn test_cli_run_end_to_end() {
    let train_dir = tempfile::tempdir().unwrap();
    TestFile::antibody_01().write_to(train_dir.path().join("1mlb.pdb")).unwrap();
    TestFile::antibody_02().write_to(train_dir.path().join("2fb4.pdb")).unwrap();
    TestFile::antibody_04().write_to(train_dir.path().join("3hfm.pdb")).unwrap();
    let test_dir = tempfile::tempdir().unwrap();
    TestFile::antibody_01().write_to(test_dir.path().join("5abc.pdb")).unwrap();

    let tool_dir = tempfile::tempdir().unwrap();
    let tool = write_stub_tool(tool_dir.path());
    let out_dir = tempfile::tempdir().unwrap().into_path();

    let mut cmd = Command::cargo_bin("abpack").unwrap();
    cmd.arg("run")
        .arg("--train-dir")
        .arg(train_dir.path())
        .arg("--test-dir")
        .arg(test_dir.path())
        .arg("--out-dir")
        .arg(&out_dir)
        .arg("--loops")
        .arg("--tool")
        .arg(&tool)
        .arg("--epochs")
        .arg("120");
    cmd.assert().success();

    for file in [
        "train_residues.csv",
        "train_angles.csv",
        "train.csv",
        "model.safetensors",
        "model.json",
        "test_residues.csv",
        "test_angles.csv",
        "test.csv",
        "predictions.csv",
        "predicted_vs_actual.svg",
        "error_distribution.svg",
    ] {
        assert!(out_dir.join(file).exists(), "missing {file}");
    }

    // interface-redundant 2fb4 is gone from the reduced training table
    let text = std::fs::read_to_string(out_dir.join("train.csv")).unwrap();
    assert_eq!(text.lines().count(), 3);

    let predictions = std::fs::read_to_string(out_dir.join("predictions.csv")).unwrap();
    assert!(predictions.contains("5abc"));
}
