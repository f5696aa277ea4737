use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_doc(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("doc.md");
    fs::write(&path, "# Title\n\n```mermaid\ngraph TD\n```\n\n$$\nx\n$$\n").unwrap();
    path
}

#[test]
fn inspect_defaults_to_treeviz() {
    let dir = tempdir().unwrap();
    let path = write_doc(dir.path());

    let mut cmd = cargo_bin_cmd!("marksmith");
    cmd.current_dir(dir.path()).arg("inspect").arg(path.as_os_str());
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("⧉ Document (3 nodes)"));
}

#[test]
fn inspect_metadata_json() {
    let dir = tempdir().unwrap();
    let path = write_doc(dir.path());

    let mut cmd = cargo_bin_cmd!("marksmith");
    cmd.current_dir(dir.path())
        .arg("inspect")
        .arg(path.as_os_str())
        .arg("metadata-json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["diagram_blocks"][0]["path"][0], 1);
    assert_eq!(value["math_expressions"][0]["kind"], "block");
    assert_eq!(value["render_steps"][2], "annotate");
}

#[test]
fn inspect_rejects_unknown_transform() {
    let dir = tempdir().unwrap();
    let path = write_doc(dir.path());

    let mut cmd = cargo_bin_cmd!("marksmith");
    cmd.current_dir(dir.path())
        .arg("inspect")
        .arg(path.as_os_str())
        .arg("token-json");
    cmd.assert().failure();
}

#[test]
fn list_languages_includes_bindings() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("marksmith.toml"),
        "[render.file_types]\ntpl = \"html\"\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("marksmith");
    cmd.current_dir(dir.path()).arg("--list-languages");
    cmd.assert().success().stdout(
        predicate::str::contains("Highlighting languages:")
            .and(predicate::str::contains("Rust"))
            .and(predicate::str::is_match(r"tpl\s+html").unwrap()),
    );
}
