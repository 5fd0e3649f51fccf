/*!
 * End-to-end tests for the files-to-xml binary
 */

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn files_to_xml_cmd() -> Command {
    let mut cmd = Command::cargo_bin("files-to-xml").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn create_project(temp: &TempDir) {
    let root = temp.path();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join(".cache")).unwrap();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();

    fs::write(root.join("README.md"), "# project\n").unwrap();
    fs::write(root.join("src/main.rs"), "fn main() { let _ = \"]]>\"; }\n").unwrap();
    fs::write(root.join("logo.png"), [0x89u8, 0x50]).unwrap();
    fs::write(root.join(".cache/state.json"), "{}").unwrap();
    fs::write(root.join("node_modules/dep/index.js"), "x").unwrap();
}

#[test]
fn writes_xml_to_explicit_output() {
    let project = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    create_project(&project);
    let out = out_dir.path().join("dump.xml");

    files_to_xml_cmd()
        .arg(project.path())
        .arg("--out-file")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote"));

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.starts_with("<SourceCodeTree>"));
    assert!(xml.contains("<File path=\"README.md\">"));
    assert!(xml.contains("<File path=\"src/main.rs\">"));
    assert!(xml.contains("]]]]><![CDATA[>"));
    assert!(!xml.contains("logo.png"));
    assert!(!xml.contains("state.json"));
    assert!(!xml.contains("index.js"));
}

#[test]
fn defaults_to_current_directory() {
    let project = TempDir::new().unwrap();
    create_project(&project);
    let dir_name = project
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();

    files_to_xml_cmd()
        .current_dir(project.path())
        .arg("--quiet")
        .assert()
        .success();

    let out = project.path().join(format!("files.{}.xml", dir_name));
    let xml = fs::read_to_string(out).unwrap();
    assert!(xml.contains("README.md"));

    // A second run must not pick up its own previous output
    files_to_xml_cmd()
        .current_dir(project.path())
        .arg("--quiet")
        .assert()
        .success();
    let out = project.path().join(format!("files.{}.xml", dir_name));
    let xml = fs::read_to_string(out).unwrap();
    assert!(!xml.contains(&format!("files.{}.xml", dir_name)));
}

#[test]
fn parent_relative_source_is_resolved() {
    let temp = TempDir::new().unwrap();
    let sub = temp.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("notes.md"), "notes\n").unwrap();

    for _ in 0..2 {
        files_to_xml_cmd()
            .current_dir(&sub)
            .args(["../sub", "--quiet"])
            .assert()
            .success();
    }

    let xml = fs::read_to_string(sub.join("files.sub.xml")).unwrap();
    assert!(!xml.contains("sub/../sub"));
    assert!(xml.contains("<File path=\"notes.md\">"));
    assert!(!xml.contains("<File path=\"files.sub.xml\">"));
}

#[test]
fn raw_output_is_single_line() {
    let project = TempDir::new().unwrap();
    create_project(&project);
    let out = project.path().join("raw.xml");

    files_to_xml_cmd()
        .arg(project.path())
        .args(["--out-file", out.to_str().unwrap(), "--no-format", "--quiet"])
        .assert()
        .success();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.starts_with("<SourceCodeTree><Directory path="));
    assert!(xml.ends_with("</Directory></SourceCodeTree>"));
}

#[test]
fn nested_shape_emits_directory_elements() {
    let project = TempDir::new().unwrap();
    create_project(&project);
    let out = project.path().join("nested.xml");

    files_to_xml_cmd()
        .arg(project.path())
        .args(["--out-file", out.to_str().unwrap(), "--shape", "nested", "--quiet"])
        .assert()
        .success();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<Directory path=\"src\">"));
}

#[test]
fn missing_source_directory_fails() {
    let temp = TempDir::new().unwrap();

    files_to_xml_cmd()
        .arg(temp.path().join("does-not-exist"))
        .arg("--out-file")
        .arg(temp.path().join("out.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!temp.path().join("out.xml").exists());
}

#[test]
fn generates_shell_completions() {
    files_to_xml_cmd()
        .args(["--generate", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("files-to-xml"));
}
