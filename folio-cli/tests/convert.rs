use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn converts_to_html_file() {
    let dir = tempdir().unwrap();
    write(
        dir.path(),
        "guide.md",
        "# Title\n\nHello.\n\n```python\nprint(1)\n```\n",
    );

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["guide.md", "--to", "html", "--theme", "technical", "-o", "guide.html"]);
    cmd.assert().success();

    let html = fs::read_to_string(dir.path().join("guide.html")).unwrap();
    assert!(html.contains("theme-technical"));
    assert!(html.contains("<h1 id=\"title\">Title</h1>"));
    assert!(html.contains("data-language=\"python\""));
}

#[test]
fn html_goes_to_stdout_without_output() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["convert", "note.md", "--to", "html"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("theme-professional"));
}

#[test]
fn unknown_theme_is_a_template_error() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["note.md", "--theme", "neon", "--to", "html", "-o", "out.html"]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: template: Unknown theme 'neon'"));
    assert!(!dir.path().join("out.html").exists());
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["absent.md", "--to", "html"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: io:"));
}

#[test]
fn extra_params_set_branding() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "---\nclient: Acme Corp\n---\n# Note\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path()).args([
        "note.md",
        "--to",
        "html",
        "--extra-client-name",
        "Globex",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Prepared for Globex"));
}

#[test]
fn unknown_extra_param_is_rejected() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["note.md", "--to", "html", "--extra-font", "serif"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: config: unknown parameter --extra-font"));
}

#[test]
fn multiple_inputs_merge_in_order() {
    let dir = tempdir().unwrap();
    write(dir.path(), "b.md", "# Second\n");
    write(dir.path(), "a.md", "# First\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["b.md", "a.md", "--to", "html"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let html = String::from_utf8(output).unwrap();

    let second = html.find("<h1 id=\"second\">").unwrap();
    let first = html.find("<h1 id=\"first\">").unwrap();
    assert!(second < first);
    assert_eq!(html.matches("class=\"document-break\"").count(), 1);
}

#[test]
fn config_file_selects_theme() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");
    write(
        dir.path(),
        "custom.toml",
        "[render]\ntheme = \"executive\"\nformat = \"html\"\n\n[branding]\nclient_name = \"Initech\"\n",
    );

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["note.md", "--config", "custom.toml"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("theme-executive"))
        .stdout(predicate::str::contains("Initech"));
}

#[test]
fn local_folio_toml_is_picked_up() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");
    write(dir.path(), "folio.toml", "[render]\ntheme = \"technical\"\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path()).args(["note.md", "--to", "html"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("theme-technical"));
}

#[test]
fn json_report_for_html_output() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n\n## Part\n\n[gone](#nowhere)\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .args(["note.md", "--to", "html", "-o", "note.html", "--json"]);
    let output = cmd
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: link to missing anchor '#nowhere'"))
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["toc"][0]["anchor"], "note");
    assert_eq!(report["toc"][0]["children"][0]["anchor"], "part");
    assert_eq!(report["warnings"].as_array().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn pdf_fails_cleanly_without_a_browser() {
    let dir = tempdir().unwrap();
    write(dir.path(), "note.md", "# Note\n");

    let mut cmd = cargo_bin_cmd!("folio");
    cmd.current_dir(dir.path())
        .env("FOLIO_CHROME_BIN", dir.path().join("no-such-chrome"))
        .args(["note.md", "-o", "note.pdf"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error: render:"));
    assert!(!dir.path().join("note.pdf").exists());
}
