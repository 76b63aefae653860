mod common;

use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use common::{CATALOG_HTML, CATALOG_REWRITTEN};
use predicates::prelude::*;

const BIN_NAME: &str = "price_rewriter_cli";

/// Command isolated from the user's home directory and configuration.
fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("PRICE_REWRITER_HOME", home.path())
        .env_remove("PRICE_REWRITER_CONFIG")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn format_prints_german_euro_amount() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .args(["format", "1234.5"])
        .assert()
        .success()
        .stdout("1.234,50\u{a0}€\n");
}

#[test]
fn format_renders_nan_for_non_numeric_input() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .args(["format", "abc"])
        .assert()
        .success()
        .stdout("NaN\u{a0}€\n");
}

#[test]
fn rewrite_reads_stdin_and_writes_stdout() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .arg("rewrite")
        .write_stdin(CATALOG_HTML)
        .assert()
        .success()
        .stdout(CATALOG_REWRITTEN)
        .stderr(predicate::str::contains("Rewrote 3 of 3 price element(s)"));
}

#[test]
fn rewrite_writes_output_file() {
    let home = TempDir::new().expect("tempdir");
    let input = home.child("catalog.html");
    input.write_str(CATALOG_HTML).expect("write input");
    let output = home.child("catalog.de.html");

    cli(&home)
        .arg("rewrite")
        .arg(input.path())
        .arg("-o")
        .arg(output.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    output.assert(CATALOG_REWRITTEN);
    input.assert(CATALOG_HTML);
}

#[test]
fn rewrite_output_keeps_neighbouring_files() {
    let home = TempDir::new().expect("tempdir");
    let neighbour = home.child("catalog.de.tmp");
    neighbour.write_str("unrelated").expect("write neighbour");
    let output = home.child("catalog.de.html");

    cli(&home)
        .args(["rewrite", "-o"])
        .arg(output.path())
        .write_stdin(CATALOG_HTML)
        .assert()
        .success();

    output.assert(CATALOG_REWRITTEN);
    neighbour.assert("unrelated");
}

#[test]
fn rewrite_accepts_non_utf8_input() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .arg("rewrite")
        .write_stdin(b"<p>Gr\xf6\xdfe</p><b class=\"price\" data-price=\"2\">x</b>".to_vec())
        .assert()
        .success()
        .stdout("<p>Gr\u{fffd}\u{fffd}e</p><b class=\"price\" data-price=\"2\">2,00&nbsp;€</b>");
}

#[test]
fn rewrite_report_is_json_on_stderr() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .args(["rewrite", "--report"])
        .write_stdin(r#"<p class="price">x</p>"#)
        .assert()
        .success()
        .stdout("<p class=\"price\">NaN&nbsp;€</p>")
        .stderr(
            predicate::str::contains(r#""matched": 1"#)
                .and(predicate::str::contains(r#""raw": null"#)),
        );
}

#[test]
fn invalid_policy_flag_overrides_config() {
    let home = TempDir::new().expect("tempdir");
    let config = home.child("config.json");
    config
        .write_str(r#"{"invalid_policy": "flag"}"#)
        .expect("write config");

    cli(&home)
        .args(["rewrite", "--invalid-policy", "skip", "--config"])
        .arg(config.path())
        .write_stdin(r#"<p class="price" data-price="?">ask</p>"#)
        .assert()
        .success()
        .stdout(r#"<p class="price" data-price="?">ask</p>"#)
        .stderr(predicate::str::contains("1 element(s) had no numeric price"));
}

#[test]
fn unsupported_locale_in_config_fails() {
    let home = TempDir::new().expect("tempdir");
    let config = home.child("config.json");
    config
        .write_str(r#"{"locale": "en-US", "currency": "USD"}"#)
        .expect("write config");

    cli(&home)
        .args(["rewrite", "--config"])
        .arg(config.path())
        .write_stdin("<p></p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: unsupported locale `en-US`"));
}

#[test]
fn missing_input_file_fails() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .args(["rewrite", "does-not-exist.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn init_config_writes_defaults_once() {
    let home = TempDir::new().expect("tempdir");
    cli(&home).arg("init-config").assert().success();
    home.child("config.json")
        .assert(predicate::str::contains(r#""marker_class": "price""#));

    cli(&home)
        .arg("init-config")
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn version_prints_build_metadata() {
    let home = TempDir::new().expect("tempdir");
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("Price Rewriter").and(predicate::str::contains("Rustc")));
}
