use std::path::{Path, PathBuf};
use std::process::Command;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cellar"))
}

fn cellar(db: &Path, config: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env("CELLAR_DB", db)
        .env("CELLAR_CONFIG", config)
        .args(args);
    cmd
}

fn run_ok(db: &Path, config: &Path, args: &[&str]) -> String {
    let output = cellar(db, config, args)
        .output()
        .expect("command should run");
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn last_token(line: &str) -> String {
    line.trim()
        .rsplit(' ')
        .next()
        .expect("output should contain an id")
        .to_string()
}

#[test]
fn test_full_inventory_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("cellar.db");
    // Point at a nonexistent config so host settings never leak in.
    let config = dir.path().join("config.toml");

    let out = run_ok(&db, &config, &["init"]);
    assert!(out.contains("Initialized"));
    assert!(db.exists());

    let out = run_ok(
        &db,
        &config,
        &[
            "storage", "create", "Basement rack", "--zone", "A:2", "--zone", "B:1",
        ],
    );
    assert!(out.contains("Created storage"));
    assert!(out.contains("3 positions"));

    // Find the position id for slot A-1.
    let out = run_ok(&db, &config, &["positions", "--available", "--json"]);
    let positions: Vec<serde_json::Value> = serde_json::from_str(&out).expect("positions JSON");
    assert_eq!(positions.len(), 3);
    let a1 = positions
        .iter()
        .find(|p| p["identifier"] == "A-1")
        .expect("A-1 should exist")["id"]
        .as_str()
        .expect("id string")
        .to_string();

    let out = run_ok(
        &db,
        &config,
        &[
            "add",
            "Malbec 2020",
            "--description",
            "Argentinian red",
            "--position",
            &a1,
        ],
    );
    let malbec = last_token(&out);
    assert!(malbec.starts_with("wine_"));

    // Same position again: the add must fail and change nothing.
    let output = cellar(
        &db,
        &config,
        &["add", "Syrah 2019", "--position", &a1],
    )
    .output()
    .expect("command should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Conflict"), "stderr was: {}", stderr);

    let out = run_ok(&db, &config, &["list", "--json"]);
    let wines: Vec<serde_json::Value> = serde_json::from_str(&out).expect("wines JSON");
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0]["name"], "Malbec 2020");
    assert_eq!(wines[0]["position"], "A A-1");

    run_ok(&db, &config, &["consume", &malbec]);

    let out = run_ok(&db, &config, &["list", "--json"]);
    let wines: Vec<serde_json::Value> = serde_json::from_str(&out).expect("wines JSON");
    assert!(wines.is_empty());

    let out = run_ok(&db, &config, &["positions", "--available", "--json"]);
    let positions: Vec<serde_json::Value> = serde_json::from_str(&out).expect("positions JSON");
    assert_eq!(positions.len(), 3);

    // The consumed wine stays in the history.
    let out = run_ok(&db, &config, &["list", "--all", "--json"]);
    let wines: Vec<serde_json::Value> = serde_json::from_str(&out).expect("wines JSON");
    assert_eq!(wines.len(), 1);
    assert_eq!(wines[0]["consumed"], true);

    // The freed position accepts a new wine, which can then be moved and deleted.
    let out = run_ok(
        &db,
        &config,
        &["add", "Syrah 2019", "--position", &a1],
    );
    let syrah = last_token(&out);

    let out = run_ok(&db, &config, &["positions", "--available", "--json"]);
    let positions: Vec<serde_json::Value> = serde_json::from_str(&out).expect("positions JSON");
    let b1 = positions
        .iter()
        .find(|p| p["identifier"] == "B-1")
        .expect("B-1 should exist")["id"]
        .as_str()
        .expect("id string")
        .to_string();

    run_ok(&db, &config, &["move", &syrah, &b1]);
    let out = run_ok(&db, &config, &["show", &syrah, "--json"]);
    let wine: serde_json::Value = serde_json::from_str(&out).expect("wine JSON");
    assert_eq!(wine["position"], "B B-1");

    run_ok(&db, &config, &["delete", &syrah, "--yes"]);
    let output = cellar(&db, &config, &["show", &syrah])
        .output()
        .expect("command should run");
    assert!(!output.status.success());

    let out = run_ok(&db, &config, &["check"]);
    assert!(out.contains("Integrity check: OK"));
}

#[test]
fn test_quiet_add_prints_bare_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("cellar.db");
    let config = dir.path().join("config.toml");

    run_ok(&db, &config, &["init", "--quiet"]);
    run_ok(
        &db,
        &config,
        &["--quiet", "storage", "create", "Shelf", "--zone", "A:1"],
    );

    let out = run_ok(&db, &config, &["--quiet", "add", "Port"]);
    assert!(out.trim().starts_with("wine_"));
    assert!(!out.contains(' '));
}

#[test]
fn test_missing_database_path_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("config.toml");

    let mut cmd = Command::new(bin());
    cmd.env_remove("CELLAR_DB")
        .env("CELLAR_CONFIG", &config)
        .args(["list"]);
    let output = cmd.output().expect("command should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No database path"), "stderr was: {}", stderr);
}
