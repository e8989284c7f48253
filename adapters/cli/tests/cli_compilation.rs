use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "lifeline"])
        .status()
        .expect("failed to invoke cargo check for lifeline CLI binary");

    assert!(status.success(), "cargo check --bin lifeline should succeed");
}

#[test]
fn built_in_patterns_verify_from_the_command_line() {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeline"))
        .arg("--check-patterns")
        .output()
        .expect("failed to run lifeline binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pulsar"));
    assert!(stdout.contains("glider         skipped"));
}

#[test]
fn blinker_run_prints_the_visible_grid() {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeline"))
        .args([
            "--pattern",
            "blinker",
            "--rows",
            "3",
            "--columns",
            "3",
            "--topology",
            "bounded",
            "--steps",
            "1",
        ])
        .output()
        .expect("failed to run lifeline binary");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "step 1 population 3\n000\n111\n000\n"
    );
}

#[test]
fn exported_patterns_can_be_imported() {
    let export = Command::new(env!("CARGO_BIN_EXE_lifeline"))
        .args(["--pattern", "glider", "--rows", "6", "--columns", "6", "--export"])
        .output()
        .expect("failed to run lifeline binary");
    assert!(export.status.success());

    let stdout = String::from_utf8_lossy(&export.stdout);
    let snapshot = stdout
        .lines()
        .last()
        .expect("export prints a pattern string");
    assert!(snapshot.starts_with("life:v1:6x6:"));

    let import = Command::new(env!("CARGO_BIN_EXE_lifeline"))
        .args(["--import", snapshot, "--rows", "6", "--columns", "6"])
        .output()
        .expect("failed to run lifeline binary");
    assert!(import.status.success());

    let first_grid: Vec<&str> = stdout.lines().skip(1).take(6).collect();
    let imported = String::from_utf8_lossy(&import.stdout);
    let second_grid: Vec<&str> = imported.lines().skip(1).take(6).collect();
    assert_eq!(first_grid, second_grid);
}

#[test]
fn unknown_patterns_fail() {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeline"))
        .args(["--pattern", "spaceship"])
        .output()
        .expect("failed to run lifeline binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown pattern"));
}
