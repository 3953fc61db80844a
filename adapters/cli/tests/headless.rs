use std::process::Command;

fn tilebreaker() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tilebreaker"));
    let _ = command.env("RUST_LOG", "warn");
    command
}

#[test]
fn headless_run_prints_a_summary() {
    let output = tilebreaker()
        .args(["--headless", "120", "--settings", "missing-settings.toml"])
        .output()
        .expect("failed to run tilebreaker");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ticks: 120"), "{stdout}");
    assert!(stdout.contains("outcome: InProgress"), "{stdout}");
    assert!(stdout.contains("time remaining: 118."), "{stdout}");
}

#[test]
fn unsupported_resolution_is_rejected() {
    let output = tilebreaker()
        .args(["--headless", "1", "--resolution", "640x480"])
        .output()
        .expect("failed to run tilebreaker");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("640x480"), "{stderr}");
}

#[test]
fn invalid_level_files_fail_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("level.txt");
    std::fs::write(&path, "1..\n---\n").expect("level written");

    let output = tilebreaker()
        .arg("--level")
        .arg(&path)
        .args(["--headless", "1"])
        .output()
        .expect("failed to run tilebreaker");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load level"), "{stderr}");
    assert!(stderr.contains("no exit tile"), "{stderr}");
}

#[test]
fn save_settings_writes_the_effective_values() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config/video.toml");

    let output = tilebreaker()
        .arg("--settings")
        .arg(&path)
        .args(["--save-settings", "--resolution", "1280x1024", "--headless", "1"])
        .output()
        .expect("failed to run tilebreaker");

    assert!(output.status.success(), "{output:?}");
    let contents = std::fs::read_to_string(&path).expect("settings written");
    assert!(contents.contains("resolution = \"1280x1024\""), "{contents}");
}
