use std::process::Command;

#[test]
fn tilebreaker_binary_type_checks() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "tilebreaker"])
        .status()
        .expect("cargo should be available to the test harness");

    assert!(
        status.success(),
        "the tilebreaker binary and its adapters failed to type-check"
    );
}
