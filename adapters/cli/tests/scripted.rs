use std::process::{Command, Output};

fn travels(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_travels"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to launch the travels binary")
}

#[test]
fn scripted_moves_walk_the_lesson() {
    let output = travels(&["--no-color", "--moves", "c e"]);

    assert!(output.status.success(), "scripted run should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[ Welcome to Travels!"), "welcome popup shown first");
    assert!(stdout.contains("Location: {2,1}"), "character moved east");
    assert!(stdout.contains("Hint: go to location {4,3}"));
    assert!(stdout.contains("Task: Find the secret room"));
}

#[test]
fn missing_config_file_is_reported() {
    let output = travels(&["--config", "no-such-travels.toml", "--moves", ""]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to read config `no-such-travels.toml`"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn version_flag_prints_the_package_version() {
    let output = travels(&["--version"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("travels {}", env!("CARGO_PKG_VERSION"))
    );
}
