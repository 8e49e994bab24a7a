use std::process::Command;

fn neon_snake() -> Command {
    Command::new(env!("CARGO_BIN_EXE_neon-snake"))
}

#[test]
fn help_lists_game_settings() {
    let output = neon_snake()
        .arg("--help")
        .output()
        .expect("failed to invoke neon-snake --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--grid-size", "--mode", "--seed", "--storage", "--log-level"] {
        assert!(help.contains(flag), "missing {flag} in:\n{help}");
    }
}

#[test]
fn help_describes_log_level() {
    let output = neon_snake()
        .arg("--help")
        .output()
        .expect("failed to invoke neon-snake --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(
        help.contains("Minimum severity of logged messages"),
        "missing --log-level description in:\n{help}"
    );
}

#[test]
fn invalid_world_configuration_aborts_start_up() {
    let output = neon_snake()
        .args(["--grid-size", "6", "--initial-length", "5"])
        .output()
        .expect("failed to invoke neon-snake");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid world configuration"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn unreadable_config_file_aborts_start_up() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = neon_snake()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .output()
        .expect("failed to invoke neon-snake");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"), "{stderr}");
}
