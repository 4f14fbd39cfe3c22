use std::process::{Command, Output};

const SETTINGS_VARS: [&str; 5] =
    ["HTTP_PORT", "REQUEST_TIMEOUT", "PEERS", "FEATURES", "DATABASE_URL"];

fn env_flags(envs: &[(&str, &str)], args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_env-flags"));
    cmd.env_remove("ENV_FLAGS_LENIENT");
    for key in SETTINGS_VARS {
        cmd.env_remove(key);
    }
    cmd.envs(envs.iter().copied()).args(args);
    cmd.output().expect("failed to run env-flags")
}

#[test]
fn malformed_lenient_switch_exits_with_status_1() {
    let out = env_flags(&[("ENV_FLAGS_LENIENT", "maybe")], &[]);
    assert_eq!(out.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("port:"), "{stdout}");
}

#[test]
fn prints_resolved_settings() {
    let out = env_flags(&[("HTTP_PORT", "9000")], &["--timeout", "5s"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("port:      9000"), "{stdout}");
    assert!(stdout.contains("timeout:   5s"), "{stdout}");
}

#[test]
fn lenient_mode_falls_back_on_bad_values() {
    let out = env_flags(&[("HTTP_PORT", "eighty")], &[]);
    assert!(!out.status.success());

    let out = env_flags(
        &[("HTTP_PORT", "eighty"), ("ENV_FLAGS_LENIENT", "true")],
        &[],
    );
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("port:      8080"), "{stdout}");
}
