//! CLI smoke tests: verify basic binary behavior.

use std::process::Command;

fn cli_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sage"))
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Expected usage info in --help output");
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("chat"));
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sage"), "Expected binary name in --version output");
}

#[test]
fn test_local_chat_answers_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("sage.toml");
    std::fs::write(
        &config,
        format!(
            "[resolver]\nsession_file = {:?}\n",
            dir.path().join("sessions.json").display().to_string()
        ),
    )
    .unwrap();

    let mut child = cli_bin()
        .arg("--config")
        .arg(&config)
        .arg("chat")
        .arg("--local")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"2+2\nquit\n")
        .unwrap();
    let output = child.wait_with_output().expect("failed to wait");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("**4**"), "stdout was: {}", stdout);
}
