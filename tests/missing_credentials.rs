use std::process::{Command, Output};

fn run(bin: &str, args: &[&str], root: &std::path::Path) -> Output {
    Command::new(bin)
        .args(args)
        .arg("--root")
        .arg(root)
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to spawn binary")
}

fn assert_missing_key_exit(output: &Output) {
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Missing service account key"),
        "stderr was: {stderr}"
    );
    assert!(stderr.contains("service-account.json"));
    assert!(output.stdout.is_empty());
}

#[test]
fn every_authenticated_tool_exits_with_status_1_without_a_key() {
    let root = tempfile::tempdir().unwrap();

    let cases: Vec<(&str, Vec<&str>)> = vec![
        (env!("CARGO_BIN_EXE_update_config"), vec![]),
        (env!("CARGO_BIN_EXE_verify_config"), vec![]),
        (env!("CARGO_BIN_EXE_manage_firestore"), vec!["list_users", "mentor"]),
        (env!("CARGO_BIN_EXE_manage_firestore"), vec!["delete_user", "u1"]),
        (env!("CARGO_BIN_EXE_deploy_config"), vec!["--rules"]),
        (env!("CARGO_BIN_EXE_send_test_notification"), vec!["post-1"]),
    ];

    for (bin, args) in &cases {
        let output = run(bin, args, root.path());
        assert_missing_key_exit(&output);
    }
}

#[test]
fn malformed_key_also_exits_with_status_1() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("service-account.json"), "not a key").unwrap();

    let output = run(env!("CARGO_BIN_EXE_verify_config"), &[], root.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid service account key"), "stderr was: {stderr}");
}

#[test]
fn missing_key_message_survives_silenced_logging() {
    let root = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_verify_config"))
        .arg("--root")
        .arg(root.path())
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to spawn binary");

    assert_missing_key_exit(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2. Generate New Private Key"), "stderr was: {stderr}");
}
