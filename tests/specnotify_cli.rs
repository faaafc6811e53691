use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn specnotify_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_specnotify").expect("specnotify test binary not built")
}

#[test]
fn help_mentions_name_and_listener_flags() {
    let output = Command::new(specnotify_bin())
        .arg("--help")
        .output()
        .expect("run specnotify --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("specnotify"));
    assert!(combined.contains("--slot-id"));
    assert!(combined.contains("--summary-line"));
}

#[test]
fn invalid_port_is_rejected_before_connecting() {
    let output = Command::new(specnotify_bin())
        .args(["--port", "0"])
        .output()
        .expect("run specnotify --port 0");
    assert!(!output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("--port must be nonzero"));
}
