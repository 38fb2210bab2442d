use std::path::Path;
use std::process::Command;

fn demos_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

#[test]
fn run_plays_demo_scripts_to_the_end() {
    let output = Command::new(env!("CARGO_BIN_EXE_ts-cli"))
        .arg("run")
        .arg("--scripts-dir")
        .arg(demos_dir())
        .output()
        .expect("cli should execute");

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !output.status.success() {
        panic!(
            "demo run failed\nstdout:\n{}\nstderr:\n{}",
            stdout,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.first(), Some(&"RESULT:OK"));
    assert!(lines.contains(&"HALTED:true"));
    let logged = lines
        .iter()
        .filter_map(|line| line.strip_prefix("LOG_JSON:"))
        .collect::<Vec<_>>();
    assert_eq!(
        logged,
        vec![
            r#""Welcome""#,
            r#""Once upon a time""#,
            r#""The end""#,
            r#""Back in main""#,
            r#""tick""#,
            r#""done""#,
        ]
    );
    assert!(lines.contains(&r#"VALUES_JSON:{"round":1.0}"#));
}

#[test]
fn check_counts_demo_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_ts-cli"))
        .arg("check")
        .arg("--scripts-dir")
        .arg(demos_dir())
        .output()
        .expect("cli should execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SCRIPTS:2"));
    assert!(stdout.contains("COMMANDS:14"));
}

#[test]
fn run_stops_at_max_ticks() {
    let output = Command::new(env!("CARGO_BIN_EXE_ts-cli"))
        .arg("run")
        .arg("--scripts-dir")
        .arg(demos_dir())
        .arg("--max-ticks")
        .arg("1")
        .output()
        .expect("cli should execute");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TICKS:1"));
    assert!(stdout.contains("HALTED:false"));
}
