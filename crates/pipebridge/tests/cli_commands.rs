#![cfg(all(unix, feature = "cli"))]

use std::io::{Read, Write};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/pbcli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn pipebridge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pipebridge"))
        .arg("--log-level")
        .arg("off")
        .arg("--pipe-dir")
        .arg(dir)
        .args(args)
        .output()
        .expect("pipebridge should run")
}

#[test]
fn send_prints_uppercased_echo() {
    let dir = unique_temp_dir("send");
    let listener = UnixListener::bind(dir.join("echo")).expect("listener should bind");
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("server should accept");
        let mut buf = [0u8; 4096];
        let n = stream.read(&mut buf).expect("server should read");
        let reply = String::from_utf8_lossy(&buf[..n]).to_uppercase();
        stream.write_all(reply.as_bytes()).expect("server should reply");
    });

    let output = pipebridge(
        &dir,
        &["--format", "raw", "send", "echo", "--json", "{\"v\":1}", "--timeout", "1s"],
    );

    assert!(output.status.success(), "{output:?}");
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"V\":1}");
    server.join().expect("server thread should complete");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn malformed_json_exits_data_invalid() {
    let dir = unique_temp_dir("invalid");
    let output = pipebridge(&dir, &["send", "echo", "--json", "{not json"]);

    assert_eq!(output.status.code(), Some(60));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not valid JSON"), "{stderr}");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_pipe_exits_timeout() {
    let dir = unique_temp_dir("missing");
    let output = pipebridge(&dir, &["write", "nobody", "--data", "hi", "--timeout", "100ms"]);

    assert_eq!(output.status.code(), Some(124));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn stale_socket_exits_transport_error() {
    let dir = unique_temp_dir("stale");
    drop(UnixListener::bind(dir.join("stale")).expect("listener should bind"));
    let output = pipebridge(&dir, &["write", "stale", "--data", "hi", "--timeout", "100ms"]);

    assert_eq!(output.status.code(), Some(3));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn list_and_exists_follow_namespace() {
    let dir = unique_temp_dir("list");

    let empty = pipebridge(&dir, &["--format", "raw", "list"]);
    assert!(empty.status.success());
    assert_eq!(
        String::from_utf8_lossy(&empty.stdout).trim(),
        "No named pipes available."
    );

    let _b = UnixListener::bind(dir.join("bravo")).expect("listener should bind");
    let _a = UnixListener::bind(dir.join("alpha")).expect("listener should bind");

    let json = pipebridge(&dir, &["--format", "json", "list"]);
    let payload: serde_json::Value =
        serde_json::from_slice(&json.stdout).expect("list should emit json");
    assert_eq!(payload["count"], 2);
    assert_eq!(payload["pipes"], serde_json::json!(["alpha", "bravo"]));

    let found = pipebridge(&dir, &["--format", "raw", "exists", r"\\.\pipe\alpha"]);
    assert!(found.status.success());
    assert_eq!(String::from_utf8_lossy(&found.stdout).trim(), "exists");

    let missing = pipebridge(&dir, &["--format", "raw", "exists", "charlie"]);
    assert_eq!(missing.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&missing.stdout).trim(), "not found");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn resolve_prints_canonical_name() {
    let dir = unique_temp_dir("resolve");
    let output = pipebridge(&dir, &["--format", "raw", "resolve", "  //./pipe/svc "]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r"\\.\pipe\svc");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn serve_answers_json_rpc_on_stdio() {
    let dir = unique_temp_dir("serve");
    let mut child = Command::new(env!("CARGO_BIN_EXE_pipebridge"))
        .arg("--log-level")
        .arg("off")
        .arg("--pipe-dir")
        .arg(&dir)
        .arg("serve")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("serve should start");

    {
        let mut stdin = child.stdin.take().expect("stdin should be piped");
        let requests = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"pipe_exists","arguments":{"pipe_name":"ghost"}}}"#,
            "\n"
        );
        stdin
            .write_all(requests.as_bytes())
            .expect("requests should be written");
    }

    let output = child.wait_with_output().expect("serve should exit on EOF");
    assert!(output.status.success());

    let responses: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "pipebridge");
    assert_eq!(responses[1]["result"]["content"][0]["text"], "not found");
    assert_eq!(responses[1]["result"]["isError"], false);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn doctor_reports_json() {
    let dir = unique_temp_dir("doctor");
    let output = pipebridge(&dir, &["--format", "json", "doctor"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("doctor-report.schema.json"));
    assert!(stdout.contains("\"overall\":\"pass\""));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn version_reports_package_version() {
    let dir = unique_temp_dir("version");
    let output = pipebridge(&dir, &["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("pipebridge {}", env!("CARGO_PKG_VERSION"))
    );
    let _ = std::fs::remove_dir_all(&dir);
}
