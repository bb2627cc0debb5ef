use std::process::{Child, Command, Stdio};
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

const OBSERVATORY_EXE: &str = env!("CARGO_BIN_EXE_observatory");

fn assert_clean_shutdown(mut child: Child) {
    let pid = Pid::from_raw(child.id() as i32);
    signal::kill(pid, Signal::SIGINT).expect("Failed to send SIGINT");

    let output = child.wait().expect("Failed to wait on child process");

    assert!(
        output.success(),
        "Process exited with non-zero status: {:?}",
        output.code()
    );
}

async fn wait_until_healthy(url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(url).send().await {
            Ok(response) if response.status().is_success() => return,
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    panic!("server did not become healthy at {url}");
}

#[tokio::test]
async fn test_serve_and_shutdown() {
    let port = 10000 + rand::random::<u16>() % 10000;
    let addr = format!("127.0.0.1:{port}");

    let child = Command::new(OBSERVATORY_EXE)
        .arg("run")
        .env("OBS__HTTP_ADDR", &addr)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("Failed to spawn subprocess");

    wait_until_healthy(&format!("http://{addr}/health")).await;

    let healthcheck = Command::new(OBSERVATORY_EXE)
        .arg("healthcheck")
        .env("OBS__HTTP_ADDR", &addr)
        .status()
        .expect("Failed to run healthcheck");
    assert!(healthcheck.success());

    assert_clean_shutdown(child);
}

#[test]
fn test_version() {
    let output = Command::new(OBSERVATORY_EXE)
        .arg("version")
        .output()
        .expect("Failed to spawn subprocess");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}
