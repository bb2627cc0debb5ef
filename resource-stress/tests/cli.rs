use std::process::{Command, Output};
use std::time::{Duration, Instant};

const CPU_STRESS_EXE: &str = env!("CARGO_BIN_EXE_cpu-stress");
const MEMORY_STRESS_EXE: &str = env!("CARGO_BIN_EXE_memory-stress");

fn run(exe: &str, args: &[&str]) -> Output {
    Command::new(exe)
        .args(args)
        .output()
        .expect("Failed to spawn subprocess")
}

fn assert_usage_error(output: Output) {
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--help"), "unexpected stderr: {stderr}");
}

#[test]
fn cpu_stress_without_arguments() {
    assert_usage_error(run(CPU_STRESS_EXE, &[]));
}

#[test]
fn cpu_stress_with_extra_arguments() {
    assert_usage_error(run(CPU_STRESS_EXE, &["1", "2"]));
}

#[test]
fn cpu_stress_with_invalid_duration() {
    assert_usage_error(run(CPU_STRESS_EXE, &["soon"]));
}

#[test]
fn cpu_stress_with_unrepresentable_duration() {
    let output = run(CPU_STRESS_EXE, &["18446744073709551615"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too long"), "unexpected stderr: {stderr}");
    assert_usage_error(output);
}

#[test]
fn memory_stress_with_unrepresentable_duration() {
    let output = run(MEMORY_STRESS_EXE, &["18446744073709551615"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("too long"), "unexpected stderr: {stderr}");
    assert_usage_error(output);
}

#[test]
fn memory_stress_without_arguments() {
    assert_usage_error(run(MEMORY_STRESS_EXE, &[]));
}

#[test]
fn memory_stress_with_extra_arguments() {
    assert_usage_error(run(MEMORY_STRESS_EXE, &["1", "2"]));
}

#[test]
fn cpu_stress_runs_for_duration() {
    let start = Instant::now();
    let output = run(CPU_STRESS_EXE, &["1"]);

    assert!(output.status.success());
    assert!(start.elapsed() >= Duration::from_secs(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CPU Stress Test Completed"));
}

#[test]
fn memory_stress_zero_duration_exits_cleanly() {
    let output = run(MEMORY_STRESS_EXE, &["0"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Memory Stress Test Completed"));
}
