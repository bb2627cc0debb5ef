use tracing_subscriber::EnvFilter;

/// Log directives for tests: errors from dependencies, everything from the workspace crates.
const TEST_DIRECTIVES: &str = "error,observatory_server=trace,loadtest=trace";

/// Routes log output of the server and the load generator into the test runner's captured
/// output.
///
/// Safe to call from every test. Only the first call installs the subscriber, and `RUST_LOG`
/// overrides the default directives.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(TEST_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init()
        .ok();
}
