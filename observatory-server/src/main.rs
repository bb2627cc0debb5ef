//! The observability demo server binary.
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use anyhow::Result;

fn main() -> Result<()> {
    observatory_server::cli::execute()
}
