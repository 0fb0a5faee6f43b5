//! List command - print registered suite names

use crate::testing::SuiteRegistry;
use anyhow::Result;
use std::io::{self, Write};

/// Print one suite name per line
pub fn run(registry: &SuiteRegistry) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in registry.names() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}
