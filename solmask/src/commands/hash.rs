// solmask/src/commands/hash.rs
//! `solmask hash`: salted correlation ids.

use anyhow::Result;
use std::io::{self, Write};

use solmask_core::MaskingEngine;

use crate::cli::HashCommand;

pub fn run_hash(engine: &MaskingEngine, cmd: &HashCommand) -> Result<()> {
    let id = engine.hash_id(&cmd.value, &cmd.salt);
    writeln!(io::stdout().lock(), "{}", id)?;
    Ok(())
}
