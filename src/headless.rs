// src/headless.rs
use crate::podcast_request::GeneratePodcastRequest;
use crate::script_generator::ScriptGenerator;
use anyhow::{Context, Result};
use log::info;
use std::io::{self, Write};

/// One generation without the UI: the script goes to `out`, nothing is written on failure.
pub async fn run_generate<W: Write>(
    generator: &dyn ScriptGenerator,
    request: &GeneratePodcastRequest,
    endpoint: &str,
    out: &mut W,
) -> Result<()> {
    let script = generator
        .generate(request)
        .await
        .with_context(|| format!("podcast generation via {} failed", endpoint))?;
    info!("run_generate: received {} bytes of script", script.len());

    write_script(out, &script)?;
    Ok(())
}

/// Writes the script verbatim, adding a final newline only when it lacks one.
pub fn write_script<W: Write>(out: &mut W, script: &str) -> io::Result<()> {
    out.write_all(script.as_bytes())?;
    if !script.ends_with('\n') {
        writeln!(out)?;
    }
    out.flush()
}
