//! Remove the rendered page

use anyhow::Result;
use std::fs;

use crate::Codenour;

/// Delete the output file if it exists
pub fn run(app: &Codenour) -> Result<()> {
    if app.output_path.exists() {
        fs::remove_file(&app.output_path)?;
        tracing::info!("Deleted: {:?}", app.output_path);
    }
    Ok(())
}
