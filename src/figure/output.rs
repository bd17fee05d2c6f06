use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::svg::{write_svg, CANVAS};
use super::Figure;
use crate::error::{Error, Result};

/// File formats the figure can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Static vector image.
    Svg,
    /// Serialized figure document, for embedding in an interactive front end.
    Json,
}

impl OutputFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::UnsupportedOutput(format!(".{other}"))),
        }
    }
}

/// Save the figure, choosing the format from the extension of `path`.
pub fn save(figure: &Figure, path: &Path) -> Result<()> {
    match OutputFormat::from_path(path)? {
        OutputFormat::Svg => write_svg(figure, path, CANVAS)?,
        OutputFormat::Json => {
            let out = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(out, figure)?;
        }
    }
    log::info!(
        "Wrote {} ({} planets) to {}",
        figure.title,
        figure.planet_count(),
        path.display()
    );
    Ok(())
}
