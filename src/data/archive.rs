use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// NASA Exoplanet Archive (NExScI) TAP service
// ---------------------------------------------------------------------------

pub const TAP_ENDPOINT: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP/sync";
/// Planetary Systems Composite Parameters: one row per planet.
pub const TABLE: &str = "pscomppars";
/// A cached download older than this is refetched on `--refresh`.
pub const SHELF_LIFE: Duration = Duration::from_secs(24 * 60 * 60);
/// Format of the retrieval stamp written as the first line of a download.
pub const STAMP_FORMAT: &str = "%Y/%m/%d %H:%M";

const TIMEOUT: Duration = Duration::from_secs(120);

/// The ADQL statement sent to the service. The whole table is cached; every
/// bound is applied locally, so one download serves any combination of flags.
pub fn adql() -> String {
    format!("select * from {TABLE}")
}

/// Full synchronous TAP URL returning CSV.
pub fn url() -> String {
    let query = adql().split(' ').collect::<Vec<_>>().join("+");
    format!("{TAP_ENDPOINT}?query={query}&format=csv")
}

/// Whether the file at `path` is missing or older than `shelf_life`.
pub fn is_stale(path: &Path, shelf_life: Duration) -> bool {
    let Ok(modified) = std::fs::metadata(path).and_then(|m| m.modified()) else {
        return true;
    };
    match SystemTime::now().duration_since(modified) {
        Ok(age) => age > shelf_life,
        // Modified in the future: clock skew, treat as fresh.
        Err(_) => false,
    }
}

/// Download the archive table to `path`.
pub fn fetch(path: &Path) -> Result<()> {
    let url = url();
    log::info!("Querying {url}");

    let agent = ureq::AgentBuilder::new().timeout(TIMEOUT).build();
    let response = agent
        .get(&url)
        .call()
        .map_err(|e| Error::Fetch(e.to_string()))?;

    let stamp = chrono::Local::now().format(STAMP_FORMAT).to_string();
    store(response.into_reader(), &stamp, path)?;
    log::info!("Saved archive table to {}", path.display());
    Ok(())
}

/// Write `# <stamp>` followed by `body` to `path`.
///
/// The data goes to a sibling `.part` file first and is renamed into place
/// only when complete; on failure the partial file is removed and `path` is
/// left untouched.
pub fn store(mut body: impl Read, stamp: &str, path: &Path) -> Result<()> {
    let partial = path.with_extension("part");
    if let Err(e) = write_stamped(&mut body, stamp, &partial) {
        if let Err(rm) = std::fs::remove_file(&partial) {
            log::warn!("Could not remove {}: {rm}", partial.display());
        }
        return Err(Error::Fetch(format!("writing {}: {e}", path.display())));
    }
    std::fs::rename(&partial, path)?;
    Ok(())
}

fn write_stamped(body: &mut impl Read, stamp: &str, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# {stamp}")?;
    std::io::copy(body, &mut out)?;
    out.flush()
}

/// Fetch `path` again if it is stale. Returns whether a download happened.
pub fn refresh(path: &Path) -> Result<bool> {
    if !is_stale(path, SHELF_LIFE) {
        log::debug!("{} is fresh, skipping download", path.display());
        return Ok(false);
    }
    fetch(path)?;
    Ok(true)
}
