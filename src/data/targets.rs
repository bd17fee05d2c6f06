use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{PlanetCatalog, TargetListKind};

// ---------------------------------------------------------------------------
// Target lists
// ---------------------------------------------------------------------------

/// A curated list of systems, read from its published CSV.
///
/// * MIRECLE lists planets by name (`name` column).
/// * HWO lists host stars by HIP id, HD id or common name
///   (`ID(HIP)`, `ID(HD)`, `Common Name` columns).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetList {
    pub kind: TargetListKind,
    pub planet_names: BTreeSet<String>,
    pub hip_ids: BTreeSet<String>,
    pub hd_ids: BTreeSet<String>,
    pub common_names: BTreeSet<String>,
}

impl TargetList {
    /// Load a list of the given kind from a CSV file.
    pub fn load(kind: TargetListKind, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("opening target list {}", path.display()))?;
        let headers = reader
            .headers()
            .context("reading target list headers")?
            .clone();

        let column = |name: &str| headers.iter().position(|h| h.trim() == name);
        let name_idx = column("name");
        let hip_idx = column("ID(HIP)");
        let hd_idx = column("ID(HD)");
        let common_idx = column("Common Name");

        match kind {
            TargetListKind::Mirecle if name_idx.is_none() => {
                anyhow::bail!("MIRECLE list {} has no 'name' column", path.display())
            }
            TargetListKind::Hwo if hip_idx.is_none() && hd_idx.is_none() && common_idx.is_none() => {
                anyhow::bail!(
                    "HWO list {} has none of 'ID(HIP)', 'ID(HD)', 'Common Name'",
                    path.display()
                )
            }
            _ => {}
        }

        let mut list = TargetList {
            kind,
            ..Default::default()
        };
        for (row_no, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("target list row {row_no}"))?;
            let take = |idx: Option<usize>, set: &mut BTreeSet<String>| {
                if let Some(v) = idx.and_then(|i| record.get(i)).map(str::trim) {
                    if !v.is_empty() {
                        set.insert(v.to_string());
                    }
                }
            };
            take(name_idx, &mut list.planet_names);
            take(hip_idx, &mut list.hip_ids);
            take(hd_idx, &mut list.hd_ids);
            take(common_idx, &mut list.common_names);
        }
        Ok(list)
    }

    /// Whether a planet with these identifiers is on the list.
    pub fn contains(
        &self,
        planet: &str,
        host: &str,
        hip_name: Option<&str>,
        hd_name: Option<&str>,
    ) -> bool {
        match self.kind {
            TargetListKind::None => false,
            TargetListKind::Mirecle => self.planet_names.contains(planet.trim()),
            TargetListKind::Hwo => {
                hip_name.is_some_and(|h| self.hip_ids.contains(h.trim()))
                    || hd_name.is_some_and(|h| self.hd_ids.contains(h.trim()))
                    || self.common_names.contains(host.trim())
            }
        }
    }

    /// Set the membership flag of every matching record.
    pub fn mark(&self, catalog: &mut PlanetCatalog) -> usize {
        let mut marked = 0;
        for rec in &mut catalog.records {
            let hit = self.contains(
                &rec.name,
                &rec.host,
                rec.hip_name.as_deref(),
                rec.hd_name.as_deref(),
            );
            if !hit {
                continue;
            }
            marked += 1;
            match self.kind {
                TargetListKind::Mirecle => rec.in_mirecle = true,
                TargetListKind::Hwo => rec.in_hwo = true,
                TargetListKind::None => {}
            }
        }
        log::info!("Marked {marked} {} targets", self.kind);
        marked
    }
}
