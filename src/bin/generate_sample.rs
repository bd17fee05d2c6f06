use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Solar effective temperature (K).
const T_SUN: f64 = 5772.0;
/// Host systems to generate.
const SYSTEMS: usize = 150;
/// Catalog radius (pc).
const MAX_DIST: f64 = 50.0;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Log-uniform on [lo, hi].
    fn log_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        10f64.powf(self.uniform(lo.log10(), hi.log10()))
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One catalog row, with the archive's column names.
#[derive(Debug, Serialize)]
struct SampleRow {
    pl_name: String,
    hostname: String,
    hip_name: Option<String>,
    hd_name: Option<String>,
    st_teff: f64,
    sy_dist: f64,
    pl_orbper: f64,
    pl_bmasse: Option<f64>,
    pl_insol: f64,
    st_lum: f64,
    pl_orbsmax: f64,
    pl_eqt: f64,
    st_rad: f64,
    tran_flag: u8,
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for sys in 0..SYSTEMS {
        // Mostly M dwarfs, as in the real nearby sample.
        let teff = if rng.chance(0.6) {
            rng.uniform(2600.0, 3900.0)
        } else {
            rng.uniform(3900.0, 6300.0)
        };
        let radius = (teff / T_SUN).powf(1.6);
        let star_mass = radius;
        let log_lum = 2.0 * radius.log10() + 4.0 * (teff / T_SUN).log10();
        // Uniform in volume.
        let dist = (MAX_DIST * rng.next_f64().cbrt()).max(1.3);

        let host = format!("SIM {}", 1000 + sys);
        let hip_name = rng.chance(0.5).then(|| format!("HIP {}", 10_000 + 37 * sys));
        let hd_name = (teff > 4500.0 && rng.chance(0.7)).then(|| format!("HD {}", 200 + 13 * sys));

        let n_planets = 1 + (rng.next_u64() % 3) as usize;
        for k in 0..n_planets {
            let period = rng.log_uniform(0.5, 2000.0);
            let a = (star_mass * (period / 365.25).powi(2)).cbrt();
            let insol = 10f64.powf(log_lum) / (a * a);
            // Geometric transit probability R*/a, boosted so the sample has both kinds.
            let transit_p = (5.0 * 0.00465 * radius / a).min(0.9);

            rows.push(SampleRow {
                pl_name: format!("{host} {}", (b'b' + k as u8) as char),
                hostname: host.clone(),
                hip_name: hip_name.clone(),
                hd_name: hd_name.clone(),
                st_teff: teff.round(),
                sy_dist: (dist * 1000.0).round() / 1000.0,
                pl_orbper: period,
                pl_bmasse: (!rng.chance(0.1)).then(|| rng.log_uniform(0.3, 1500.0)),
                pl_insol: insol,
                st_lum: log_lum,
                pl_orbsmax: a,
                pl_eqt: (278.0 * insol.powf(0.25)).round(),
                st_rad: radius,
                tran_flag: u8::from(rng.chance(transit_p)),
            });
        }
    }
    rows
}

fn write_csv(rows: &[SampleRow], path: &str) -> Result<()> {
    let mut file = BufWriter::new(File::create(path).with_context(|| format!("creating {path}"))?);
    writeln!(file, "# Synthetic nearby exoplanet sample, {} planets", rows.len())?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[SampleRow], path: &str) -> Result<()> {
    let text = |f: fn(&SampleRow) -> Option<&str>| -> ArrayRef {
        Arc::new(rows.iter().map(f).collect::<StringArray>())
    };
    let number = |f: fn(&SampleRow) -> Option<f64>| -> ArrayRef {
        Arc::new(rows.iter().map(f).collect::<Float64Array>())
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("pl_name", text(|r| Some(r.pl_name.as_str()))),
        ("hostname", text(|r| Some(r.hostname.as_str()))),
        ("hip_name", text(|r| r.hip_name.as_deref())),
        ("hd_name", text(|r| r.hd_name.as_deref())),
        ("st_teff", number(|r| Some(r.st_teff))),
        ("sy_dist", number(|r| Some(r.sy_dist))),
        ("pl_orbper", number(|r| Some(r.pl_orbper))),
        ("pl_bmasse", number(|r| r.pl_bmasse)),
        ("pl_insol", number(|r| Some(r.pl_insol))),
        ("st_lum", number(|r| Some(r.st_lum))),
        ("pl_orbsmax", number(|r| Some(r.pl_orbsmax))),
        ("pl_eqt", number(|r| Some(r.pl_eqt))),
        ("st_rad", number(|r| Some(r.st_rad))),
        (
            "tran_flag",
            Arc::new(rows.iter().map(|r| Some(r.tran_flag == 1)).collect::<BooleanArray>()) as ArrayRef,
        ),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), true))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Every seventh planet goes on the MIRECLE list; every eleventh host with a
/// HIP id on the HWO list.
fn write_target_lists(rows: &[SampleRow], mirecle_path: &str, hwo_path: &str) -> Result<()> {
    let mut mirecle = csv::Writer::from_path(mirecle_path)?;
    mirecle.write_record(["name"])?;
    for row in rows.iter().step_by(7) {
        mirecle.write_record([row.pl_name.as_str()])?;
    }
    mirecle.flush()?;

    let mut hwo = csv::Writer::from_path(hwo_path)?;
    hwo.write_record(["ID(HIP)", "ID(HD)", "Common Name"])?;
    let mut hosts: Vec<&SampleRow> = rows.iter().filter(|r| r.hip_name.is_some()).collect();
    hosts.dedup_by(|a, b| a.hostname == b.hostname);
    for row in hosts.iter().step_by(11) {
        hwo.write_record([
            row.hip_name.as_deref().unwrap_or(""),
            row.hd_name.as_deref().unwrap_or(""),
            row.hostname.as_str(),
        ])?;
    }
    hwo.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "nearby_exoplanets.csv";
    let parquet_path = "nearby_exoplanets.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;
    write_target_lists(&rows, "mirecle_targets.csv", "hwo_targets.csv")?;

    log::info!(
        "Wrote {} planets around {SYSTEMS} stars to {csv_path} and {parquet_path}",
        rows.len()
    );
    println!("Wrote {} planets to {csv_path}, {parquet_path} and two target lists", rows.len());
    Ok(())
}
