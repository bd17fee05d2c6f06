//! Data layer: core types, loading, target lists and filtering.
//!
//! Architecture:
//! ```text
//!  NExScI TAP ──(archive, --refresh)──▶ .csv
//!                                       │  .json / .parquet
//!                                       ▼
//!                                 ┌──────────┐
//!                                 │  loader   │  parse file → PlanetCatalog
//!                                 └──────────┘
//!                                       │
//!                                       ▼
//!                                 ┌──────────┐
//!                                 │ targets   │  MIRECLE / HWO membership flags
//!                                 └──────────┘
//!                                       │
//!                                       ▼
//!                                 ┌──────────┐
//!                                 │  filter   │  inclusive upper bounds → records
//!                                 └──────────┘
//! ```

pub mod archive;
pub mod filter;
pub mod loader;
pub mod model;
pub mod targets;
