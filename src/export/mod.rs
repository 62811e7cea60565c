//! Site export: serializes a validated dataset into the static JSON API
//! tree consumed by the site.

pub mod site;

pub use site::{ExportConfig, ExportSummary, SiteBuilder};
