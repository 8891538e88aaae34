//! Quote export: stable 4-space JSON and atomic file output.

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

use super::types::QuoteOutcome;

/// Serialize a quote as 4-space-indented JSON, the shape the storefront's
/// cart importer expects. Appends a trailing newline if not already present.
pub fn quote_to_json(outcome: &QuoteOutcome) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    outcome.serialize(&mut ser)?;
    let mut s = String::from_utf8(buf)?;
    if !s.ends_with('\n') {
        s.push('\n');
    }
    Ok(s)
}

/// Write a quote to disk atomically.
///
/// Uses a temporary file in the same directory as `target_path`, writes
/// the JSON content, then atomically renames the temp file to the target.
/// This guarantees that an interrupted write never leaves a partial file.
pub fn write_quote_atomic(outcome: &QuoteOutcome, target_path: &Path) -> Result<()> {
    let json = quote_to_json(outcome)?;

    // A bare filename has an empty parent; that means the current directory
    let parent = match target_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(json.as_bytes())?;
    temp.flush()?;

    temp.persist(target_path)?;

    info!("Wrote quote to {:?}", target_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::options::{EdgeAttachment, MaterialFamily, PanelLayout, TopAttachment};
    use crate::panel::types::SideMeasurement;
    use crate::pricing::book::default_prices;
    use crate::quote::engine::QuoteEngine;
    use crate::quote::types::{OrderConfig, SideConfig};

    fn sample_outcome() -> QuoteOutcome {
        let engine = QuoteEngine::with_defaults();
        let order = OrderConfig {
            family: MaterialFamily::Mesh,
            sides: vec![SideConfig {
                label: "front".to_string(),
                measurement: SideMeasurement::flat(120.0, 96.0),
                layout: PanelLayout::Single,
                outer_left: EdgeAttachment::Snap,
                outer_right: EdgeAttachment::None,
                top: TopAttachment::TrackStandard,
                bottom: EdgeAttachment::None,
            }],
        };
        engine.price_order(&order, &default_prices())
    }

    #[test]
    fn test_json_is_four_space_indented_with_trailing_newline() {
        let json = quote_to_json(&sample_outcome()).unwrap();
        assert!(json.starts_with("{\n    \"family\""));
        assert!(json.ends_with('\n'));
        // Options serialize as their canonical keys
        assert!(json.contains("\"track_standard\""));
        assert!(json.contains("\"snap\""));
    }

    #[test]
    fn test_written_quote_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quote.json");
        write_quote_atomic(&sample_outcome(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["status"], "priced");
        assert_eq!(value["tier"], "medium");
        assert_eq!(value["panels"][0]["spec"]["cut_width_in"], 122);
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("quote.json");
        write_quote_atomic(&sample_outcome(), &path).unwrap();
        assert!(path.exists());
    }
}
