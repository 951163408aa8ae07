use std::fs;
use std::path::Path;

use anyhow::Context;
use floatgrid_stream::{StoreKind, StreamConfig};
use serde::{Deserialize, Serialize};

/// Settings file contents. Every field is optional.
///
/// ```yaml
/// stream:
///   cell_size: 2.0
///   load_radius: 12.0
///   shift_threshold: 5000.0
/// store:
///   kind: bounded
///   grid_extent: 512
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub stream: StreamConfig,
    pub store: StoreKind,
}

impl Settings {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_yaml::from_str(text).context("parsing settings")?;
        settings.stream.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn empty_mapping_gives_defaults() {
        let settings = Settings::from_yaml("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.store, StoreKind::Unbounded);
    }

    #[test]
    fn partial_stream_section_keeps_other_defaults() {
        let settings = Settings::from_yaml("stream:\n  load_radius: 8.0\n  sweep_stale: true\n").unwrap();
        assert_eq!(settings.stream.load_radius, 8.0);
        assert!(settings.stream.sweep_stale);
        assert_eq!(settings.stream.cell_size, StreamConfig::default().cell_size);
    }

    #[test]
    fn parses_bounded_store_and_offset() {
        let text = "stream:\n  start_offset: [1.0, 0.0, -2.5]\nstore:\n  kind: bounded\n  grid_extent: 256\n";
        let settings = Settings::from_yaml(text).unwrap();
        assert_eq!(settings.store, StoreKind::Bounded { grid_extent: 256 });
        assert_eq!(settings.stream.start_offset, DVec3::new(1.0, 0.0, -2.5));
    }

    #[test]
    fn invalid_stream_values_are_rejected() {
        assert!(Settings::from_yaml("stream:\n  cell_size: 0.0\n").is_err());
        assert!(Settings::from_yaml("stream:\n  load_radius: -1.0\n").is_err());
    }

    #[test]
    fn unknown_store_kind_is_rejected() {
        assert!(Settings::from_yaml("store:\n  kind: octree\n").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Settings::load(Path::new("/nonexistent/floatgrid.yaml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/floatgrid.yaml"));
    }
}
