//! Terrain configuration files
//!
//! A terrain is persisted as one TOML document: the settings block, the
//! ordered zone list, and name-to-path maps for the height images and
//! color textures zones reference. Image pixels are never stored in the
//! file; `build` decodes them from the referenced paths.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use terra_core::{Result, TerraError};
use terra_field::{ColorTexture, HeightImage, ZoneList};

use crate::terrain::{Terrain, TerrainSettings};

/// On-disk terrain description
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainConfig {
    #[serde(default)]
    pub settings: TerrainSettings,
    #[serde(default)]
    pub zones: ZoneList,
    /// Height image name -> file path. BTreeMap keeps the serialized
    /// file stable across saves.
    #[serde(default)]
    pub images: BTreeMap<String, PathBuf>,
    /// Color texture name -> file path
    #[serde(default)]
    pub textures: BTreeMap<String, PathBuf>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            settings: TerrainSettings::default(),
            zones: ZoneList::new(),
            images: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }
}

impl TerrainConfig {
    /// Load a terrain config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse a terrain config from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TerraError::TomlParseError(e.to_string()))
    }

    /// Serialize to pretty TOML text
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TerraError::TomlSerError(e.to_string()))
    }

    /// Write the config to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml()?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Build a terrain from this config, decoding every referenced image.
    /// Paths are resolved relative to `base_dir` so a config file can
    /// travel with its assets.
    pub fn build(&self, base_dir: &Path) -> Result<Terrain> {
        let mut terrain = Terrain::new(self.settings.clone());
        *terrain.zones_mut() = self.zones.clone();

        for (name, path) in &self.images {
            let full = base_dir.join(path);
            let image = HeightImage::open(&full)?;
            info!(image = %name, path = %full.display(), "loaded height image");
            terrain.resources_mut().insert_image(name.as_str(), image);
        }
        for (name, path) in &self.textures {
            let full = base_dir.join(path);
            let texture = ColorTexture::open(&full)?;
            info!(texture = %name, path = %full.display(), "loaded color texture");
            terrain.resources_mut().insert_texture(name.as_str(), texture);
        }

        Ok(terrain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_field::Zone;

    #[test]
    fn default_config_round_trips() {
        let config = TerrainConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = TerrainConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.settings.max_level, config.settings.max_level);
        assert!(parsed.zones.is_empty());
    }

    #[test]
    fn zones_survive_serialization() {
        let mut config = TerrainConfig::default();
        config.zones.add(Zone::noise("base", 2.0, 8.0));
        config.zones.add(Zone::new("flats"));

        let text = config.to_toml().unwrap();
        let parsed = TerrainConfig::from_toml(&text).unwrap();

        assert_eq!(parsed.zones.len(), 2);
        let base = parsed.zones.get(0).unwrap();
        assert_eq!(base.name, "base");
        assert!(base.use_noise);
        assert_eq!(base.noise_height, 8.0);
        assert_eq!(parsed.zones.active_index(), Some(1));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let parsed = TerrainConfig::from_toml("").unwrap();
        assert_eq!(parsed.settings.max_level, 4);
        assert!(parsed.images.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = TerrainConfig::from_toml("settings = gibberish").unwrap_err();
        assert!(matches!(err, TerraError::TomlParseError(_)));
    }

    #[test]
    fn build_applies_zones() {
        let mut config = TerrainConfig::default();
        config.settings.width = 40.0;
        config.settings.max_level = 2;
        config.settings.chunk_size = 10.0;
        config.zones.add(Zone::noise("base", 1.0, 3.0));

        let terrain = config.build(Path::new(".")).unwrap();
        assert_eq!(terrain.zones().len(), 1);
        let h = terrain.height_at(5.0, 5.0);
        assert!((-3.0..=3.0).contains(&h));
    }
}
