use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from reading an explicit config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk TOML configuration.
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub extraction: Option<ExtractionConfig>,
    pub discovery: Option<DiscoveryConfig>,
    pub dictionaries: Option<DictionariesConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub min_content_chars: Option<usize>,
    pub ocr_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    pub enabled: Option<bool>,
    pub min_text_chars: Option<usize>,
    pub min_paragraph_chars: Option<usize>,
    pub min_paragraphs: Option<usize>,
    pub clustering: Option<bool>,
    pub entities: Option<bool>,
    pub topics: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DictionariesConfig {
    pub extra_skills: Option<Vec<String>>,
    pub extra_industries: Option<Vec<String>>,
    pub extra_job_titles: Option<Vec<String>>,
    /// Restrict `City, ST` locations to these region codes.
    pub region_codes: Option<Vec<String>>,
}

impl ConfigFile {
    /// Whether a discovery capability toggle is on. Missing means on.
    pub fn discovery_toggle(&self, pick: impl Fn(&DiscoveryConfig) -> Option<bool>) -> bool {
        self.discovery.as_ref().and_then(pick).unwrap_or(true)
    }
}

/// Platform config directory path: `<config_dir>/resume-parser/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("resume-parser").join("config.toml"))
}

/// Load config by cascading CWD `.resume-parser.toml` over the platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".resume-parser.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a path. Returns `None` if the file doesn't exist or
/// can't be parsed; parse failures are logged.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    match read_config(path) {
        Ok(config) => Some(config),
        Err(ConfigError::Read { .. }) => None,
        Err(e) => {
            tracing::warn!("ignoring config file: {e}");
            None
        }
    }
}

/// Strict variant of [`load_from_path`] for a path the user named explicitly.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn pick<S, T: Clone>(overlay: &Option<S>, base: &Option<S>, get: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&get)
        .or_else(|| base.as_ref().and_then(&get))
}

/// Merge two configs: `overlay` values take precedence over `base`, field by field.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (be, oe) = (&base.extraction, &overlay.extraction);
    let (bd, od) = (&base.discovery, &overlay.discovery);
    let (bx, ox) = (&base.dictionaries, &overlay.dictionaries);

    ConfigFile {
        extraction: Some(ExtractionConfig {
            min_content_chars: pick(oe, be, |e| e.min_content_chars),
            ocr_enabled: pick(oe, be, |e| e.ocr_enabled),
        }),
        discovery: Some(DiscoveryConfig {
            enabled: pick(od, bd, |d| d.enabled),
            min_text_chars: pick(od, bd, |d| d.min_text_chars),
            min_paragraph_chars: pick(od, bd, |d| d.min_paragraph_chars),
            min_paragraphs: pick(od, bd, |d| d.min_paragraphs),
            clustering: pick(od, bd, |d| d.clustering),
            entities: pick(od, bd, |d| d.entities),
            topics: pick(od, bd, |d| d.topics),
        }),
        dictionaries: Some(DictionariesConfig {
            extra_skills: pick(ox, bx, |x| x.extra_skills.clone()),
            extra_industries: pick(ox, bx, |x| x.extra_industries.clone()),
            extra_job_titles: pick(ox, bx, |x| x.extra_job_titles.clone()),
            region_codes: pick(ox, bx, |x| x.region_codes.clone()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_parses() {
        let toml_str = "[extraction]\nmin_content_chars = 150\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let extraction = parsed.extraction.unwrap();
        assert_eq!(extraction.min_content_chars, Some(150));
        assert!(extraction.ocr_enabled.is_none());
        assert!(parsed.discovery.is_none());
    }

    #[test]
    fn test_region_codes_parse() {
        let toml_str = "[dictionaries]\nregion_codes = [\"DE\", \"AU\"]\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(
            parsed.dictionaries.unwrap().region_codes,
            Some(vec!["DE".to_string(), "AU".to_string()])
        );
    }

    #[test]
    fn test_merge_overlay_wins_field_by_field() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                min_content_chars: Some(80),
                ocr_enabled: Some(false),
            }),
            dictionaries: Some(DictionariesConfig {
                extra_skills: Some(vec!["Haskell".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            extraction: Some(ExtractionConfig {
                min_content_chars: Some(120),
                ocr_enabled: None,
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        let extraction = merged.extraction.unwrap();
        assert_eq!(extraction.min_content_chars, Some(120));
        assert_eq!(extraction.ocr_enabled, Some(false));
        assert_eq!(
            merged.dictionaries.unwrap().extra_skills,
            Some(vec!["Haskell".to_string()])
        );
    }

    #[test]
    fn test_discovery_toggle_defaults_on() {
        let config = ConfigFile::default();
        assert!(config.discovery_toggle(|d| d.clustering));

        let config = ConfigFile {
            discovery: Some(DiscoveryConfig {
                topics: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!config.discovery_toggle(|d| d.topics));
        assert!(config.discovery_toggle(|d| d.entities));
    }

    #[test]
    fn test_read_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[extraction\nmin_content_chars = ").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::Parse { .. })));
        assert!(load_from_path(&path).is_none());
        assert!(load_from_path(&dir.path().join("missing.toml")).is_none());
    }
}
