use std::path::{Path, PathBuf};

use url::{Position, Url};

use super::{Config, ConfigError, FILES_GROUP, URL_GROUPS};
use crate::cloud::{DEFAULT_ARCH, ExtractOptions};

const JSON_URL_KEY: &str = "ubuntu_json_url";
const BASE_URL_KEY: &str = "ubuntu_base_url";
const METADATA_URL_KEY: &str = "ubuntu_metadata_url";
const OUTPUT_FILE_KEY: &str = "output_file";
const FILTER_GROUP: &str = "filter";
const ARCH_KEY: &str = "arch";

/// Simplestreams index files live under `<mirror root>/streams/v1/`.
const STREAMS_MARKER: &str = "streams/v1/";

/// Typed values resolved from a validated [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    metadata_url: String,
    base_url: String,
    output_file: PathBuf,
    arch: String,
}

impl Settings {
    /// Resolve the catalogue URL, the base for image paths, the output file
    /// and the target architecture.
    ///
    /// `ubuntu_json_url` takes precedence over `ubuntu_base_url` +
    /// `ubuntu_metadata_url` for the catalogue URL. Without `ubuntu_base_url`
    /// the image base is the mirror root of the catalogue URL.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let url_group = URL_GROUPS
            .iter()
            .copied()
            .find(|group| config.contains_key(*group))
            .ok_or_else(|| missing(URL_GROUPS[0], JSON_URL_KEY))?;

        let json_url = string_at(config, url_group, JSON_URL_KEY)?;
        let base_url = string_at(config, url_group, BASE_URL_KEY)?;
        let metadata_path = string_at(config, url_group, METADATA_URL_KEY)?;

        let metadata_url = match (json_url, base_url, metadata_path) {
            (Some(json_url), _, _) => json_url.to_string(),
            (None, Some(base_url), Some(metadata_path)) => format!("{base_url}{metadata_path}"),
            (None, Some(_), None) => return Err(missing(url_group, METADATA_URL_KEY)),
            (None, None, _) => return Err(missing(url_group, JSON_URL_KEY)),
        };

        let metadata_key = if json_url.is_some() {
            JSON_URL_KEY
        } else {
            METADATA_URL_KEY
        };
        let parsed = parse_url(url_group, metadata_key, &metadata_url)?;

        let base_url = match base_url {
            Some(base_url) => {
                parse_url(url_group, BASE_URL_KEY, base_url)?;
                base_url.to_string()
            }
            None => mirror_root(&parsed),
        };

        let output_file = string_at(config, FILES_GROUP, OUTPUT_FILE_KEY)?
            .ok_or_else(|| missing(FILES_GROUP, OUTPUT_FILE_KEY))?;

        let arch = string_at(config, FILTER_GROUP, ARCH_KEY)?.unwrap_or(DEFAULT_ARCH);

        Ok(Self {
            metadata_url,
            base_url,
            output_file: PathBuf::from(output_file),
            arch: arch.to_string(),
        })
    }

    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new(&self.arch).with_base_url(&self.base_url)
    }
}

fn missing(group: &str, key: &str) -> ConfigError {
    ConfigError::MissingKey {
        key: format!("{group}.{key}"),
    }
}

/// Optional string at `[group] key`. An absent group reads as absent keys.
fn string_at<'a>(config: &'a Config, group: &str, key: &str) -> Result<Option<&'a str>, ConfigError> {
    let Some(section) = config.get(group) else {
        return Ok(None);
    };
    let table = section.as_table().ok_or_else(|| ConfigError::InvalidValue {
        key: group.to_string(),
        expected: "a table",
    })?;

    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: format!("{group}.{key}"),
                expected: "a string",
            }),
    }
}

fn parse_url(group: &str, key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        key: format!("{group}.{key}"),
        value: value.to_string(),
        source,
    })
}

fn mirror_root(url: &Url) -> String {
    let full = url.as_str();
    match full.find(STREAMS_MARKER) {
        Some(idx) => full[..idx].to_string(),
        None => url[..Position::BeforePath].to_string(),
    }
}
