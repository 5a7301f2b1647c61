//! Chart definition and loading
//!
//! A chart is either a directory containing `Chart.yaml` or a gzipped tar
//! archive whose entries live under a single `<chart>/` directory.

use flate2::read::GzDecoder;
use serde::{Deserialize, Deserializer};
use serde_yaml::{Mapping, Value};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use walkdir::WalkDir;

use crate::error::{CoreError, Result};
use crate::ignore::IgnoreRules;

/// File name of the chart metadata
pub const CHART_FILE: &str = "Chart.yaml";

/// Typed view of the `Chart.yaml` fields this tool relies on
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,

    /// Kept as a string: Helm accepts any scalar here, and overrides such as
    /// a commit hash are not SemVer.
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(serde::de::Error::custom("expected a scalar value")),
    }
}

/// A file belonging to a chart, addressed relative to the chart root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartFile {
    /// `/`-separated path relative to the chart root
    pub path: String,
    pub data: Vec<u8>,
}

/// Where a chart was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSource {
    Directory(PathBuf),
    Archive(PathBuf),
}

/// A chart held in memory
///
/// The original `Chart.yaml` document is kept so that fields this tool does
/// not model survive packaging.
#[derive(Debug, Clone)]
pub struct Chart {
    pub metadata: ChartMetadata,
    pub source: ChartSource,
    document: Mapping,
    files: Vec<ChartFile>,
}

impl Chart {
    /// Load a chart from a directory or a `.tgz` archive
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CoreError::ChartNotFound {
                path: path.display().to_string(),
            });
        }

        if path.is_dir() {
            Self::load_dir(path)
        } else {
            Self::load_archive(path)
        }
    }

    /// Load a chart from an unpacked directory
    pub fn load_dir(root: &Path) -> Result<Self> {
        let ignore = IgnoreRules::load(root)?;
        let mut chart_yaml = None;
        let mut files = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let rel = relative_path(root, entry.path());
                !ignore.ignored(&rel, entry.file_type().is_dir())
            });

        for entry in walker {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }

            let rel = relative_path(root, entry.path());
            let data = std::fs::read(entry.path())?;

            if rel == CHART_FILE {
                chart_yaml = Some(data);
            } else {
                files.push(ChartFile { path: rel, data });
            }
        }

        let chart_yaml = chart_yaml
            .ok_or_else(|| CoreError::load(root, format!("{} not found", CHART_FILE)))?;

        Self::from_parts(root, ChartSource::Directory(root.to_path_buf()), &chart_yaml, files)
    }

    /// Load a chart from a gzipped tar archive
    pub fn load_archive(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut chart_yaml = None;
        let mut files = Vec::new();

        let entries = archive
            .entries()
            .map_err(|e| CoreError::load(path, format!("not a chart archive: {}", e)))?;

        for entry in entries {
            let mut entry =
                entry.map_err(|e| CoreError::load(path, format!("corrupt archive: {}", e)))?;
            if entry.header().entry_type().is_dir() {
                continue;
            }

            let entry_path = entry.path()?.into_owned();
            let Some(rel) = strip_chart_dir(&entry_path) else {
                continue;
            };
            if rel.split('/').any(|part| part == "..") {
                return Err(CoreError::load(
                    path,
                    format!("illegal path in archive: {}", entry_path.display()),
                ));
            }

            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;

            if rel == CHART_FILE {
                chart_yaml = Some(data);
            } else {
                files.push(ChartFile { path: rel, data });
            }
        }

        let chart_yaml = chart_yaml
            .ok_or_else(|| CoreError::load(path, format!("{} not found in archive", CHART_FILE)))?;

        Self::from_parts(path, ChartSource::Archive(path.to_path_buf()), &chart_yaml, files)
    }

    fn from_parts(
        origin: &Path,
        source: ChartSource,
        chart_yaml: &[u8],
        files: Vec<ChartFile>,
    ) -> Result<Self> {
        let document = match serde_yaml::from_slice::<Value>(chart_yaml) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(_) => return Err(CoreError::load(origin, "Chart.yaml is not a mapping")),
            Err(e) => return Err(CoreError::load(origin, e.to_string())),
        };

        let metadata: ChartMetadata =
            serde_yaml::from_value(Value::Mapping(document.clone()))
                .map_err(|e| CoreError::load(origin, e.to_string()))?;

        if metadata.name.is_empty() {
            return Err(CoreError::load(origin, "chart metadata is missing 'name'"));
        }
        if metadata.version.is_empty() {
            return Err(CoreError::load(origin, "chart metadata is missing 'version'"));
        }

        Ok(Self {
            metadata,
            source,
            document,
            files,
        })
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Override the declared version. Only the in-memory copy changes.
    pub fn set_version(&mut self, version: impl Into<String>) {
        let version = version.into();
        self.document
            .insert(Value::from("version"), Value::from(version.clone()));
        self.metadata.version = version;
    }

    /// Serialized `Chart.yaml` reflecting any in-memory changes
    pub fn chart_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.document)?)
    }

    /// Chart files other than `Chart.yaml`
    pub fn files(&self) -> &[ChartFile] {
        &self.files
    }
}

/// Path of `path` relative to `root`, `/`-separated
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Drop the leading `<chart>/` directory of an archive entry
fn strip_chart_dir(path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();

    if parts.len() < 2 {
        return None;
    }
    Some(parts[1..].join("/"))
}
