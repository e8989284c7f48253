use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use lifeline_core::Topology;
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

const DEFAULT_ROWS: u32 = 24;
const DEFAULT_COLUMNS: u32 = 40;

/// Fully resolved parameters of a headless run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunSettings {
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) topology: Topology,
    pub(crate) padding: u32,
    pub(crate) pattern: Option<String>,
    pub(crate) seed: Option<u64>,
    pub(crate) steps: u64,
    pub(crate) rewind: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            topology: Topology::Toroidal,
            padding: 0,
            pattern: None,
            seed: None,
            steps: 0,
            rewind: 0,
        }
    }
}

impl RunSettings {
    /// Overlays every value present in `overrides` onto the current settings.
    pub(crate) fn merge(&mut self, overrides: RunOverrides) {
        let RunOverrides {
            rows,
            columns,
            topology,
            padding,
            pattern,
            seed,
            steps,
            rewind,
        } = overrides;

        if let Some(rows) = rows {
            self.rows = rows;
        }
        if let Some(columns) = columns {
            self.columns = columns;
        }
        if let Some(topology) = topology {
            self.topology = topology;
        }
        if let Some(padding) = padding {
            self.padding = padding;
        }
        if pattern.is_some() {
            self.pattern = pattern;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(steps) = steps {
            self.steps = steps;
        }
        if let Some(rewind) = rewind {
            self.rewind = rewind;
        }
    }
}

/// Optional run parameters, as read from a config file or the command line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RunOverrides {
    #[serde(default)]
    pub(crate) rows: Option<u32>,
    #[serde(default)]
    pub(crate) columns: Option<u32>,
    #[serde(default)]
    pub(crate) topology: Option<Topology>,
    #[serde(default)]
    pub(crate) padding: Option<u32>,
    #[serde(default)]
    pub(crate) pattern: Option<String>,
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default)]
    pub(crate) steps: Option<u64>,
    #[serde(default)]
    pub(crate) rewind: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    version: u32,
    #[serde(default)]
    simulation: RunOverrides,
}

/// Reads run parameters from the TOML file at `path`.
pub(crate) fn load(path: &Path) -> Result<RunOverrides> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read run configuration at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid run configuration in {}", path.display()))
}

fn parse(contents: &str) -> Result<RunOverrides> {
    let file: ConfigFile =
        toml::from_str(contents).context("failed to parse run configuration toml contents")?;
    if file.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported run configuration version {}; expected {}",
            file.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(file.simulation)
}
