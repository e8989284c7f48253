#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Catalog of named starting patterns and period verification for them.

use std::collections::BTreeMap;

use lifeline_core::{rows_to_grid, Grid, LifeError, Topology};
use lifeline_system_transition::run;

/// Named starting pattern with its expected period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    name: String,
    description: String,
    period: u64,
    grid: Grid,
}

impl Pattern {
    /// Creates a pattern from an already parsed grid.
    ///
    /// A `period` of zero marks patterns that do not return to their starting
    /// position, such as spaceships.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        period: u64,
        grid: Grid,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            period,
            grid,
        }
    }

    /// Parses a pattern from row strings of `0` and `1` characters.
    pub fn from_rows<S: AsRef<str>>(
        name: impl Into<String>,
        description: impl Into<String>,
        period: u64,
        rows: &[S],
    ) -> Result<Self, LifeError> {
        let grid = rows_to_grid(rows)?;
        Ok(Self::new(name, description, period, grid))
    }

    /// Catalog key of the pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable summary.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Number of generations after which the pattern repeats in place.
    #[must_use]
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Cells of the pattern.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// Ordered collection of patterns keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatternCatalog {
    patterns: BTreeMap<String, Pattern>,
}

impl PatternCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the catalog of built-in patterns.
    pub fn presets() -> Result<Self, LifeError> {
        let mut catalog = Self::new();
        for preset in PRESETS {
            let pattern = Pattern::from_rows(
                preset.name,
                preset.description,
                preset.period,
                preset.rows,
            )?;
            let _ = catalog.insert(pattern);
        }
        Ok(catalog)
    }

    /// Adds a pattern, returning the one previously stored under its name.
    pub fn insert(&mut self, pattern: Pattern) -> Option<Pattern> {
        self.patterns.insert(pattern.name.clone(), pattern)
    }

    /// Looks up a pattern by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(name)
    }

    /// Names of all patterns in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.patterns.keys().map(String::as_str)
    }

    /// Iterates over the stored patterns in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Pattern> + '_ {
        self.patterns.values()
    }

    /// Number of stored patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Reports whether the catalog holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Outcome of running a pattern for its declared period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodCheck {
    /// The grid matched the starting grid after `period` generations.
    Repeats {
        /// Generations that were simulated.
        period: u64,
    },
    /// The grid differed from the starting grid after `period` generations.
    Diverged {
        /// Generations that were simulated.
        period: u64,
        /// Live cells remaining in the final generation.
        population: usize,
    },
    /// The pattern declares no period, so nothing was simulated.
    Aperiodic,
}

impl PeriodCheck {
    /// Reports whether the check did not fail.
    #[must_use]
    pub const fn passed(self) -> bool {
        !matches!(self, Self::Diverged { .. })
    }
}

/// Runs `pattern` on a grid sized exactly to it and compares the result
/// against the starting generation.
#[must_use]
pub fn verify_period(pattern: &Pattern, topology: Topology) -> PeriodCheck {
    if pattern.period == 0 {
        return PeriodCheck::Aperiodic;
    }

    let last = run(&pattern.grid, topology, pattern.period);
    if last == pattern.grid {
        PeriodCheck::Repeats {
            period: pattern.period,
        }
    } else {
        PeriodCheck::Diverged {
            period: pattern.period,
            population: last.population(),
        }
    }
}

/// Verifies every pattern of the catalog, in name order.
#[must_use]
pub fn verify_catalog<'a>(
    catalog: &'a PatternCatalog,
    topology: Topology,
) -> Vec<(&'a str, PeriodCheck)> {
    catalog
        .iter()
        .map(|pattern| (pattern.name(), verify_period(pattern, topology)))
        .collect()
}

struct Preset {
    name: &'static str,
    description: &'static str,
    period: u64,
    rows: &'static [&'static str],
}

const PRESETS: &[Preset] = &[
    Preset {
        name: "block",
        description: "4x4 grid with one block.",
        period: 1,
        rows: &["0000", "0110", "0110", "0000"],
    },
    Preset {
        name: "tub",
        description: "5x5 grid with one tub.",
        period: 1,
        rows: &["00000", "00100", "01010", "00100", "00000"],
    },
    Preset {
        name: "blinker",
        description: "3x3 grid with one blinker.",
        period: 2,
        rows: &["010", "010", "010"],
    },
    Preset {
        name: "four-blinkers",
        description: "10x10 grid with four blinkers, each in phase with the one diagonally across.",
        period: 2,
        rows: &[
            "0000000000",
            "0010000000",
            "0010001110",
            "0010000000",
            "0000000000",
            "0000000000",
            "0000000100",
            "0111000100",
            "0000000100",
            "0000000000",
        ],
    },
    Preset {
        name: "pulsar",
        description: "17x17 grid with one pulsar.",
        period: 3,
        rows: &[
            "00000000000000000",
            "00000100000100000",
            "00000100000100000",
            "00000110001100000",
            "00000000000000000",
            "01110011011001110",
            "00010101010101000",
            "00000110001100000",
            "00000000000000000",
            "00000110001100000",
            "00010101010101000",
            "01110011011001110",
            "00000000000000000",
            "00000110001100000",
            "00000100000100000",
            "00000100000100000",
            "00000000000000000",
        ],
    },
    Preset {
        name: "i-column",
        description: "18x11 grid with one I-column.",
        period: 15,
        rows: &[
            "00000000000",
            "00000000000",
            "00000000000",
            "00001110000",
            "00000100000",
            "00000100000",
            "00001110000",
            "00000000000",
            "00001110000",
            "00001110000",
            "00000000000",
            "00001110000",
            "00000100000",
            "00000100000",
            "00001110000",
            "00000000000",
            "00000000000",
            "00000000000",
        ],
    },
    Preset {
        name: "glider",
        description: "5x5 grid with one glider, which travels across the grid.",
        period: 0,
        rows: &["00000", "00100", "00010", "01110", "00000"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_parse_with_documented_dimensions() {
        let catalog = PatternCatalog::presets().expect("presets parse");
        let dimensions = |name: &str| catalog.get(name).map(|pattern| pattern.grid().dimensions());

        assert_eq!(catalog.len(), 7);
        assert_eq!(dimensions("block"), Some((4, 4)));
        assert_eq!(dimensions("four-blinkers"), Some((10, 10)));
        assert_eq!(dimensions("pulsar"), Some((17, 17)));
        assert_eq!(dimensions("i-column"), Some((18, 11)));
        assert_eq!(dimensions("missing"), None);
    }

    #[test]
    fn names_are_sorted() {
        let catalog = PatternCatalog::presets().expect("presets parse");
        let names: Vec<&str> = catalog.names().collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn insert_replaces_patterns_with_the_same_name() {
        let mut catalog = PatternCatalog::new();
        let first = Pattern::from_rows("dot", "one cell", 0, &["1"]).expect("valid");
        let second = Pattern::from_rows("dot", "still one cell", 0, &["01"]).expect("valid");

        assert!(catalog.insert(first.clone()).is_none());
        assert_eq!(catalog.insert(second), Some(first));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("dot").map(Pattern::description),
            Some("still one cell")
        );
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let result = Pattern::from_rows("bad", "", 1, &["01", "0x"]);
        assert!(matches!(result, Err(LifeError::InvalidPatternFormat(_))));
    }

    #[test]
    fn zero_period_skips_simulation() {
        let glider = Pattern::from_rows("glider", "", 0, &["010", "001", "111"]).expect("valid");
        assert_eq!(verify_period(&glider, Topology::Bounded), PeriodCheck::Aperiodic);
        assert!(PeriodCheck::Aperiodic.passed());
    }

    #[test]
    fn wrong_period_is_reported_with_population() {
        let blinker = Pattern::from_rows("blinker", "", 1, &["010", "010", "010"]).expect("valid");
        let check = verify_period(&blinker, Topology::Bounded);
        assert_eq!(
            check,
            PeriodCheck::Diverged {
                period: 1,
                population: 3
            }
        );
        assert!(!check.passed());
    }
}
