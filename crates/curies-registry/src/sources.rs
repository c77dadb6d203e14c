//! Predefined registries.
//!
//! Each registry is built from an embedded snapshot on first use and shared
//! for the rest of the process. Callers get an `Arc` to the same immutable
//! converter; extending one means chaining it into a new converter.
//!
//! The snapshots are curated subsets of the upstream contexts, kept
//! mutually consistent so that `obo`, `go` and `monarch` chain without
//! conflicts.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::converter::Converter;
use crate::types::{CurieError, CurieResult};

const OBO_CONTEXT: &str = include_str!("../data/obo_context.jsonld");
const GO_CONTEXT: &str = include_str!("../data/go_context.jsonld");
const MONARCH_CONTEXT: &str = include_str!("../data/monarch_context.jsonld");
const BIOREGISTRY_EPM: &str = include_str!("../data/bioregistry.epm.json");

static OBO: OnceLock<Arc<Converter>> = OnceLock::new();
static GO: OnceLock<Arc<Converter>> = OnceLock::new();
static MONARCH: OnceLock<Arc<Converter>> = OnceLock::new();
static BIOREGISTRY: OnceLock<Arc<Converter>> = OnceLock::new();

/// A registry shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedRegistry {
    /// OBO Foundry ontologies, `PREFIX_` style PURLs.
    Obo,
    /// Gene Ontology annotation context.
    Go,
    /// Monarch Initiative context.
    Monarch,
    /// Bioregistry, with lowercase canonical prefixes and synonyms.
    Bioregistry,
}

impl PredefinedRegistry {
    /// Every predefined registry.
    pub const ALL: [Self; 4] = [Self::Obo, Self::Go, Self::Monarch, Self::Bioregistry];

    /// Returns the registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Obo => "obo",
            Self::Go => "go",
            Self::Monarch => "monarch",
            Self::Bioregistry => "bioregistry",
        }
    }

    /// Returns the shared converter, building it on first call.
    pub fn converter(self) -> CurieResult<Arc<Converter>> {
        let cell = self.cell();
        if let Some(converter) = cell.get() {
            return Ok(Arc::clone(converter));
        }

        let converter = Arc::new(self.build()?);
        info!(
            registry = self.name(),
            records = converter.len(),
            "built predefined registry"
        );
        // a concurrent builder may have won; either copy is equivalent
        Ok(Arc::clone(cell.get_or_init(|| converter)))
    }

    fn cell(self) -> &'static OnceLock<Arc<Converter>> {
        match self {
            Self::Obo => &OBO,
            Self::Go => &GO,
            Self::Monarch => &MONARCH,
            Self::Bioregistry => &BIOREGISTRY,
        }
    }

    fn build(self) -> CurieResult<Converter> {
        match self {
            Self::Obo => Converter::from_jsonld(OBO_CONTEXT),
            Self::Go => Converter::from_jsonld(GO_CONTEXT),
            Self::Monarch => Converter::from_jsonld(MONARCH_CONTEXT),
            Self::Bioregistry => Converter::from_extended_prefix_map(BIOREGISTRY_EPM),
        }
    }
}

impl fmt::Display for PredefinedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredefinedRegistry {
    type Err = CurieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|registry| registry.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                CurieError::invalid_format("registry", format!("unknown predefined registry '{s}'"))
            })
    }
}

/// OBO Foundry converter.
pub fn obo_converter() -> CurieResult<Arc<Converter>> {
    PredefinedRegistry::Obo.converter()
}

/// Gene Ontology converter.
pub fn go_converter() -> CurieResult<Arc<Converter>> {
    PredefinedRegistry::Go.converter()
}

/// Monarch Initiative converter.
pub fn monarch_converter() -> CurieResult<Arc<Converter>> {
    PredefinedRegistry::Monarch.converter()
}

/// Bioregistry converter.
pub fn bioregistry_converter() -> CurieResult<Arc<Converter>> {
    PredefinedRegistry::Bioregistry.converter()
}
