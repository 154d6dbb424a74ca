//! Factors: described changes to an instruction file.
//!
//! A factor only names a change. Applying it (editing the instruction file)
//! happens inside the engine, so nothing here validates parameter names or
//! values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A change to a top-level parameter of an instruction file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopLevelParameter {
    /// Parameter name.
    pub name: String,
    /// New value, as written to the instruction file.
    pub value: String,
}

impl TopLevelParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Display name, `{name}-{value}`.
    pub fn name(&self) -> String {
        format!("{}-{}", self.name, self.value)
    }
}

/// A change to a parameter inside a named block (e.g. a PFT or stand type).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParameter {
    /// Parameter name.
    pub name: String,
    /// Block type (`pft`, `st`, ...).
    pub block_type: String,
    /// Block name (`TeBE`, `Natural`, ...).
    pub block_name: String,
    /// New value, as written to the instruction file.
    pub value: String,
}

impl BlockParameter {
    pub fn new(
        name: impl Into<String>,
        block_type: impl Into<String>,
        block_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            block_type: block_type.into(),
            block_name: block_name.into(),
            value: value.into(),
        }
    }

    /// A change to a parameter of the given PFT.
    pub fn pft(
        pft: impl Into<String>,
        parameter: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::new(parameter, "pft", pft, value)
    }

    /// Display name, `{block_name}.{name}-{value}`.
    pub fn name(&self) -> String {
        format!("{}.{}-{}", self.block_name, self.name, self.value)
    }
}

/// Several factors applied as a single unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeFactor {
    pub factors: Vec<Factor>,
}

impl CompositeFactor {
    pub fn new(factors: impl IntoIterator<Item = Factor>) -> Self {
        Self {
            factors: factors.into_iter().collect(),
        }
    }

    /// Member names joined with `_`; empty for an empty composite.
    pub fn name(&self) -> String {
        join_names(&self.factors)
    }
}

/// A described change to an instruction file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Factor {
    /// Targets a top-level key.
    TopLevel(TopLevelParameter),
    /// Targets a key inside a named block.
    Block(BlockParameter),
    /// Applies several factors together.
    Composite(CompositeFactor),
}

impl Factor {
    /// Shorthand for a top-level change.
    pub fn top_level(name: impl Into<String>, value: impl Into<String>) -> Self {
        Factor::TopLevel(TopLevelParameter::new(name, value))
    }

    /// Shorthand for a block change.
    pub fn block(
        name: impl Into<String>,
        block_type: impl Into<String>,
        block_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Factor::Block(BlockParameter::new(name, block_type, block_name, value))
    }

    /// Name used when deriving simulation names.
    pub fn name(&self) -> String {
        match self {
            Factor::TopLevel(p) => p.name(),
            Factor::Block(p) => p.name(),
            Factor::Composite(c) => c.name(),
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<TopLevelParameter> for Factor {
    fn from(p: TopLevelParameter) -> Self {
        Factor::TopLevel(p)
    }
}

impl From<BlockParameter> for Factor {
    fn from(p: BlockParameter) -> Self {
        Factor::Block(p)
    }
}

impl From<CompositeFactor> for Factor {
    fn from(c: CompositeFactor) -> Self {
        Factor::Composite(c)
    }
}

pub(crate) fn join_names(factors: &[Factor]) -> String {
    factors
        .iter()
        .map(Factor::name)
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_names() {
        assert_eq!(Factor::top_level("nyear_spinup", "500").name(), "nyear_spinup-500");
        assert_eq!(
            Factor::from(BlockParameter::pft("TeBE", "sla", "12.5")).name(),
            "TeBE.sla-12.5"
        );
    }

    #[test]
    fn test_pft_block_type() {
        let p = BlockParameter::pft("TeBE", "sla", "12.5");
        assert_eq!(p.block_type, "pft");
        assert_eq!(p.block_name, "TeBE");
        assert_eq!(p.name, "sla");
    }

    #[test]
    fn test_composite_name() {
        let composite = CompositeFactor::new([
            Factor::top_level("co2", "400"),
            Factor::block("rootdist", "st", "Natural", "0.5"),
        ]);
        assert_eq!(composite.name(), "co2-400_Natural.rootdist-0.5");
        assert_eq!(CompositeFactor::default().name(), "");
    }

    #[test]
    fn test_deserialize_tagged() {
        let factors: Vec<Factor> = serde_json::from_str(
            r#"[
                {"kind": "top_level", "name": "co2", "value": "400"},
                {"kind": "block", "name": "sla", "block_type": "pft", "block_name": "C3G", "value": "30"},
                {"kind": "composite", "factors": [{"kind": "top_level", "name": "a", "value": "1"}]}
            ]"#,
        )
        .unwrap();

        assert_eq!(factors.len(), 3);
        assert_eq!(factors[0], Factor::top_level("co2", "400"));
        assert!(matches!(factors[1], Factor::Block(_)));
        assert_eq!(factors[2].name(), "a-1");
    }
}
