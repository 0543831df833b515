//! Weighted catalogue of callable MCP targets.
//!
//! Weights are explicit per entry and sampled through a cumulative-weight
//! index, so the traffic mix is visible in one table instead of being
//! encoded by duplicating rows.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde_json::{json, Value};
use std::fmt;

use crate::error::TendrilError;

/// Kind of MCP item a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Tool,
    Resource,
    Prompt,
}

impl TargetKind {
    /// JSON-RPC method used to invoke this kind of target.
    pub fn method(&self) -> &'static str {
        match self {
            TargetKind::Tool => "tools/call",
            TargetKind::Resource => "resources/read",
            TargetKind::Prompt => "prompts/get",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetKind::Tool => "tool",
            TargetKind::Resource => "resource",
            TargetKind::Prompt => "prompt",
        })
    }
}

/// One selectable unit of work from the synthetic catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTarget {
    pub kind: TargetKind,
    pub name: String,
    pub arguments: Value,
}

impl CallTarget {
    pub fn tool(name: &str, arguments: Value) -> Self {
        Self {
            kind: TargetKind::Tool,
            name: name.to_string(),
            arguments,
        }
    }

    pub fn resource(name: &str) -> Self {
        Self {
            kind: TargetKind::Resource,
            name: name.to_string(),
            arguments: json!({}),
        }
    }

    pub fn prompt(name: &str) -> Self {
        Self {
            kind: TargetKind::Prompt,
            name: name.to_string(),
            arguments: json!({}),
        }
    }

    /// JSON-RPC params for this target.
    ///
    /// Resources are addressed by URI; tools and prompts by name plus
    /// arguments.
    pub fn params(&self) -> Value {
        match self.kind {
            TargetKind::Resource => json!({
                "uri": format!("empower://{}", self.name),
                "name": self.name,
            }),
            TargetKind::Tool | TargetKind::Prompt => json!({
                "name": self.name,
                "arguments": self.arguments,
            }),
        }
    }
}

/// Weighted random choice over call targets. Stateless between picks.
pub struct WeightedCatalogue {
    entries: Vec<(CallTarget, u32)>,
    index: WeightedIndex<u32>,
}

impl WeightedCatalogue {
    /// Build a catalogue from explicit (target, weight) entries.
    pub fn new(entries: Vec<(CallTarget, u32)>) -> Result<Self, TendrilError> {
        let index = WeightedIndex::new(entries.iter().map(|(_, weight)| *weight))
            .map_err(|e| TendrilError::InvalidConfig(format!("bad catalogue weights: {e}")))?;
        Ok(Self { entries, index })
    }

    /// The built-in plant-shop catalogue with its production traffic mix.
    pub fn default_catalogue() -> Self {
        let entries = vec![
            (CallTarget::tool("get-products", json!({})), 4),
            (
                CallTarget::tool("get-plant-care-guide", json!({"plantName": "pothos"})),
                1,
            ),
            (
                CallTarget::tool("get-plant-care-guide", json!({"plantName": "fiddle fig"})),
                1,
            ),
            (
                CallTarget::tool(
                    "checkout",
                    json!({"items": [{"productId": 3, "quantity": 1}]}),
                ),
                2,
            ),
            (CallTarget::resource("seasonal-calendar"), 1),
            (CallTarget::resource("plant-diagnostics"), 2),
            (CallTarget::resource("plant-symptoms"), 3),
            (CallTarget::prompt("seasonal-care-guide"), 1),
            (CallTarget::prompt("plant-shopping-assistant"), 2),
            (CallTarget::prompt("new-plant-parent"), 1),
        ];
        Self::new(entries).expect("built-in catalogue weights are valid")
    }

    /// Draw one target according to the weights.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &CallTarget {
        &self.entries[self.index.sample(rng)].0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry weights, in catalogue order.
    pub fn weights(&self) -> Vec<u32> {
        self.entries.iter().map(|(_, weight)| *weight).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_method_mapping() {
        assert_eq!(TargetKind::Tool.method(), "tools/call");
        assert_eq!(TargetKind::Resource.method(), "resources/read");
        assert_eq!(TargetKind::Prompt.method(), "prompts/get");
    }

    #[test]
    fn test_resource_params_use_uri() {
        let target = CallTarget::resource("plant-symptoms");
        assert_eq!(
            target.params(),
            json!({"uri": "empower://plant-symptoms", "name": "plant-symptoms"})
        );
    }

    #[test]
    fn test_tool_params_carry_arguments() {
        let target = CallTarget::tool("get-plant-care-guide", json!({"plantName": "pothos"}));
        assert_eq!(
            target.params(),
            json!({"name": "get-plant-care-guide", "arguments": {"plantName": "pothos"}})
        );
    }

    #[test]
    fn test_default_catalogue_shape() {
        let catalogue = WeightedCatalogue::default_catalogue();
        assert_eq!(catalogue.len(), 10);
        assert_eq!(catalogue.weights(), vec![4, 1, 1, 2, 1, 2, 3, 1, 2, 1]);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        assert!(WeightedCatalogue::new(Vec::new()).is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let entries = vec![(CallTarget::resource("seasonal-calendar"), 0)];
        assert!(WeightedCatalogue::new(entries).is_err());
    }

    #[test]
    fn test_pick_respects_weights() {
        let catalogue = WeightedCatalogue::new(vec![
            (CallTarget::tool("heavy", json!({})), 9),
            (CallTarget::tool("light", json!({})), 1),
        ])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(12345);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(catalogue.pick(&mut rng).name.clone()).or_default() += 1;
        }
        let heavy = counts["heavy"];
        let light = counts["light"];
        assert!(
            heavy > light * 5,
            "expected ~9:1 split, got {heavy}:{light}"
        );
    }

    #[test]
    fn test_pick_covers_all_entries() {
        let catalogue = WeightedCatalogue::default_catalogue();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..5_000 {
            let target = catalogue.pick(&mut rng);
            seen.insert((target.kind, target.name.clone(), target.arguments.to_string()));
        }
        assert_eq!(seen.len(), catalogue.len(), "some entries never drawn");
    }
}
