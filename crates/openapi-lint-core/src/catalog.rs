//! Rule selection for one run.

use crate::config::Config;
use crate::metadata::RunMetadata;
use crate::model::{FieldId, NodeKind};
use crate::rule::{Rule, RuleBox, RuleTarget};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

/// Keeps the rules that apply to a run's flavor and pass.
///
/// A rule with the default flavor always passes the flavor check; any other
/// rule needs a flavor overlapping the run's. The pass must match exactly.
#[must_use]
pub fn filter_rules<'r>(rules: &'r [RuleBox], metadata: &RunMetadata) -> Vec<&'r dyn Rule> {
    rules
        .iter()
        .map(|rule| &**rule)
        .filter(|rule| {
            rule.flavor().applies_to(metadata.flavor) && rule.pass_mode() == metadata.pass_mode
        })
        .collect()
}

/// A collection rule threaded down from the field that declared it.
#[derive(Clone, Copy)]
pub struct CollectionRule<'r> {
    /// The rule.
    pub rule: &'r dyn Rule,
    /// Kind of collection member the rule runs on.
    pub kind: NodeKind,
}

/// Filtered rules indexed by where they run.
///
/// Built once per run. Lookups preserve catalog order.
#[derive(Default)]
pub struct ResolvedCatalog<'r> {
    by_kind: HashMap<NodeKind, Vec<&'r dyn Rule>>,
    by_field: HashMap<FieldId, Vec<&'r dyn Rule>>,
    collections: HashMap<FieldId, Rc<[CollectionRule<'r>]>>,
    len: usize,
}

impl<'r> ResolvedCatalog<'r> {
    /// Filters `rules` for `metadata`, drops rules disabled in `config`, and indexes the rest.
    #[must_use]
    pub fn resolve(rules: &'r [RuleBox], metadata: &RunMetadata, config: &Config) -> Self {
        let mut catalog = Self::default();
        let mut collections: HashMap<FieldId, Vec<CollectionRule<'r>>> = HashMap::new();

        for rule in filter_rules(rules, metadata) {
            if !config.is_rule_enabled(rule.id(), rule.name()) {
                debug!("Skipping disabled rule: {} {}", rule.id(), rule.name());
                continue;
            }
            catalog.len += 1;
            match rule.target() {
                RuleTarget::Kind(kinds) => {
                    for kind in kinds {
                        catalog.by_kind.entry(*kind).or_default().push(rule);
                    }
                }
                RuleTarget::Field(fields) => {
                    for field in fields {
                        catalog.by_field.entry(*field).or_default().push(rule);
                    }
                }
                RuleTarget::Collection { fields, kind } => {
                    for field in fields {
                        collections
                            .entry(*field)
                            .or_default()
                            .push(CollectionRule { rule, kind });
                    }
                }
            }
        }
        catalog.collections = collections
            .into_iter()
            .map(|(field, rules)| (field, Rc::from(rules)))
            .collect();

        debug!(
            "Resolved {} of {} rules for {}",
            catalog.len,
            rules.len(),
            metadata
        );
        catalog
    }

    /// Rules for nodes of `kind`.
    #[must_use]
    pub fn kind_rules(&self, kind: NodeKind) -> &[&'r dyn Rule] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rules for the value of `field`.
    #[must_use]
    pub fn field_rules(&self, field: FieldId) -> &[&'r dyn Rule] {
        self.by_field.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Collection rules declared by `field`.
    #[must_use]
    pub fn collection_rules(&self, field: FieldId) -> Option<Rc<[CollectionRule<'r>]>> {
        self.collections.get(&field).cloned()
    }

    /// Number of rules that survived filtering.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no rule applies to this run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Flavor, PassMode};

    struct Tagged {
        id: &'static str,
        flavor: Flavor,
        pass: PassMode,
        target: RuleTarget,
    }

    impl Rule for Tagged {
        fn id(&self) -> &'static str {
            self.id
        }
        fn name(&self) -> &'static str {
            self.id
        }
        fn target(&self) -> RuleTarget {
            self.target
        }
        fn flavor(&self) -> Flavor {
            self.flavor
        }
        fn pass_mode(&self) -> PassMode {
            self.pass
        }
        fn message_template(&self) -> &'static str {
            ""
        }
    }

    fn tagged(id: &'static str, flavor: Flavor, pass: PassMode) -> RuleBox {
        Box::new(Tagged {
            id,
            flavor,
            pass,
            target: RuleTarget::Kind(&[NodeKind::Schema]),
        })
    }

    fn ids(rules: &[&dyn Rule]) -> Vec<&'static str> {
        rules.iter().map(|r| r.id()).collect()
    }

    fn catalog() -> Vec<RuleBox> {
        vec![
            tagged("default", Flavor::DEFAULT, PassMode::Individual),
            tagged("arm", Flavor::ARM, PassMode::Individual),
            tagged("both", Flavor::ARM | Flavor::DATA_PLANE, PassMode::Individual),
            tagged("composed", Flavor::DEFAULT, PassMode::Composed),
        ]
    }

    #[test]
    fn flavor_filter_honors_default_and_overlap() {
        let rules = catalog();
        let data_plane = RunMetadata::new(Flavor::DATA_PLANE, PassMode::Individual);
        assert_eq!(ids(&filter_rules(&rules, &data_plane)), ["default", "both"]);

        let combined = RunMetadata::new(Flavor::ARM | Flavor::DATA_PLANE, PassMode::Individual);
        assert_eq!(ids(&filter_rules(&rules, &combined)), ["default", "arm", "both"]);
    }

    #[test]
    fn pass_filter_is_exact() {
        let rules = catalog();
        let composed = RunMetadata::new(Flavor::ARM, PassMode::Composed);
        assert_eq!(ids(&filter_rules(&rules, &composed)), ["composed"]);
    }

    #[test]
    fn resolve_indexes_and_drops_disabled() {
        let mut rules = catalog();
        rules.push(Box::new(Tagged {
            id: "collection",
            flavor: Flavor::DEFAULT,
            pass: PassMode::Individual,
            target: RuleTarget::Collection {
                fields: &[FieldId::DOCUMENT_PATHS],
                kind: NodeKind::PathItem,
            },
        }));
        let config = Config::parse("[rules.arm]\nenabled = false\n").unwrap();
        let meta = RunMetadata::new(Flavor::ARM, PassMode::Individual);

        let resolved = ResolvedCatalog::resolve(&rules, &meta, &config);
        assert_eq!(resolved.len(), 3);
        assert_eq!(ids(resolved.kind_rules(NodeKind::Schema)), ["default", "both"]);
        assert!(resolved.kind_rules(NodeKind::Operation).is_empty());

        let collection = resolved.collection_rules(FieldId::DOCUMENT_PATHS).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection[0].kind, NodeKind::PathItem);
        assert!(resolved.collection_rules(FieldId::DOCUMENT_DEFINITIONS).is_none());
    }
}
