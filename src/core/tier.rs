use crate::domain::model::Tier;
use crate::domain::ports::NodeLookup;
use crate::utils::error::Result;

/// Computes the tier of a node from its declared supplier.
///
/// No supplier means a root supplier (tier 0). Otherwise the supplier's own
/// supplier decides between tier 1 and tier 2. Chains are never followed past
/// the second hop, so deeper or cyclic chains still come out as tier 2.
/// An unknown supplier name is reported as `NotFound` and no tier is produced.
pub fn classify<L: NodeLookup + ?Sized>(lookup: &L, supplier: Option<&str>) -> Result<Tier> {
    let Some(name) = supplier else {
        return Ok(Tier::Zero);
    };

    match lookup.supplier_of(name)? {
        None => Ok(Tier::One),
        Some(_) => Ok(Tier::Two),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NodeId;
    use crate::utils::error::TradeError;
    use std::cell::Cell;
    use std::collections::HashMap;

    struct FakeNetwork {
        suppliers: HashMap<&'static str, Option<NodeId>>,
        lookups: Cell<usize>,
    }

    impl FakeNetwork {
        fn new(entries: &[(&'static str, Option<NodeId>)]) -> Self {
            Self {
                suppliers: entries.iter().copied().collect(),
                lookups: Cell::new(0),
            }
        }
    }

    impl NodeLookup for FakeNetwork {
        fn supplier_of(&self, name: &str) -> Result<Option<NodeId>> {
            self.lookups.set(self.lookups.get() + 1);
            self.suppliers
                .get(name)
                .copied()
                .ok_or_else(|| TradeError::not_found("node", name))
        }
    }

    #[test]
    fn test_no_supplier_is_root() {
        let network = FakeNetwork::new(&[]);
        assert_eq!(classify(&network, None).unwrap(), Tier::Zero);
        assert_eq!(network.lookups.get(), 0);
    }

    #[test]
    fn test_supplier_without_supplier_is_tier_one() {
        let network = FakeNetwork::new(&[("Acme", None)]);
        assert_eq!(classify(&network, Some("Acme")).unwrap(), Tier::One);
    }

    #[test]
    fn test_supplier_with_supplier_is_tier_two() {
        let network = FakeNetwork::new(&[("RootCo", None), ("Acme", Some(1))]);
        assert_eq!(classify(&network, Some("Acme")).unwrap(), Tier::Two);
    }

    #[test]
    fn test_deep_chain_is_capped_at_tier_two() {
        // Retail -> Acme -> RootCo; buying from Retail would be a fourth level
        let network = FakeNetwork::new(&[("RootCo", None), ("Acme", Some(1)), ("Retail", Some(2))]);
        assert_eq!(classify(&network, Some("Retail")).unwrap(), Tier::Two);
        assert_eq!(network.lookups.get(), 1);
    }

    #[test]
    fn test_unknown_supplier_is_not_found() {
        let network = FakeNetwork::new(&[("Acme", None)]);
        let err = classify(&network, Some("Ghost")).unwrap_err();
        assert!(matches!(err, TradeError::NotFound { .. }));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let network = FakeNetwork::new(&[("RootCo", None), ("Acme", Some(1))]);
        let first = classify(&network, Some("Acme")).unwrap();
        let second = classify(&network, Some("Acme")).unwrap();
        assert_eq!(first, second);
    }
}
