//! I provide [`IdentifierIssuer`],
//! the deterministic label allocator used by the canonicalization algorithm.

use std::collections::btree_map::Entry::{Occupied, Vacant};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Issues prefixed identifiers for blank nodes, remembering every
/// assignment in the order it was made.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#issue-identifier>.
/// Cloning produces an independent copy, which is how the algorithm
/// explores speculative labelings without committing them.
#[derive(Clone, Debug)]
pub struct IdentifierIssuer {
    prefix: Box<str>,
    issued: BTreeMap<Rc<str>, Rc<str>>,
    // the counter is issued_order.len()
    issued_order: Vec<Rc<str>>,
}

impl IdentifierIssuer {
    /// Create an issuer generating `<prefix><counter>` identifiers,
    /// counting up from 0.
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Box::from(prefix),
            issued: BTreeMap::new(),
            issued_order: vec![],
        }
    }

    /// Return the identifier issued for `original`, issuing a fresh one if
    /// none was; the boolean reports whether it was newly created.
    pub fn issue(&mut self, original: &str) -> (&str, bool) {
        let key: Rc<str> = Rc::from(original);
        match self.issued.entry(key) {
            Occupied(e) => (&**e.into_mut(), false),
            Vacant(e) => {
                let counter = self.issued_order.len();
                self.issued_order.push(Rc::clone(e.key()));
                let issued = e.insert(Rc::from(format!("{}{counter}", self.prefix)));
                (&**issued, true)
            }
        }
    }

    /// Whether an identifier was issued for `original`.
    pub fn has(&self, original: &str) -> bool {
        self.issued.contains_key(original)
    }

    /// The identifier issued for `original`, if any.
    pub fn issued(&self, original: &str) -> Option<&str> {
        self.issued.get(original).map(|issued| &**issued)
    }

    /// The originals, in the order they were first issued an identifier.
    pub fn issued_order(&self) -> impl Iterator<Item = &str> {
        self.issued_order.iter().map(|original| &**original)
    }

    /// Consume the issuer, keeping only the original-to-issued mapping.
    pub fn into_issued_map(self) -> BTreeMap<Rc<str>, Rc<str>> {
        self.issued
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn issues_densely_from_zero() {
        let mut issuer = IdentifierIssuer::new("_:c14n");
        assert_eq!(issuer.issue("_:x"), ("_:c14n0", true));
        assert_eq!(issuer.issue("_:y"), ("_:c14n1", true));
        assert_eq!(issuer.issue("_:z"), ("_:c14n2", true));
    }

    #[test]
    fn issue_is_idempotent() {
        let mut issuer = IdentifierIssuer::new("_:b");
        assert_eq!(issuer.issue("_:x"), ("_:b0", true));
        assert_eq!(issuer.issue("_:y"), ("_:b1", true));
        assert_eq!(issuer.issue("_:x"), ("_:b0", false));
        assert_eq!(issuer.issue("_:y"), ("_:b1", false));
    }

    #[test]
    fn has_and_issued() {
        let mut issuer = IdentifierIssuer::new("_:b");
        issuer.issue("_:x");
        assert!(issuer.has("_:x"));
        assert!(!issuer.has("_:y"));
        assert_eq!(issuer.issued("_:x"), Some("_:b0"));
        assert_eq!(issuer.issued("_:y"), None);
    }

    #[test]
    fn issued_order_is_insertion_order() {
        let mut issuer = IdentifierIssuer::new("_:b");
        // issue in an order that differs from the sorted order of the keys
        issuer.issue("_:z");
        issuer.issue("_:a");
        issuer.issue("_:m");
        issuer.issue("_:a");
        let order: Vec<_> = issuer.issued_order().collect();
        assert_eq!(order, ["_:z", "_:a", "_:m"]);
    }

    #[test]
    fn clones_are_independent() {
        let mut issuer = IdentifierIssuer::new("_:b");
        issuer.issue("_:x");
        let mut branch = issuer.clone();
        branch.issue("_:y");
        assert!(branch.has("_:y"));
        assert!(!issuer.has("_:y"));
        // the original keeps issuing from its own counter
        assert_eq!(issuer.issue("_:w"), ("_:b1", true));
    }
}
