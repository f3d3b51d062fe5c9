//! This crate canonicalizes [RDF] datasets with the URDNA2015 algorithm,
//! published as [RDF dataset canonicalization]:
//! every blank node is assigned a stable `_:c14n<N>` label derived from the
//! structure of the dataset, and the whole dataset is serialized to sorted
//! canonical [N-Quads].
//!
//! Two datasets that are isomorphic (equal up to blank node relabelling)
//! produce byte-identical output, which makes the canonical form suitable
//! for hashing, signing and diffing linked data.
//!
//! The entry points are [`canonicalize`] (canonical N-Quads text) and
//! [`relabel`] (relabelled quads plus the original-to-canonical label map).
//!
//! [RDF]: https://www.w3.org/TR/rdf11-primer/
//! [RDF dataset canonicalization]: https://www.w3.org/TR/rdf-canon/
//! [N-Quads]: https://www.w3.org/TR/n-quads/

mod _permutations;
pub mod digest;
pub mod issuer;
pub mod nquads;
pub mod quad;
pub mod term;
pub mod urdna2015;

pub use quad::{Dataset, Quad};
pub use term::Term;
pub use urdna2015::{canonicalize, relabel, C14nIdMap, C14nOptions};

/// The errors that canonicalization can raise.
///
/// They all abort the computation; there is no partial output.
#[derive(Clone, Debug, thiserror::Error)]
pub enum C14nError {
    /// The requested hash algorithm is not implemented
    #[error("unsupported hash algorithm {0:?}")]
    UnsupportedAlgorithm(String),
    /// A term occurs in a position that its kind forbids
    #[error("a {kind} is not allowed in the {position} position")]
    InvalidTermPosition {
        /// The kind of the offending term
        kind: &'static str,
        /// The position in which it occurred
        position: &'static str,
    },
    /// A literal violates the constraints on datatype and language tag
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),
    /// A configured bound was reached while hashing n-degree quads
    #[error("recursion limit exceeded: {0}")]
    RecursionLimitExceeded(String),
    /// A blank node was never assigned a canonical identifier
    #[error("no canonical identifier was issued for {0:?}")]
    UnlabeledBlankNode(String),
}

#[cfg(test)]
pub(crate) fn test_setup() {
    let _ = env_logger::builder().is_test(true).try_init();
}
