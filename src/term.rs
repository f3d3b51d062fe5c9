//! I define the term model used by the canonicalizer:
//! a single tagged [`Term`] type covering the four kinds of RDF term
//! that can occur in a quad.

/// The IRI identifying the `xsd:string` datatype.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// The IRI identifying the `rdf:langString` datatype.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// An RDF term.
///
/// Blank node identifiers carry their `_:` prefix (e.g. `_:b0`)
/// and are scoped to the dataset they appear in.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    /// An IRI
    NamedNode(String),
    /// A blank node, identified by its `_:`-prefixed local identifier
    BlankNode(String),
    /// A literal; `datatype` is `None` for plain literals,
    /// and `language` is only present for `rdf:langString` literals
    Literal {
        /// The lexical form
        value: String,
        /// The datatype IRI, if any
        datatype: Option<String>,
        /// The language tag, if any
        language: Option<String>,
    },
    /// The default graph; only valid in the graph position
    DefaultGraph,
}

impl Term {
    /// The IRI of this term, if it is a named node.
    pub fn iri(&self) -> Option<&str> {
        match self {
            Term::NamedNode(iri) => Some(iri),
            _ => None,
        }
    }

    /// The `_:`-prefixed identifier of this term, if it is a blank node.
    pub fn bnode_id(&self) -> Option<&str> {
        match self {
            Term::BlankNode(id) => Some(id),
            _ => None,
        }
    }

    /// Whether this term is a blank node.
    pub const fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// A human-readable name for the kind of this term, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Term::NamedNode(_) => "named node",
            Term::BlankNode(_) => "blank node",
            Term::Literal { .. } => "literal",
            Term::DefaultGraph => "default graph",
        }
    }
}
