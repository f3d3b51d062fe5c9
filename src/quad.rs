//! I define [`Quad`], the four-position statement type consumed by the
//! canonicalizer, and the position constraints it must satisfy.

use crate::term::{Term, RDF_LANG_STRING};
use crate::C14nError;

/// An RDF quad: a triple optionally qualified by a named graph.
///
/// Position constraints (checked by [`Quad::validate`]):
/// the subject is a named node or blank node,
/// the predicate a named node,
/// the object a named node, blank node or literal,
/// the graph a named node, blank node or [`Term::DefaultGraph`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    /// The subject of this quad
    pub subject: Term,
    /// The predicate of this quad
    pub predicate: Term,
    /// The object of this quad
    pub object: Term,
    /// The graph name of this quad; [`Term::DefaultGraph`] for the default graph
    pub graph: Term,
}

/// A dataset is an unordered multiset of quads.
///
/// Canonicalization treats it as a set: duplicate quads are dropped at
/// ingestion and appear once in the output.
pub type Dataset = Vec<Quad>;

impl Quad {
    /// Build a quad from its four components.
    pub fn new(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Check the position constraints and literal well-formedness.
    pub fn validate(&self) -> Result<(), C14nError> {
        match &self.subject {
            Term::NamedNode(_) | Term::BlankNode(_) => {}
            t => return Err(invalid(t, "subject")),
        }
        match &self.predicate {
            Term::NamedNode(_) => {}
            t => return Err(invalid(t, "predicate")),
        }
        match &self.object {
            Term::NamedNode(_) | Term::BlankNode(_) => {}
            Term::Literal {
                datatype, language, ..
            } => validate_literal(datatype.as_deref(), language.as_deref())?,
            t => return Err(invalid(t, "object")),
        }
        match &self.graph {
            Term::NamedNode(_) | Term::BlankNode(_) | Term::DefaultGraph => {}
            t => return Err(invalid(t, "graph")),
        }
        Ok(())
    }
}

fn invalid(term: &Term, position: &'static str) -> C14nError {
    C14nError::InvalidTermPosition {
        kind: term.kind(),
        position,
    }
}

fn validate_literal(datatype: Option<&str>, language: Option<&str>) -> Result<(), C14nError> {
    if datatype == Some("") {
        return Err(C14nError::MalformedLiteral("empty datatype IRI".into()));
    }
    match language {
        None => Ok(()),
        Some("") => Err(C14nError::MalformedLiteral("empty language tag".into())),
        Some(tag) if datatype != Some(RDF_LANG_STRING) => Err(C14nError::MalformedLiteral(
            format!("language tag {tag:?} on a literal whose datatype is not rdf:langString"),
        )),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::term::XSD_STRING;

    fn iri(v: &str) -> Term {
        Term::NamedNode(v.to_string())
    }

    fn spo(subject: Term, predicate: Term, object: Term) -> Quad {
        Quad::new(subject, predicate, object, Term::DefaultGraph)
    }

    #[test]
    fn well_formed() {
        let quads = [
            spo(iri("tag:s"), iri("tag:p"), iri("tag:o")),
            spo(
                Term::BlankNode("_:b0".into()),
                iri("tag:p"),
                Term::Literal {
                    value: "v".into(),
                    datatype: None,
                    language: None,
                },
            ),
            Quad::new(
                iri("tag:s"),
                iri("tag:p"),
                Term::Literal {
                    value: "v".into(),
                    datatype: Some(XSD_STRING.into()),
                    language: None,
                },
                Term::BlankNode("_:g".into()),
            ),
            Quad::new(
                iri("tag:s"),
                iri("tag:p"),
                Term::Literal {
                    value: "hi".into(),
                    datatype: Some(RDF_LANG_STRING.into()),
                    language: Some("en".into()),
                },
                iri("tag:g"),
            ),
        ];
        for quad in &quads {
            assert!(quad.validate().is_ok(), "{quad:?}");
        }
    }

    #[test]
    fn literal_as_subject() {
        let quad = spo(
            Term::Literal {
                value: "v".into(),
                datatype: None,
                language: None,
            },
            iri("tag:p"),
            iri("tag:o"),
        );
        assert!(matches!(
            quad.validate(),
            Err(C14nError::InvalidTermPosition {
                kind: "literal",
                position: "subject"
            })
        ));
    }

    #[test]
    fn blank_node_as_predicate() {
        let quad = spo(iri("tag:s"), Term::BlankNode("_:p".into()), iri("tag:o"));
        assert!(matches!(
            quad.validate(),
            Err(C14nError::InvalidTermPosition {
                kind: "blank node",
                position: "predicate"
            })
        ));
    }

    #[test]
    fn literal_as_graph() {
        let quad = Quad::new(
            iri("tag:s"),
            iri("tag:p"),
            iri("tag:o"),
            Term::Literal {
                value: "g".into(),
                datatype: None,
                language: None,
            },
        );
        assert!(matches!(
            quad.validate(),
            Err(C14nError::InvalidTermPosition {
                kind: "literal",
                position: "graph"
            })
        ));
    }

    #[test]
    fn default_graph_as_object() {
        let quad = spo(iri("tag:s"), iri("tag:p"), Term::DefaultGraph);
        assert!(matches!(
            quad.validate(),
            Err(C14nError::InvalidTermPosition {
                kind: "default graph",
                position: "object"
            })
        ));
    }

    #[test]
    fn language_tag_without_lang_string() {
        let quad = spo(
            iri("tag:s"),
            iri("tag:p"),
            Term::Literal {
                value: "hi".into(),
                datatype: Some(XSD_STRING.into()),
                language: Some("en".into()),
            },
        );
        assert!(matches!(
            quad.validate(),
            Err(C14nError::MalformedLiteral(_))
        ));
    }

    #[test]
    fn empty_datatype() {
        let quad = spo(
            iri("tag:s"),
            iri("tag:p"),
            Term::Literal {
                value: "v".into(),
                datatype: Some(String::new()),
                language: None,
            },
        );
        assert!(matches!(
            quad.validate(),
            Err(C14nError::MalformedLiteral(_))
        ));
    }
}
