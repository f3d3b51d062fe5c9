//! Canonical N-Quads serialization.
//!
//! Terms are rendered to their canonical textual form, quads to a single
//! ` .\n`-terminated line, and datasets to the bytewise-sorted
//! concatenation of their quad lines.

use crate::quad::Quad;
use crate::term::{Term, RDF_LANG_STRING, XSD_STRING};
use crate::C14nError;

/// Serialize `quads` in canonical N-Quads.
///
/// Each quad is validated, rendered to its line, then the lines are sorted
/// in codepoint order and concatenated; duplicate quads are emitted once.
pub fn serialize(quads: &[Quad]) -> Result<String, C14nError> {
    let mut lines = Vec::with_capacity(quads.len());
    for quad in quads {
        quad.validate()?;
        let mut line = String::new();
        write_quad(quad, &mut line);
        lines.push(line);
    }
    lines.sort_unstable();
    lines.dedup();
    Ok(lines.concat())
}

/// Append the canonical rendering of `quad` to `buffer`, terminated by ` .\n`.
///
/// The quad must already satisfy [`Quad::validate`].
pub fn write_quad(quad: &Quad, buffer: &mut String) {
    write_term(&quad.subject, buffer);
    write_term(&quad.predicate, buffer);
    write_term(&quad.object, buffer);
    write_term(&quad.graph, buffer);
    buffer.push_str(".\n");
}

/// Append the canonical rendering of `term` to `buffer`, followed by a
/// single space; [`Term::DefaultGraph`] renders to nothing at all.
pub fn write_term(term: &Term, buffer: &mut String) {
    match term {
        Term::NamedNode(iri) => {
            buffer.push('<');
            buffer.push_str(iri);
            buffer.push('>');
        }
        Term::BlankNode(id) => {
            // the identifier carries its `_:` prefix
            buffer.push_str(id);
        }
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            buffer.push('"');
            escape_into(value, buffer);
            buffer.push('"');
            if let Some(tag) = language {
                debug_assert_eq!(datatype.as_deref(), Some(RDF_LANG_STRING));
                buffer.push('@');
                buffer.push_str(tag);
            } else if let Some(datatype) = datatype {
                if datatype != XSD_STRING && datatype != RDF_LANG_STRING {
                    buffer.push_str("^^<");
                    buffer.push_str(datatype);
                    buffer.push('>');
                }
            }
        }
        Term::DefaultGraph => return,
    }
    buffer.push(' ');
}

fn escape_into(value: &str, buffer: &mut String) {
    for c in value.chars() {
        match c {
            '\\' => buffer.push_str("\\\\"),
            '\t' => buffer.push_str("\\t"),
            '\n' => buffer.push_str("\\n"),
            '\r' => buffer.push_str("\\r"),
            '"' => buffer.push_str("\\\""),
            _ => buffer.push(c),
        }
    }
}
