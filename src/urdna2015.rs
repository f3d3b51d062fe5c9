//! I provide the implementation of the URDNA2015 canonicalization
//! algorithm described at <https://www.w3.org/TR/rdf-canon/>.

use std::cell::Cell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use crate::_permutations::for_each_permutation_of;
use crate::digest::{HashAlgorithm, MessageDigest};
use crate::issuer::IdentifierIssuer;
use crate::nquads::{write_quad, write_term};
use crate::quad::Quad;
use crate::term::Term;
use crate::C14nError;

/// Configuration of [`canonicalize`] and [`relabel`].
#[derive(Clone, Debug)]
pub struct C14nOptions {
    /// Tag of the hash algorithm to use; only `"sha256"` is accepted.
    pub algorithm: String,
    /// Maximum recursion depth while hashing n-degree quads;
    /// 0 means unlimited.
    ///
    /// Bounding the recursion protects against pathological datasets
    /// (big cycles or cliques of undistinguishable blank nodes) at the
    /// price of failing on them with [`C14nError::RecursionLimitExceeded`].
    pub max_call_stack_depth: usize,
    /// Maximum total number of n-degree hash computations over the whole
    /// run; 0 means unlimited.
    pub max_total_call_stack_depth: usize,
}

impl Default for C14nOptions {
    fn default() -> Self {
        Self {
            algorithm: "sha256".to_string(),
            max_call_stack_depth: 0,
            max_total_call_stack_depth: 0,
        }
    }
}

/// A mapping from original blank node labels to canonical ones,
/// as returned by [`relabel`].
pub type C14nIdMap = BTreeMap<Rc<str>, Rc<str>>;

/// Return the canonical N-Quads serialization of `dataset`:
/// every blank node [relabelled](relabel) to its canonical `_:c14n<N>`
/// label, one quad per ` .\n`-terminated line, lines sorted in codepoint
/// order. Duplicate quads are emitted once.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>.
pub fn canonicalize(dataset: &[Quad], options: &C14nOptions) -> Result<String, C14nError> {
    let (quads, _) = relabel(dataset, options)?;
    let mut lines: Vec<String> = quads
        .iter()
        .map(|quad| {
            let mut line = String::new();
            write_quad(quad, &mut line);
            line
        })
        .collect();
    lines.sort_unstable();
    // distinct quads may still render identically
    // (e.g. a plain literal vs the same literal typed xsd:string)
    lines.dedup();
    Ok(lines.concat())
}

/// Return a copy of `dataset` (minus duplicate quads) in which every blank
/// node carries its canonical label, paired with the mapping from original
/// to canonical labels.
///
/// Implements <https://www.w3.org/TR/rdf-canon/#canon-algorithm>,
/// leaving the final serialization to the caller.
pub fn relabel(dataset: &[Quad], options: &C14nOptions) -> Result<(Vec<Quad>, C14nIdMap), C14nError> {
    let algorithm: HashAlgorithm = options.algorithm.parse()?;
    let mut state = C14nState::new(algorithm, options);

    // The dataset is a multiset but canonicalization treats it as a set.
    let mut seen = HashSet::with_capacity(dataset.len());
    let mut quads = Vec::with_capacity(dataset.len());
    for quad in dataset {
        quad.validate()?;
        if seen.insert(quad) {
            quads.push(quad);
        }
    }

    // Step 2: map each blank node to every quad mentioning it,
    // once per (quad, position) occurrence
    for quad in &quads {
        for (component, _) in bnode_components(quad) {
            if let Some(bnid) = component.bnode_id() {
                state
                    .b2q
                    .entry(Rc::from(bnid))
                    .or_default()
                    .push(*quad);
            }
        }
    }

    // Step 3: first-degree hash of every blank node
    for (bnid, quads) in &state.b2q {
        let hash = hash_first_degree_quads(algorithm, bnid, &quads[..]);
        state.h2b.entry(hash.clone()).or_default().push(Rc::clone(bnid));
        state.b2h.insert(Rc::clone(bnid), hash);
    }

    // Step 4: nodes with a unique first-degree hash get their canonical
    // identifier immediately, in hash order.
    // NB: we are relying on the fact that BTreeMap's elements are sorted.
    let mut next_h2b = BTreeMap::new();
    for (hash, bnids) in state.h2b {
        debug_assert!(!bnids.is_empty());
        if bnids.len() > 1 {
            next_h2b.insert(hash, bnids);
        } else {
            state.canonical.issue(&bnids[0]);
        }
    }
    state.h2b = next_h2b;

    // Step 5: ties are resolved by exploring each colliding node's
    // neighbourhood; the smallest hash path commits first.
    for identifier_list in state.h2b.values() {
        let mut hash_path_list = vec![];
        // Step 5.2
        for id in identifier_list {
            if state.canonical.has(id) {
                continue;
            }
            let mut issuer = IdentifierIssuer::new("_:b");
            issuer.issue(id);
            hash_path_list.push(state.hash_n_degree_quads(id, &issuer, 0)?);
        }
        // Step 5.3
        hash_path_list.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        for (_, issuer) in hash_path_list {
            for bnid in issuer.issued_order() {
                state.canonical.issue(bnid);
            }
        }
    }

    // Step 6: rewrite the quads with the canonical labels
    let issued = state.canonical.into_issued_map();
    let relabelled = quads
        .iter()
        .map(|quad| {
            Ok(Quad {
                subject: convert(&quad.subject, &issued)?,
                predicate: quad.predicate.clone(),
                object: convert(&quad.object, &issued)?,
                graph: convert(&quad.graph, &issued)?,
            })
        })
        .collect::<Result<Vec<_>, C14nError>>()?;
    Ok((relabelled, issued))
}

fn convert(term: &Term, issued: &C14nIdMap) -> Result<Term, C14nError> {
    if let Some(bnid) = term.bnode_id() {
        match issued.get(bnid) {
            Some(canon_id) => Ok(Term::BlankNode(canon_id.to_string())),
            None => Err(C14nError::UnlabeledBlankNode(bnid.to_string())),
        }
    } else {
        Ok(term.clone())
    }
}

/// The components of `quad` in which a blank node may legally occur,
/// tagged with their position letter.
fn bnode_components(quad: &Quad) -> [(&Term, &'static str); 3] {
    [
        (&quad.subject, "s"),
        (&quad.object, "o"),
        (&quad.graph, "g"),
    ]
}

#[derive(Clone, Debug)]
struct C14nState<'a> {
    b2q: BTreeMap<Rc<str>, Vec<&'a Quad>>,
    h2b: BTreeMap<String, Vec<Rc<str>>>,
    canonical: IdentifierIssuer,
    /// Memoized results of hash_first_degree_quads
    b2h: BTreeMap<Rc<str>, String>,
    algorithm: HashAlgorithm,
    max_call_stack_depth: usize,
    max_total_call_stack_depth: usize,
    total_calls: Cell<usize>,
}

impl<'a> C14nState<'a> {
    fn new(algorithm: HashAlgorithm, options: &C14nOptions) -> Self {
        C14nState {
            b2q: BTreeMap::new(),
            h2b: BTreeMap::new(),
            canonical: IdentifierIssuer::new("_:c14n"),
            b2h: BTreeMap::new(),
            algorithm,
            max_call_stack_depth: options.max_call_stack_depth,
            max_total_call_stack_depth: options.max_total_call_stack_depth,
            total_calls: Cell::new(0),
        }
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-related-blank-node>
    fn hash_related_blank_node(
        &self,
        related: &str,
        quad: &Quad,
        issuer: &IdentifierIssuer,
        position: &str,
    ) -> String {
        let mut input = MessageDigest::new(self.algorithm);
        input.update(position);
        if position != "g" {
            input.update("<");
            input.update(quad.predicate.iri().unwrap());
            input.update(">");
        }
        // identifiers issued by either issuer carry their `_:` prefix
        if let Some(canon_id) = self.canonical.issued(related) {
            input.update(canon_id);
        } else if let Some(temp_id) = issuer.issued(related) {
            input.update(temp_id);
        } else {
            // memoized value of hash_first_degree_quads for this blank node
            input.update(self.b2h.get(related).unwrap());
        }
        input.digest()
    }

    /// Implements <https://www.w3.org/TR/rdf-canon/#hash-nd-quads>
    fn hash_n_degree_quads(
        &self,
        identifier: &str,
        issuer: &IdentifierIssuer,
        depth: usize,
    ) -> Result<(String, IdentifierIssuer), C14nError> {
        if self.max_call_stack_depth != 0 && depth > self.max_call_stack_depth {
            return Err(C14nError::RecursionLimitExceeded(format!(
                "depth {depth} exceeds the limit of {}",
                self.max_call_stack_depth
            )));
        }
        let total_calls = self.total_calls.get() + 1;
        self.total_calls.set(total_calls);
        if self.max_total_call_stack_depth != 0 && total_calls > self.max_total_call_stack_depth {
            return Err(C14nError::RecursionLimitExceeded(format!(
                "more than {} calls in total",
                self.max_total_call_stack_depth
            )));
        }
        // Steps 1-3: hash every blank node co-occurring with `identifier`,
        // once per (quad, position) occurrence
        let mut hash_to_related = BTreeMap::<String, Vec<Box<str>>>::new();
        let quads = self.b2q.get(identifier).unwrap();
        for quad in quads {
            for (component, position) in bnode_components(quad) {
                if let Some(bnid) = component.bnode_id() {
                    if bnid == identifier {
                        continue;
                    }
                    let hash = self.hash_related_blank_node(bnid, quad, issuer, position);
                    hash_to_related.entry(hash).or_default().push(Box::from(bnid));
                }
            }
        }
        // Step 4
        let mut data_to_hash = MessageDigest::new(self.algorithm);
        // Step 5
        let mut ret_issuer: Option<IdentifierIssuer> = None;
        for (related_hash, mut blank_nodes) in hash_to_related {
            data_to_hash.update(&related_hash);
            let mut chosen_path = String::new();
            let mut chosen_issuer: Option<IdentifierIssuer> = None;
            // Step 5.4
            for_each_permutation_of(&mut blank_nodes, |permutation| -> Result<(), C14nError> {
                let mut issuer_copy = ret_issuer.as_ref().unwrap_or(issuer).clone();
                let mut path = String::new();
                let mut recursion_list: Vec<&str> = vec![];
                // Step 5.4.4
                for related in permutation {
                    if let Some(canon_id) = self.canonical.issued(related) {
                        path.push_str(canon_id);
                    } else {
                        let (id, new) = issuer_copy.issue(related);
                        if new {
                            recursion_list.push(related);
                        }
                        path.push_str(id);
                    }
                    if !chosen_path.is_empty() && path > chosen_path {
                        return Ok(()); // skip to the next permutation
                    }
                }
                // Step 5.4.5
                for related in recursion_list {
                    let (result_hash, result_issuer) =
                        self.hash_n_degree_quads(related, &issuer_copy, depth + 1)?;
                    let (id, _) = issuer_copy.issue(related);
                    path.push_str(id);
                    path.push('<');
                    path.push_str(&result_hash);
                    path.push('>');
                    issuer_copy = result_issuer;
                    if !chosen_path.is_empty() && path > chosen_path {
                        return Ok(()); // skip to the next permutation
                    }
                }
                // Step 5.4.6
                if chosen_path.is_empty() || path < chosen_path {
                    chosen_path = path;
                    chosen_issuer = Some(issuer_copy);
                }
                Ok(())
            })?;
            data_to_hash.update(&chosen_path);
            ret_issuer = chosen_issuer;
        }
        let issuer = ret_issuer.unwrap_or_else(|| issuer.clone());
        let hash = data_to_hash.digest();
        debug_assert!({
            log::trace!("hash_n_degree_quads({identifier}, {depth}) -> {hash}");
            true
        });
        Ok((hash, issuer))
    }
}

/// Implements <https://www.w3.org/TR/rdf-canon/#hash-1d-quads>
/// with the difference that the quad list of the blank node is passed
/// directly instead of the whole state.
fn hash_first_degree_quads(algorithm: HashAlgorithm, bnid: &str, quads: &[&Quad]) -> String {
    let mut nquads: Vec<_> = quads
        .iter()
        .map(|quad| {
            let mut line = String::new();
            write_term_for_hash(&quad.subject, &mut line, bnid);
            write_term_for_hash(&quad.predicate, &mut line, bnid);
            write_term_for_hash(&quad.object, &mut line, bnid);
            write_term_for_hash(&quad.graph, &mut line, bnid);
            line.push_str(".\n");
            line
        })
        .collect();
    nquads.sort_unstable();
    let mut hasher = MessageDigest::new(algorithm);
    for line in nquads {
        hasher.update(&line);
    }
    let hash = hasher.digest();
    debug_assert!({
        log::trace!("hash_first_degree_quads({bnid}) -> {hash}");
        true
    });
    hash
}

/// Write `term` like [`write_term`], except that blank nodes are abstracted
/// to `_:a` (the node being hashed) or `_:z` (any other).
fn write_term_for_hash(term: &Term, buffer: &mut String, ref_bnid: &str) {
    if let Some(bnid) = term.bnode_id() {
        if bnid == ref_bnid {
            buffer.push_str("_:a ");
        } else {
            buffer.push_str("_:z ");
        }
    } else {
        write_term(term, buffer);
    }
}
