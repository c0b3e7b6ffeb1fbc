//! Graphviz DOT output for parsed sentences.
//!
//! This is the thin rendering side of the crate: it turns a
//! [`SentenceCollection`] into DOT source and leaves layout and rasterizing to
//! Graphviz (`dot -Tsvg`).
//!
//! ```text
//! sent_1 ──main──▶ 1_3 (jA_1)
//!                   ▲  ▲
//!              k1   │  │ k2p
//!           1_1 (rAma) 1_2 (Gara) ┈┈coref┈┈▶ 2_1
//! ```
//!
//! Token nodes are named `<sentence>_<position>`. Relation edges run from the
//! target token to the token that carries the relation. Tokens whose surface
//! form is bracketed (`[conj_1]`) head a construction cluster that also pulls
//! in every token attached to them through a construction role.

use crate::{SentenceCollection, SentenceGraph};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Roles that attach a token to a bracketed construction.
const DEFAULT_ROLES: &[&str] = &[
    "op1",
    "op2",
    "op3",
    "op4",
    "op5",
    "op7",
    "op8",
    "start",
    "end",
    "mod",
    "head",
    "count",
    "unit",
    "component1",
    "component2",
    "component3",
    "component4",
    "component5",
    "component6",
    "unit_value",
    "unit_every",
    "whole",
    "part",
    "kriyAmUla",
    "verbalizer",
];

/// Relation labels that make a token part of a construction cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionRoles {
    roles: HashSet<String>,
}

impl Default for ConstructionRoles {
    fn default() -> Self {
        DEFAULT_ROLES.iter().copied().collect()
    }
}

impl ConstructionRoles {
    /// An empty vocabulary: no token joins a cluster except its head.
    pub fn empty() -> Self {
        ConstructionRoles { roles: HashSet::new() }
    }

    pub fn insert(&mut self, role: impl Into<String>) -> bool {
        self.roles.insert(role.into())
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.insert(role);
        self
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ConstructionRoles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ConstructionRoles { roles: iter.into_iter().map(Into::into).collect() }
    }
}

impl<S: Into<String>> Extend<S> for ConstructionRoles {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.roles.extend(iter.into_iter().map(Into::into));
    }
}

/// Options for [`to_dot`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub roles: ConstructionRoles,
    /// Attach the info columns to token nodes as tooltips.
    pub show_info: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions { roles: ConstructionRoles::default(), show_info: true }
    }
}

// --- Natural ordering -------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Text(String),
    /// Digit run without leading zeros; length first so longer numbers sort later.
    Number { len: usize, digits: String },
}

/// Sort key that orders embedded digit runs numerically, case-insensitively
/// otherwise: `Geo_2` < `Geo_10` < `geo_11`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<KeyPart>);

pub fn natural_sort_key(id: &str) -> NaturalKey {
    let mut parts = Vec::new();
    let mut last = 0;

    // Text and ASCII digit segments alternate, starting (and ending) with text.
    for m in regex!(r"[0-9]+").find_iter(id) {
        parts.push(KeyPart::Text(id[last..m.start()].to_lowercase()));
        let digits = m.as_str().trim_start_matches('0').to_string();
        parts.push(KeyPart::Number { len: digits.len(), digits });
        last = m.end();
    }
    parts.push(KeyPart::Text(id[last..].to_lowercase()));

    NaturalKey(parts)
}

/// Sentence ids of `sentences` in natural order.
pub fn sorted_sentence_ids(sentences: &SentenceCollection) -> Vec<&str> {
    let mut ids: Vec<&str> = sentences.ids().collect();
    ids.sort_by(|a, b| match natural_sort_key(a).cmp(&natural_sort_key(b)) {
        Ordering::Equal => a.cmp(b),
        other => other,
    });
    ids
}

// --- Construction clusters --------------------------------------------------

/// A bracketed construction and the tokens attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Position of the bracketed head token.
    pub head: String,
    /// Surface form of the head, e.g. `[conj_1]`.
    pub concept: String,
    /// Positions of member tokens, in sentence order.
    pub members: Vec<String>,
}

fn is_construction(form: &str) -> bool {
    form.contains('[') && form.contains(']')
}

/// Collect the construction clusters of `graph`.
pub fn construction_clusters(graph: &SentenceGraph, roles: &ConstructionRoles) -> Vec<Cluster> {
    graph
        .tokens
        .iter()
        .filter(|head| is_construction(head.form()))
        .map(|head| {
            let members = graph
                .tokens
                .iter()
                .filter(|t| t.position() != head.position())
                .filter(|t| t.relations.iter().any(|r| r.target == head.position() && roles.contains(&r.label)))
                .map(|t| t.position().to_string())
                .collect();
            Cluster { head: head.position().to_string(), concept: head.form().to_string(), members }
        })
        .collect()
}

// --- DOT emission -----------------------------------------------------------

fn quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

fn sentence_node(id: &str) -> String {
    format!("sent_{}", id)
}

fn token_node(sentence: &str, position: &str) -> String {
    format!("{}_{}", sentence, position)
}

/// Render `sentences` as a DOT digraph, sentences in natural id order.
pub fn to_dot(sentences: &SentenceCollection, options: &RenderOptions) -> String {
    let mut out = String::from("// USR Representation\ndigraph {\n");

    for id in sorted_sentence_ids(sentences) {
        if let Some(graph) = sentences.get(id) {
            write_sentence(&mut out, graph, options);
        }
    }

    out.push_str("}\n");
    out
}

fn write_sentence(out: &mut String, graph: &SentenceGraph, options: &RenderOptions) {
    let sid = graph.id.as_str();
    let sent = sentence_node(sid);
    out.push_str(&format!("\t{} [label={} shape=ellipse]\n", quote(&sent), quote(&format!("Sentence {}", sid))));

    if let Some(main) = graph.main.as_deref() {
        out.push_str(&format!(
            "\t{} -> {} [label=main fontsize=10]\n",
            quote(&sent),
            quote(&token_node(sid, main))
        ));
    }

    let clusters = construction_clusters(graph, &options.roles);
    let heads: HashSet<&str> = clusters.iter().map(|c| c.head.as_str()).collect();

    for token in &graph.tokens {
        let mut attrs = format!("label={}", quote(token.form()));
        if heads.contains(token.position()) {
            attrs.push_str(" shape=box");
        }
        if options.show_info {
            let info = &token.info;
            let tooltip = format!(
                "semCat: {}\nmorphSem: {}\nspeakersView: {}\nAdditional Info: {}",
                info.semantic_category, info.morpho_semantic, info.speakers_view, info.additional_info
            );
            attrs.push_str(&format!(" tooltip={}", quote(&tooltip)));
        }
        out.push_str(&format!("\t{} [{}]\n", quote(&token_node(sid, token.position())), attrs));
    }

    for token in &graph.tokens {
        let source = token_node(sid, token.position());
        for relation in &token.relations {
            out.push_str(&format!(
                "\t{} -> {} [label={}]\n",
                quote(&token_node(sid, &relation.target)),
                quote(&source),
                quote(&relation.label)
            ));
        }
    }

    for cluster in &clusters {
        let head = token_node(sid, &cluster.head);
        out.push_str(&format!("\tsubgraph {} {{\n", quote(&format!("cluster_{}", head))));
        out.push_str(&format!(
            "\t\tcolor=black fillcolor=lightgray label={} style=\"filled,dashed\"\n",
            quote(&format!("Construction: {}", cluster.concept))
        ));
        out.push_str(&format!("\t\t{}\n", quote(&head)));
        for member in &cluster.members {
            out.push_str(&format!("\t\t{}\n", quote(&token_node(sid, member))));
        }
        out.push_str("\t}\n");
    }

    for relation in &graph.discourse_relations {
        let target = match relation.target_token.as_deref() {
            Some(position) => token_node(&relation.target_sentence, position),
            None => sentence_node(&relation.target_sentence),
        };
        out.push_str(&format!(
            "\t{} -> {} [label={} color=red style=dotted]\n",
            quote(&token_node(&relation.source_sentence, &relation.source_token)),
            quote(&target),
            quote(&relation.relation)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use pretty_assertions::assert_eq;

    const CONJ: &str = "\
<sent_id=Geo_10>
1\trAma\tper\t-\t-\t-\t-\t-\t[conj_1]:op1
2\tsIwA\tper\t-\t-\t-\t-\t-\t[conj_1]:op2
3\t[conj_1]\t-\t-\t4:k1\t-\t-\t-\t-
4\tjA_1\t-\t-\t0:main\t-\t-\t-\t-
<sent_id=Geo_2>
1\tve\tper\t-\t2:k1\tGeo_10.3:coref\t-\t-\t-
2\tAe_1\t-\t-\t0:main\t-\t-\t-\t-
";

    #[test]
    fn natural_order_is_numeric_aware() {
        let sentences = parse("<sent_id=Geo_10>\n<sent_id=geo_2>\n<sent_id=Geo_1>\n<sent_id=Geo_02b>").unwrap();
        assert_eq!(sorted_sentence_ids(&sentences), vec!["Geo_1", "geo_2", "Geo_02b", "Geo_10"]);
        assert!(natural_sort_key("9") < natural_sort_key("10"));
        assert!(natural_sort_key("a10") < natural_sort_key("B2"));
    }

    #[test]
    fn non_ascii_digits_sort_as_text() {
        assert_eq!(natural_sort_key("geo_१०"), NaturalKey(vec![KeyPart::Text("geo_१०".to_string())]));
        assert_eq!(
            natural_sort_key("s१2"),
            NaturalKey(vec![
                KeyPart::Text("s१".to_string()),
                KeyPart::Number { len: 1, digits: "2".to_string() },
                KeyPart::Text(String::new()),
            ])
        );
    }

    #[test]
    fn clusters_follow_role_vocabulary() {
        let sentences = parse(CONJ).unwrap();
        let graph = sentences.get("Geo_10").unwrap();

        let clusters = construction_clusters(graph, &ConstructionRoles::default());
        assert_eq!(
            clusters,
            vec![Cluster {
                head: "3".to_string(),
                concept: "[conj_1]".to_string(),
                members: vec!["1".to_string(), "2".to_string()],
            }]
        );

        let narrow: ConstructionRoles = ["op1"].into_iter().collect();
        assert_eq!(construction_clusters(graph, &narrow)[0].members, vec!["1".to_string()]);
    }

    #[test]
    fn custom_roles_extend_defaults() {
        let roles = ConstructionRoles::default().with_role("op9");
        assert!(roles.contains("op9"));
        assert!(roles.contains("kriyAmUla"));
        assert!(!ConstructionRoles::empty().contains("op1"));
    }

    #[test]
    fn dot_has_nodes_edges_and_clusters() {
        let sentences = parse(CONJ).unwrap();
        let dot = to_dot(&sentences, &RenderOptions::default());

        assert!(dot.starts_with("// USR Representation\ndigraph {\n"));
        assert!(dot.contains("\"sent_Geo_10\" -> \"Geo_10_4\" [label=main fontsize=10]"));
        assert!(dot.contains("\"Geo_10_3\" -> \"Geo_10_1\" [label=\"op1\"]"));
        assert!(dot.contains("subgraph \"cluster_Geo_10_3\" {"));
        assert!(dot.contains("\"Geo_2_1\" -> \"Geo_10_3\" [label=\"coref\" color=red style=dotted]"));
        // Natural order puts Geo_2 before Geo_10.
        assert!(dot.find("\"sent_Geo_2\"").unwrap() < dot.find("\"sent_Geo_10\"").unwrap());
    }

    #[test]
    fn quotes_are_escaped() {
        assert_eq!(quote("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }
}
