use crate::{Options, ParseError, Relation, SentenceMatch, parse, parse_verbose_with, parse_with};
use pretty_assertions::assert_eq;

const RAM_GOES: &str = "<sent_id=1>\n1\tRam\tN\t-\t0:main\t-\t-\t-\t-\n2\tgoes\tV\t-\t1:agent\t-\t-\t-\t-";

const DISCOURSE: &str = "\
<sent_id=Geo_1>
#rAma ne sIwA ko kiwAba xI
1\trAma\tper/male\t-\t4:k1\t-\t-\t-\t-
2\tsIwA\tper/female\t-\t4:k4\t-\t-\t-\t-
3\tkiwAba_1\t-\t-\t4:k2\t-\t-\t-\t-
4\twe_1-pres\t-\t-\t0:main\t-\t-\t-\t-
%affirmative
<sent_id=Geo_2>
#vaha use paDZegI
1\t$wyax\t-\tdistal\t3:k1\tGeo_1.2:coref\t-\t-\t-
2\t$wyax\t-\tdistal\t3:k2\tGeo_1.3:coref|1:samAnAXi\t-\t-\t-
3\tpaDZa_1-gA_1\t-\t-\t0:main\tGeo_1:kAryakAraNa\t-\t-\t-
%affirmative
";

#[test]
fn ram_goes_example() {
    let sentences = parse(RAM_GOES).unwrap();
    assert_eq!(sentences.len(), 1);

    let graph = sentences.get("1").unwrap();
    assert_eq!(graph.main.as_deref(), Some("1"));
    assert_eq!(graph.main_token().unwrap().id, "Ram");

    let goes = graph.tokens.iter().find(|t| t.form() == "goes").unwrap();
    assert_eq!(goes.relations, vec![Relation { target: "1".to_string(), label: "agent".to_string() }]);
    assert_eq!(graph.token_at(&goes.relations[0].target).unwrap().form(), "Ram");
}

#[test]
fn well_formed_input_drops_nothing() {
    let details = parse_verbose_with(RAM_GOES, &Options::default()).unwrap().details;
    assert_eq!(details.dropped_relations, 0);

    let details = parse_verbose_with(DISCOURSE, &Options::default()).unwrap().details;
    assert_eq!(details.dropped_relations, 0);
}

#[test]
fn one_graph_per_marker_even_when_empty() {
    let text = "<sent_id=a>\n#only a comment\n<sent_id=b>\n1\tx\n<sent_id=c>";
    let sentences = parse(text).unwrap();

    assert_eq!(sentences.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert!(sentences.get("a").unwrap().tokens.is_empty());
    assert_eq!(sentences.get("c").unwrap().main, None);
}

#[test]
fn tokens_are_transposed() {
    let sentences = parse(DISCOURSE).unwrap();
    let graph = sentences.get("Geo_1").unwrap();

    let inputs = [("1", "rAma"), ("2", "sIwA"), ("3", "kiwAba_1"), ("4", "we_1-pres")];
    for (token, (position, word)) in graph.tokens.iter().zip(inputs) {
        assert_eq!(token.id, word);
        assert_eq!(token.word, position);
    }
}

#[test]
fn root_marker_sets_main_alongside_other_relations() {
    let text = "<sent_id=s>\n1\ta\tx\t-\t2:k1\n2\tb\tx\t-\t1:k7|0:main";
    let graph = parse(text).unwrap().get("s").cloned().unwrap();

    assert_eq!(graph.main.as_deref(), Some("2"));
    assert_eq!(graph.tokens[1].relations, vec![Relation { target: "1".to_string(), label: "k7".to_string() }]);
}

#[test]
fn unmatched_relation_targets_are_dropped() {
    let text = "<sent_id=s>\n1\ta\tx\t-\tghost:k1\n2\tb\tx\t-\t0:main";
    let graph = parse(text).unwrap().get("s").cloned().unwrap();
    assert!(graph.tokens[0].relations.is_empty());

    let details = parse_verbose_with(text, &Options::default()).unwrap().details;
    assert_eq!(details.dropped_relations, 1);
}

#[test]
fn repeated_marker_replaces_graph_in_place() {
    let text = "<sent_id=a>\n1\tx\n<sent_id=b>\n1\ty\n<sent_id=a>\n1\tz\n2\tw";
    let sentences = parse(text).unwrap();

    assert_eq!(sentences.ids().collect::<Vec<_>>(), vec!["a", "b"]);
    let forms: Vec<_> = sentences.get("a").unwrap().tokens.iter().map(|t| t.form()).collect();
    assert_eq!(forms, vec!["z", "w"]);
    assert_eq!(sentences.get("b").unwrap().tokens.len(), 1);
}

#[test]
fn discourse_relations_resolve_across_sentences() {
    let sentences = parse(DISCOURSE).unwrap();
    let rels = &sentences.get("Geo_2").unwrap().discourse_relations;
    assert_eq!(rels.len(), 4);

    assert_eq!(rels[0].source_sentence, "Geo_2");
    assert_eq!(rels[0].source_token, "1");
    assert_eq!(rels[0].target_sentence, "Geo_1");
    assert_eq!(rels[0].target_token.as_deref(), Some("2"));
    assert_eq!(rels[0].target_word.as_deref(), Some("sIwA"));
    assert_eq!(rels[0].relation, "coref");

    assert_eq!(rels[1].target_word.as_deref(), Some("kiwAba_1"));

    // Same-sentence reference made by token 2 to token 1.
    assert_eq!(rels[2].target_sentence, "Geo_2");
    assert_eq!(rels[2].target_token.as_deref(), Some("1"));
    assert_eq!(rels[2].target_word.as_deref(), Some("$wyax"));
    assert_eq!(rels[2].relation, "samAnAXi");

    // Sentence-level reference.
    assert_eq!(rels[3].target_sentence, "Geo_1");
    assert_eq!(rels[3].target_token, None);
    assert_eq!(rels[3].target_word, None);
}

#[test]
fn coref_example_uses_first_containing_sentence() {
    let text = "\
<sent_id=1>
1\tRam\tN\t-\t0:main\t2.1:coref
<sent_id=12>
1\tSita\tN\t-\t0:main
<sent_id=2>
1\tvaha\tP\t-\t0:main
";
    let sentences = parse(text).unwrap();
    let rel = &sentences.get("1").unwrap().discourse_relations[0];

    assert_eq!(rel.source_sentence, "1");
    // Only "1" exists when the reference is read; "2" is not parsed yet.
    assert_eq!(rel.target_sentence, "2");
    assert_eq!(rel.target_token.as_deref(), Some("1"));
    assert_eq!(rel.target_word, None);
    assert_eq!(rel.relation, "coref");

    let later = "<sent_id=12>\n1\tSita\n<sent_id=2>\n1\tvaha\n<sent_id=1>\n1\tRam\tN\t-\t0:main\t2.1:coref";
    let sentences = parse(later).unwrap();
    let rel = &sentences.get("1").unwrap().discourse_relations[0];
    assert_eq!(rel.target_sentence, "12");
    assert_eq!(rel.target_word.as_deref(), Some("Sita"));
}

#[test]
fn exact_matching_skips_substring_hits() {
    let text = "<sent_id=12>\n1\tSita\n<sent_id=2>\n1\tvaha\n<sent_id=1>\n1\tRam\tN\t-\t0:main\t2.1:coref";
    let options = Options { sentence_match: SentenceMatch::Exact };
    let sentences = parse_with(text, &options).unwrap().sentences;

    let rel = &sentences.get("1").unwrap().discourse_relations[0];
    assert_eq!(rel.target_sentence, "2");
    assert_eq!(rel.target_word.as_deref(), Some("vaha"));
}

#[test]
fn same_sentence_reference_sees_current_and_earlier_lines() {
    let text = "<sent_id=s>\n1\ta\tx\t-\t-\t2:coref\n2\tb\tx\t-\t-\t1:coref";
    let sentences = parse(text).unwrap();
    let rels = &sentences.get("s").unwrap().discourse_relations;

    // Token 2 is not parsed yet when token 1 refers to it.
    assert_eq!(rels[0].target_word, None);
    assert_eq!(rels[1].target_word.as_deref(), Some("a"));

    // A record can refer to itself.
    let graph = parse("<sent_id=s>\n1\ta\tx\t-\t0:main\t1:coref").unwrap().get("s").cloned().unwrap();
    assert_eq!(graph.discourse_relations[0].target_token.as_deref(), Some("1"));
    assert_eq!(graph.discourse_relations[0].target_word.as_deref(), Some("a"));
}

#[test]
fn parsing_is_idempotent() {
    assert_eq!(parse(DISCOURSE).unwrap(), parse(DISCOURSE).unwrap());
}

#[test]
fn malformed_relation_is_fatal() {
    let err = parse("<sent_id=s>\n1\ta\tx\t-\tagent").unwrap_err();
    assert!(matches!(err, ParseError::MalformedRelation { line: 2, .. }));
}

#[test]
fn record_before_marker_is_fatal() {
    let err = parse("#header\n1\tRam\tN\n<sent_id=1>").unwrap_err();
    assert!(matches!(err, ParseError::MissingSentence { line: 2 }));
}

#[test]
fn whitespace_irregular_records_parse() {
    let text = "  <sent_id=x>  \n1    Ram  N\t\t-  0:main\n2 goes V - 1:agent   ";
    let graph = parse(text).unwrap().get("x").cloned().unwrap();

    assert_eq!(graph.tokens.len(), 2);
    assert_eq!(graph.tokens[0].info.semantic_category, "N");
    assert_eq!(graph.tokens[1].relations[0].label, "agent");

    let details = parse_verbose_with(text, &Options::default()).unwrap().details;
    assert_eq!(details.lines.records, 2);
    assert_eq!(details.lines.short_records, 2);
}
