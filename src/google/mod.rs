//! Google Cloud Natural Language support
//!
//! Wire types for `analyzeSyntax` responses, their conversion into a
//! [`Document`](crate::Document), a thin request client, and the verb-triple
//! helpers built on the API's tag and label names.

pub mod adapter;
pub mod client;
pub mod labels;
pub mod response;

pub use adapter::{GoogleCloudAdapter, document_from_response};
pub use client::{
    ClientConfig, ClientError, DocumentType, EncodingType, LanguageServiceClient, Transport,
    create_client,
};
pub use labels::{Label, Tag};
pub use response::{AnalyzeSyntaxResponse, ResponseError};

use crate::document::SentenceSource;
use crate::tree::NodeRef;
use crate::triples::{Criteria, Triple, find_triples_any};

/// Subject, verb, object: `NSUBJ` / `VERB` / `DOBJ` or `PREP`
pub fn active_voice() -> Criteria {
    Criteria::new(
        [Label::Nsubj.as_str()],
        [Tag::Verb.as_str()],
        [Label::Dobj.as_str(), Label::Prep.as_str()],
    )
}

/// Passive subject, verb, agent: `NSUBJPASS` / `VERB` / `POBJ` or `PREP`
pub fn passive_voice() -> Criteria {
    Criteria::new(
        [Label::Nsubjpass.as_str()],
        [Tag::Verb.as_str()],
        [Label::Pobj.as_str(), Label::Prep.as_str()],
    )
}

/// Which voices [`find_verb_triples`] looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbTripleOptions {
    pub active_voice: bool,
    pub passive_voice: bool,
}

impl Default for VerbTripleOptions {
    fn default() -> Self {
        Self {
            active_voice: true,
            passive_voice: true,
        }
    }
}

/// Subject-verb-object triples across `source`
///
/// Active and passive matches are interleaved by head position. With both
/// voices disabled the result is empty.
pub fn find_verb_triples<'a, S>(
    source: &'a S,
    options: VerbTripleOptions,
) -> impl Iterator<Item = Triple<'a>> + 'a
where
    S: SentenceSource + ?Sized,
{
    let mut matchers = Vec::with_capacity(2);
    if options.active_voice {
        matchers.push(active_voice());
    }
    if options.passive_voice {
        matchers.push(passive_voice());
    }
    find_triples_any(source, matchers)
}

/// Walk filter keeping verbs
pub fn is_verb(_start: NodeRef<'_>, node: NodeRef<'_>) -> bool {
    node.tag() == Tag::Verb.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::{Value, json};

    /// (content, tag, label, head); offsets are derived from the contents
    fn document(sentences: &[&[(&str, &str, &str, i64)]]) -> Document {
        let mut offset = 0;
        let mut sentence_values = Vec::new();
        let mut tokens: Vec<Value> = Vec::new();
        for rows in sentences {
            let text = rows.iter().map(|row| row.0).collect::<Vec<_>>().join(" ");
            sentence_values.push(json!({"text": {"content": text, "beginOffset": offset}}));
            for (content, tag, label, head) in rows.iter() {
                tokens.push(json!({
                    "text": {"content": content, "beginOffset": offset},
                    "partOfSpeech": {"tag": tag},
                    "dependencyEdge": {"headTokenIndex": head, "label": label},
                    "lemma": content.to_lowercase(),
                }));
                offset += content.len() as i64 + 1;
            }
        }
        let response: AnalyzeSyntaxResponse = serde_json::from_value(json!({
            "sentences": sentence_values,
            "tokens": tokens,
            "language": "en",
        }))
        .unwrap();
        document_from_response(&response).unwrap()
    }

    fn fox_and_dog() -> Document {
        document(&[
            &[
                ("The", "DET", "DET", 1),
                ("fox", "NOUN", "NSUBJ", 2),
                ("was", "VERB", "ROOT", 2),
                ("quick", "ADJ", "DOBJ", 2),
            ],
            &[
                ("The", "DET", "DET", 5),
                ("dog", "NOUN", "NSUBJ", 6),
                ("was", "VERB", "ROOT", 6),
                ("lazy", "ADJ", "DOBJ", 6),
            ],
        ])
    }

    fn ball_thrown_by_john() -> Document {
        document(&[&[
            ("The", "DET", "DET", 1),
            ("ball", "NOUN", "NSUBJPASS", 3),
            ("was", "VERB", "AUXPASS", 3),
            ("thrown", "VERB", "ROOT", 3),
            ("by", "ADP", "PREP", 3),
            ("John", "NOUN", "POBJ", 4),
        ]])
    }

    #[test]
    fn test_find_verb_triples() {
        let doc = fox_and_dog();
        let triples: Vec<_> = find_verb_triples(&doc, VerbTripleOptions::default())
            .map(|t| t.contents())
            .collect();

        assert_eq!(triples, vec![("fox", "was", "quick"), ("dog", "was", "lazy")]);
    }

    #[test]
    fn test_find_verb_triples_on_sentence() {
        let doc = fox_and_dog();
        let triples: Vec<_> = find_verb_triples(&doc.sentences()[1], VerbTripleOptions::default())
            .map(|t| t.contents())
            .collect();

        assert_eq!(triples, vec![("dog", "was", "lazy")]);
    }

    #[test]
    fn test_passive_voice() {
        let doc = ball_thrown_by_john();
        let passive = VerbTripleOptions {
            active_voice: false,
            passive_voice: true,
        };
        let triples: Vec<_> = find_verb_triples(&doc, passive)
            .map(|t| t.contents())
            .collect();

        assert_eq!(triples, vec![("ball", "thrown", "by")]);

        let active_only = VerbTripleOptions {
            active_voice: true,
            passive_voice: false,
        };
        assert_eq!(find_verb_triples(&doc, active_only).count(), 0);
    }

    #[test]
    fn test_no_voices_is_empty() {
        let doc = fox_and_dog();
        let none = VerbTripleOptions {
            active_voice: false,
            passive_voice: false,
        };

        assert_eq!(find_verb_triples(&doc, none).count(), 0);
    }

    #[test]
    fn test_triples_are_repeatable() {
        let doc = ball_thrown_by_john();
        let first: Vec<_> = find_verb_triples(&doc, VerbTripleOptions::default()).collect();
        let second: Vec<_> = find_verb_triples(&doc, VerbTripleOptions::default()).collect();

        assert_eq!(first, second);
        assert_eq!(first[0].head.index(), 3);
        assert_eq!(first[0].right.index(), 4);
    }

    #[test]
    fn test_sample_response_uses_acomp() {
        let response =
            AnalyzeSyntaxResponse::from_json_str(include_str!("../../data/fox_and_dog.json"))
                .unwrap();
        let doc = document_from_response(&response).unwrap();

        assert_eq!(find_verb_triples(&doc, VerbTripleOptions::default()).count(), 0);

        let copular = active_voice().with_right_label(Label::Acomp.as_str());
        let triples: Vec<_> = crate::triples::find_triples(&doc, copular)
            .map(|t| t.contents())
            .collect();
        assert_eq!(triples, vec![("fox", "was", "quick"), ("dog", "was", "lazy")]);
    }

    #[test]
    fn test_is_verb_filter() {
        let doc = ball_thrown_by_john();
        let root = doc.sentences()[0].root();
        let verbs: Vec<_> = root.filtered_walk(is_verb).map(|n| n.content()).collect();

        assert_eq!(verbs, vec!["thrown", "was"]);
    }
}
