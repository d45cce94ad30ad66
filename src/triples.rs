//! Triple extraction over dependency trees
//!
//! A triple is `(left, head, right)` where `left` and `right` are direct
//! dependents of `head`. Which nodes qualify is decided by a
//! [`TripleMatcher`]; [`Criteria`] is the label/tag-set matcher used for the
//! common cases.
//!
//! Results are lazy and ordered by traversal: sentence order, then the
//! pre-order position of the head in its tree, then left dependents, then
//! right dependents (both in token order). Heads lacking either side are
//! skipped; an empty result is not an error.

use crate::document::SentenceSource;
use crate::tree::NodeRef;

/// Predicate deciding which nodes form a triple
pub trait TripleMatcher {
    fn matches_head(&self, node: NodeRef<'_>) -> bool;

    fn matches_left(&self, node: NodeRef<'_>) -> bool;

    fn matches_right(&self, node: NodeRef<'_>) -> bool;
}

impl<M: TripleMatcher + ?Sized> TripleMatcher for &M {
    fn matches_head(&self, node: NodeRef<'_>) -> bool {
        (**self).matches_head(node)
    }

    fn matches_left(&self, node: NodeRef<'_>) -> bool {
        (**self).matches_left(node)
    }

    fn matches_right(&self, node: NodeRef<'_>) -> bool {
        (**self).matches_right(node)
    }
}

/// A matched `(left, head, right)` triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triple<'a> {
    pub left: NodeRef<'a>,
    pub head: NodeRef<'a>,
    pub right: NodeRef<'a>,
}

impl<'a> Triple<'a> {
    pub fn as_tuple(&self) -> (NodeRef<'a>, NodeRef<'a>, NodeRef<'a>) {
        (self.left, self.head, self.right)
    }

    /// Content of the three nodes
    pub fn contents(&self) -> (&'a str, &'a str, &'a str) {
        (
            self.left.content(),
            self.head.content(),
            self.right.content(),
        )
    }
}

/// Matcher built from sets of labels and tags
///
/// The head must carry one of `head_tags`; a dependent is a left argument if
/// its label is in `left_labels`, otherwise a right argument if its label is
/// in `right_labels`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    left_labels: Vec<String>,
    head_tags: Vec<String>,
    right_labels: Vec<String>,
}

impl Criteria {
    pub fn new<L, H, R>(left_labels: L, head_tags: H, right_labels: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            left_labels: left_labels.into_iter().map(Into::into).collect(),
            head_tags: head_tags.into_iter().map(Into::into).collect(),
            right_labels: right_labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_left_label(mut self, label: impl Into<String>) -> Self {
        self.left_labels.push(label.into());
        self
    }

    pub fn with_head_tag(mut self, tag: impl Into<String>) -> Self {
        self.head_tags.push(tag.into());
        self
    }

    pub fn with_right_label(mut self, label: impl Into<String>) -> Self {
        self.right_labels.push(label.into());
        self
    }

    pub fn left_labels(&self) -> &[String] {
        &self.left_labels
    }

    pub fn head_tags(&self) -> &[String] {
        &self.head_tags
    }

    pub fn right_labels(&self) -> &[String] {
        &self.right_labels
    }
}

impl TripleMatcher for Criteria {
    fn matches_head(&self, node: NodeRef<'_>) -> bool {
        self.head_tags.iter().any(|tag| tag == node.tag())
    }

    fn matches_left(&self, node: NodeRef<'_>) -> bool {
        self.left_labels.iter().any(|label| label == node.label())
    }

    fn matches_right(&self, node: NodeRef<'_>) -> bool {
        self.right_labels.iter().any(|label| label == node.label())
    }
}

/// Lazily find every triple accepted by `matcher`
///
/// Calling this again on the same source yields the same sequence.
pub fn find_triples<'a, S, M>(source: &'a S, matcher: M) -> impl Iterator<Item = Triple<'a>> + 'a
where
    S: SentenceSource + ?Sized,
    M: TripleMatcher + 'a,
{
    source
        .sentences()
        .iter()
        .flat_map(|sentence| sentence.tokens())
        .flat_map(move |head| triples_at(&matcher, head))
}

/// Like [`find_triples`], trying each matcher in turn at every head node
///
/// Ordering stays traversal-first: all triples of one head (for every
/// matcher, in matcher order) come before those of the next head.
pub fn find_triples_any<'a, S, M>(
    source: &'a S,
    matchers: Vec<M>,
) -> impl Iterator<Item = Triple<'a>> + 'a
where
    S: SentenceSource + ?Sized,
    M: TripleMatcher + 'a,
{
    source
        .sentences()
        .iter()
        .flat_map(|sentence| sentence.tokens())
        .flat_map(move |head| {
            matchers
                .iter()
                .flat_map(|matcher| triples_at(matcher, head))
                .collect::<Vec<_>>()
        })
}

/// Triples whose left, head and right match a single label/tag each
pub fn find_generic_triples<'a, S>(
    source: &'a S,
    left_label: &str,
    head_tag: &str,
    right_label: &str,
) -> impl Iterator<Item = Triple<'a>> + use<'a, S>
where
    S: SentenceSource + ?Sized,
{
    find_triples(source, Criteria::new([left_label], [head_tag], [right_label]))
}

/// Triples matching any combination of the given labels and tags
pub fn find_generic_triples_multi_criteria<'a, S>(
    source: &'a S,
    left_labels: &[&str],
    head_tags: &[&str],
    right_labels: &[&str],
) -> impl Iterator<Item = Triple<'a>> + use<'a, S>
where
    S: SentenceSource + ?Sized,
{
    find_triples(
        source,
        Criteria::new(
            left_labels.iter().copied(),
            head_tags.iter().copied(),
            right_labels.iter().copied(),
        ),
    )
}

/// All triples headed by `head`, left-major
fn triples_at<'a, M>(matcher: &M, head: NodeRef<'a>) -> Vec<Triple<'a>>
where
    M: TripleMatcher + ?Sized,
{
    if !matcher.matches_head(head) {
        return Vec::new();
    }

    let mut lefts = Vec::new();
    let mut rights = Vec::new();
    for child in head.children() {
        if matcher.matches_left(child) {
            lefts.push(child);
        } else if matcher.matches_right(child) {
            rights.push(child);
        }
    }

    lefts
        .iter()
        .flat_map(|&left| rights.iter().map(move |&right| Triple { left, head, right }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Sentence};
    use crate::tree::tests::tree_from_rows;

    /// "The fox was quick." / "The dog was lazy." with the complements
    /// labeled as direct objects
    fn fox_and_dog() -> Document {
        let first = tree_from_rows(
            &[
                ("The", "DET", "DET", Some(1)),
                ("fox", "NOUN", "NSUBJ", Some(2)),
                ("was", "VERB", "ROOT", None),
                ("quick", "ADJ", "DOBJ", Some(2)),
                (".", "PUNCT", "P", Some(2)),
            ],
            0,
        );
        let second = tree_from_rows(
            &[
                ("The", "DET", "DET", Some(1)),
                ("dog", "NOUN", "NSUBJ", Some(2)),
                ("was", "VERB", "ROOT", None),
                ("lazy", "ADJ", "DOBJ", Some(2)),
                (".", "PUNCT", "P", Some(2)),
            ],
            5,
        );
        Document::new(
            None,
            vec![
                Sentence::new(Some("The fox was quick.".to_string()), first),
                Sentence::new(Some("The dog was lazy.".to_string()), second),
            ],
        )
    }

    /// Two subjects and two objects on one verb
    fn fan_out() -> Document {
        let tree = tree_from_rows(
            &[
                ("Cats", "NOUN", "NSUBJ", Some(2)),
                ("dogs", "NOUN", "NSUBJ", Some(2)),
                ("chase", "VERB", "ROOT", None),
                ("mice", "NOUN", "DOBJ", Some(2)),
                ("birds", "NOUN", "DOBJ", Some(2)),
            ],
            0,
        );
        Document::new(None, vec![Sentence::new(None, tree)])
    }

    fn svo() -> Criteria {
        Criteria::new(["NSUBJ"], ["VERB"], ["DOBJ"])
    }

    #[test]
    fn test_find_triples_in_order() {
        let doc = fox_and_dog();
        let triples: Vec<_> = find_triples(&doc, svo()).map(|t| t.contents()).collect();

        assert_eq!(triples, vec![("fox", "was", "quick"), ("dog", "was", "lazy")]);
    }

    #[test]
    fn test_triples_are_restartable() {
        let doc = fox_and_dog();
        let criteria = svo();
        let first: Vec<_> = find_triples(&doc, &criteria).collect();
        let second: Vec<_> = find_triples(&doc, &criteria).collect();

        assert_eq!(first, second);
        assert_eq!(first[1].head.index(), 7);
    }

    #[test]
    fn test_single_sentence_source() {
        let doc = fox_and_dog();
        let triples: Vec<_> = find_triples(&doc.sentences()[1], svo())
            .map(|t| t.contents())
            .collect();

        assert_eq!(triples, vec![("dog", "was", "lazy")]);
    }

    #[test]
    fn test_cross_product_is_left_major() {
        let doc = fan_out();
        let triples: Vec<_> = find_triples(&doc, svo()).map(|t| t.contents()).collect();

        assert_eq!(
            triples,
            vec![
                ("Cats", "chase", "mice"),
                ("Cats", "chase", "birds"),
                ("dogs", "chase", "mice"),
                ("dogs", "chase", "birds"),
            ]
        );
    }

    #[test]
    fn test_missing_dependent_is_skipped() {
        let tree = tree_from_rows(
            &[
                ("Birds", "NOUN", "NSUBJ", Some(1)),
                ("fly", "VERB", "ROOT", None),
            ],
            0,
        );
        let sentence = Sentence::new(None, tree);

        assert_eq!(find_triples(&sentence, svo()).count(), 0);
    }

    #[test]
    fn test_head_tag_must_match() {
        let doc = fox_and_dog();
        let criteria = Criteria::new(["NSUBJ"], ["NOUN"], ["DOBJ"]);

        assert_eq!(find_triples(&doc, criteria).count(), 0);
    }

    #[test]
    fn test_left_label_takes_precedence() {
        let doc = fan_out();
        // NSUBJ is listed on both sides; subjects stay on the left
        let criteria = Criteria::new(["NSUBJ"], ["VERB"], ["NSUBJ", "DOBJ"]);
        let lefts: Vec<&str> = find_triples(&doc, criteria)
            .map(|t| t.left.content())
            .collect();

        assert_eq!(lefts, vec!["Cats", "Cats", "dogs", "dogs"]);
    }

    #[test]
    fn test_generic_triples() {
        let doc = fox_and_dog();
        let triples: Vec<_> = find_generic_triples(&doc, "NSUBJ", "VERB", "DOBJ")
            .map(|t| t.contents())
            .collect();

        assert_eq!(triples.len(), 2);
        assert_eq!(
            find_generic_triples(&doc, "NSUBJ", "VERB", "P")
                .map(|t| t.right.content())
                .collect::<Vec<_>>(),
            vec![".", "."]
        );
    }

    #[test]
    fn test_generic_triples_multi_criteria() {
        let doc = fox_and_dog();
        let triples: Vec<_> =
            find_generic_triples_multi_criteria(&doc, &["NSUBJ"], &["VERB", "ADJ"], &["DOBJ", "P"])
                .map(|t| t.contents())
                .collect();

        assert_eq!(
            triples,
            vec![
                ("fox", "was", "quick"),
                ("fox", "was", "."),
                ("dog", "was", "lazy"),
                ("dog", "was", "."),
            ]
        );
    }

    #[test]
    fn test_find_triples_any_keeps_traversal_order() {
        let doc = fox_and_dog();
        let matchers = vec![svo(), Criteria::new(["NSUBJ"], ["VERB"], ["P"])];
        let triples: Vec<_> = find_triples_any(&doc, matchers)
            .map(|t| t.contents())
            .collect();

        assert_eq!(
            triples,
            vec![
                ("fox", "was", "quick"),
                ("fox", "was", "."),
                ("dog", "was", "lazy"),
                ("dog", "was", "."),
            ]
        );
    }

    #[test]
    fn test_custom_matcher() {
        struct ByContent;

        impl TripleMatcher for ByContent {
            fn matches_head(&self, node: NodeRef<'_>) -> bool {
                node.lemma() == "was"
            }

            fn matches_left(&self, node: NodeRef<'_>) -> bool {
                node.content() == "dog"
            }

            fn matches_right(&self, node: NodeRef<'_>) -> bool {
                node.tag() == "ADJ"
            }
        }

        let doc = fox_and_dog();
        let triples: Vec<_> = find_triples(&doc, ByContent).collect();

        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].contents(), ("dog", "was", "lazy"));
        let (left, head, right) = triples[0].as_tuple();
        assert_eq!(left.parent(), Some(head));
        assert_eq!(right.parent(), Some(head));
        assert!(head.is_root());
    }

    #[test]
    fn test_criteria_builders() {
        let criteria = svo()
            .with_left_label("CSUBJ")
            .with_head_tag("AUX")
            .with_right_label("ATTR");

        assert_eq!(criteria.left_labels(), ["NSUBJ", "CSUBJ"]);
        assert_eq!(criteria.head_tags(), ["VERB", "AUX"]);
        assert_eq!(criteria.right_labels(), ["DOBJ", "ATTR"]);
    }
}
