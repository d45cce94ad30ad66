//! Conversion of `analyzeSyntax` responses into documents
//!
//! The response lists every token of the text in one flat sequence, with
//! head indices pointing into that sequence. Tokens are first split into
//! sentences, then each sentence's head links are translated to
//! sentence-local ids and handed to a [`TreeBuilder`].

use crate::adapter::{ConvertError, MalformedResponse, ResponseAdapter};
use crate::document::{Document, Sentence};
use crate::google::labels::{Label, Tag};
use crate::google::response::{AnalyzeSyntaxResponse, Token};
use crate::pool::StringPool;
use crate::tree::{Features, TreeBuilder, Word};
use rustc_hash::FxHashSet;
use std::ops::Range;
use std::sync::Arc;

/// [`ResponseAdapter`] for the Google Cloud Natural Language API
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleCloudAdapter;

impl ResponseAdapter for GoogleCloudAdapter {
    type Response = AnalyzeSyntaxResponse;

    fn to_document(&self, response: &Self::Response) -> Result<Document, ConvertError> {
        document_from_response(response)
    }
}

/// Build a [`Document`] from an `analyzeSyntax` response
///
/// Sentences are delimited by the sentence begin offsets when the response
/// carries offsets for every sentence and token. Otherwise (encoding type
/// `NONE`, or no sentence list) each token is assigned to the sentence of
/// the root its head chain leads to.
pub fn document_from_response(response: &AnalyzeSyntaxResponse) -> Result<Document, ConvertError> {
    let tokens = &response.tokens;
    if tokens.is_empty() {
        return Err(ConvertError::EmptyResponse);
    }

    let heads = resolve_heads(tokens)?;

    let groups = if offsets_available(response) {
        partition_by_offsets(response)?
    } else {
        tracing::warn!(
            tokens = tokens.len(),
            sentences = response.sentences.len(),
            "response has no usable offsets, splitting sentences by root"
        );
        let groups = partition_by_roots(tokens, &heads)?;
        if !response.sentences.is_empty() && groups.len() != response.sentences.len() {
            return Err(MalformedResponse::SentenceCountMismatch {
                groups: groups.len(),
                sentences: response.sentences.len(),
            }
            .into());
        }
        groups
    };

    // Every word is interned before the pool is frozen and shared
    let mut pool = StringPool::new();
    let mut builders = Vec::with_capacity(groups.len());
    for (sentence, range) in groups.iter().enumerate() {
        let mut builder = TreeBuilder::with_capacity(range.len());
        for index in range.clone() {
            builder.add_word(make_word(&mut pool, index, &tokens[index]));
        }

        for index in range.clone() {
            if is_root(index, &tokens[index], &heads) {
                continue;
            }
            let head = heads[index];
            if !range.contains(&head) {
                return Err(MalformedResponse::HeadOutsideSentence {
                    token: index,
                    head,
                    sentence,
                }
                .into());
            }

            tracing::trace!(
                sentence,
                token = index,
                head,
                label = %tokens[index].dependency_edge.label,
                content = %tokens[index].text.content,
                "attaching token"
            );
            builder
                .attach(index - range.start, head - range.start)
                .map_err(|e| {
                    let indices: Vec<usize> = range.clone().collect();
                    MalformedResponse::from_tree_error(e, sentence, &indices)
                })?;
        }
        builders.push(builder);
    }

    let pool = Arc::new(pool);
    let mut sentences = Vec::with_capacity(builders.len());
    for (sentence, (builder, range)) in builders.into_iter().zip(groups).enumerate() {
        let tree = builder.build(Arc::clone(&pool)).map_err(|e| {
            let indices: Vec<usize> = range.clone().collect();
            MalformedResponse::from_tree_error(e, sentence, &indices)
        })?;
        let text = response
            .sentences
            .get(sentence)
            .map(|info| info.text.content.clone());
        tracing::debug!(
            sentence,
            tokens = tree.len(),
            root = tree.root().index(),
            "built sentence"
        );
        sentences.push(Sentence::new(text, tree));
    }

    let language = (!response.language.is_empty()).then(|| response.language.clone());
    tracing::debug!(
        sentences = sentences.len(),
        tokens = tokens.len(),
        strings = pool.len(),
        language = language.as_deref().unwrap_or("unknown"),
        "converted analyzeSyntax response"
    );

    Ok(Document::new(language, sentences))
}

/// A root token points to itself or carries the `ROOT` label
fn is_root(index: usize, token: &Token, heads: &[usize]) -> bool {
    heads[index] == index || token.dependency_edge.label_kind() == Label::Root
}

/// Check every head index against the document-wide token list
fn resolve_heads(tokens: &[Token]) -> Result<Vec<usize>, MalformedResponse> {
    tokens
        .iter()
        .enumerate()
        .map(|(token, t)| {
            let head = t.dependency_edge.head_token_index;
            usize::try_from(head)
                .ok()
                .filter(|&h| h < tokens.len())
                .ok_or(MalformedResponse::HeadOutOfRange {
                    token,
                    head,
                    len: tokens.len(),
                })
        })
        .collect()
}

fn offsets_available(response: &AnalyzeSyntaxResponse) -> bool {
    !response.sentences.is_empty()
        && response.sentences.iter().all(|s| s.text.offset().is_some())
        && response.tokens.iter().all(|t| t.text.offset().is_some())
}

/// One token range per response sentence, by begin offset
fn partition_by_offsets(
    response: &AnalyzeSyntaxResponse,
) -> Result<Vec<Range<usize>>, MalformedResponse> {
    let starts: Vec<usize> = response
        .sentences
        .iter()
        .filter_map(|s| s.text.offset())
        .collect();
    if let Some(sentence) = (1..starts.len()).find(|&i| starts[i] <= starts[i - 1]) {
        return Err(MalformedResponse::SentencesOutOfOrder { sentence });
    }

    let mut counts = vec![0usize; starts.len()];
    let mut previous = 0;
    for (token, t) in response.tokens.iter().enumerate() {
        let offset = t.text.offset().unwrap_or_default();
        let sentence = match starts.partition_point(|&start| start <= offset) {
            0 => {
                return Err(MalformedResponse::TokenOutsideSentences {
                    token,
                    offset: t.text.begin_offset,
                });
            }
            n => n - 1,
        };
        if sentence < previous {
            return Err(MalformedResponse::NonContiguousSentence { token });
        }
        previous = sentence;
        counts[sentence] += 1;
    }

    let mut start = 0;
    Ok(counts
        .into_iter()
        .map(|count| {
            let range = start..start + count;
            start += count;
            range
        })
        .collect())
}

/// Token ranges sharing a root, for responses without offsets
fn partition_by_roots(
    tokens: &[Token],
    heads: &[usize],
) -> Result<Vec<Range<usize>>, MalformedResponse> {
    let mut root_of: Vec<Option<usize>> = vec![None; tokens.len()];
    let mut seen_roots = FxHashSet::default();
    let mut groups: Vec<Range<usize>> = Vec::new();
    let mut current_root = None;

    for token in 0..tokens.len() {
        let root = find_root(token, tokens, heads, &mut root_of).ok_or(
            MalformedResponse::Cycle {
                sentence: groups.len(),
                token,
            },
        )?;

        match groups.last_mut() {
            Some(group) if current_root == Some(root) => group.end = token + 1,
            _ => {
                if !seen_roots.insert(root) {
                    return Err(MalformedResponse::NonContiguousSentence { token });
                }
                groups.push(token..token + 1);
                current_root = Some(root);
            }
        }
    }

    Ok(groups)
}

/// Follow head links from `start` to a root, memoizing along the way
///
/// Returns `None` when the chain loops without reaching a root.
fn find_root(
    start: usize,
    tokens: &[Token],
    heads: &[usize],
    root_of: &mut [Option<usize>],
) -> Option<usize> {
    let mut path = Vec::new();
    let mut current = start;
    let root = loop {
        if let Some(root) = root_of[current] {
            break root;
        }
        if is_root(current, &tokens[current], heads) {
            break current;
        }
        if path.len() > tokens.len() {
            return None;
        }
        path.push(current);
        current = heads[current];
    };

    root_of[current] = Some(root);
    for visited in path {
        root_of[visited] = Some(root);
    }
    Some(root)
}

/// Names are interned verbatim, including ones newer than [`Tag`] and [`Label`]
fn make_word(pool: &mut StringPool, index: usize, token: &Token) -> Word {
    let tag = &token.part_of_speech.tag;
    if token.part_of_speech.tag_kind() == Tag::Unknown && tag != Tag::Unknown.as_str() {
        tracing::warn!(token = index, tag = %tag, "unrecognized part-of-speech tag");
    }
    let label = &token.dependency_edge.label;
    if token.dependency_edge.label_kind() == Label::Unknown && label != Label::Unknown.as_str() {
        tracing::warn!(token = index, label = %label, "unrecognized dependency label");
    }

    let mut feats = Features::new();
    for (name, value) in token.part_of_speech.morphology() {
        feats.insert(pool.get_or_intern(name), pool.get_or_intern(value));
    }

    Word {
        index,
        content: pool.get_or_intern(&token.text.content),
        lemma: pool.get_or_intern(&token.lemma),
        begin_offset: token.text.offset(),
        tag: pool.get_or_intern(tag),
        label: pool.get_or_intern(label),
        feats,
    }
}
