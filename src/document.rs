//! Sentences and documents
//!
//! A [`Sentence`] owns one dependency [`Tree`]; a [`Document`] owns its
//! sentences in order of appearance. Both are built once by a response
//! adapter and never change afterward.

use crate::tree::{NodeRef, Tree, Walk};
use std::fmt;

/// One sentence of analyzed text
#[derive(Debug, Clone)]
pub struct Sentence {
    text: Option<String>,
    tree: Tree,
}

impl Sentence {
    pub fn new(text: Option<String>, tree: Tree) -> Self {
        Self { text, tree }
    }

    /// Sentence text, when the provider reports it
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    /// Number of tokens in the sentence
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Every token, in pre-order from the root
    ///
    /// Children are visited in token order. Use
    /// [`words_in_order`](Self::words_in_order) for textual order.
    pub fn tokens(&self) -> Walk<'_> {
        self.tree.root().walk()
    }

    /// Every token in textual order
    pub fn words_in_order(&self) -> impl ExactSizeIterator<Item = NodeRef<'_>> + '_ {
        self.tree.nodes()
    }

    pub fn string_repr(&self, verbose: bool) -> String {
        format!(
            "Sentence: '{}'\n{}",
            self.text().unwrap_or_default(),
            self.root().printable_tree(None, verbose)
        )
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_repr(true))
    }
}

/// An analyzed document
#[derive(Debug, Clone, Default)]
pub struct Document {
    language: Option<String>,
    sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(language: Option<String>, sentences: Vec<Sentence>) -> Self {
        Self {
            language,
            sentences,
        }
    }

    /// Language code reported by the provider (e.g. `en`)
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Every token of every sentence, sentence by sentence
    pub fn tokens(&self) -> impl Iterator<Item = NodeRef<'_>> + '_ {
        self.sentences.iter().flat_map(Sentence::tokens)
    }

    pub fn string_repr(&self, verbose: bool) -> String {
        let mut ret = format!("Document ({} sentences)\n", self.sentences.len());
        for sentence in &self.sentences {
            ret.push_str(&sentence.string_repr(verbose));
            ret.push('\n');
            ret.push_str(&"-".repeat(20));
            ret.push('\n');
        }
        ret
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string_repr(true))
    }
}

/// Anything traversal helpers can run over: a whole document or one sentence
pub trait SentenceSource {
    fn sentences(&self) -> &[Sentence];
}

impl SentenceSource for Document {
    fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }
}

impl SentenceSource for Sentence {
    fn sentences(&self) -> &[Sentence] {
        std::slice::from_ref(self)
    }
}

impl SentenceSource for [Sentence] {
    fn sentences(&self) -> &[Sentence] {
        self
    }
}
