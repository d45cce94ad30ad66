//! Provider-neutral conversion of syntax-analysis responses
//!
//! Each provider implements [`ResponseAdapter`] for its own response type.
//! Conversion is all-or-nothing: a single malformed sentence fails the whole
//! response.

use crate::document::Document;
use crate::tree::TreeError;
use thiserror::Error;

/// Converts a provider response into a [`Document`]
pub trait ResponseAdapter {
    type Response;

    fn to_document(&self, response: &Self::Response) -> Result<Document, ConvertError>;
}

/// Error converting a response into a document
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("response contains no tokens")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(#[from] MalformedResponse),
}

impl ConvertError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ConvertError::Malformed(_))
    }
}

/// Structural problem in a response
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedResponse {
    #[error("token {token} has head index {head}, but the response has {len} tokens")]
    HeadOutOfRange { token: usize, head: i64, len: usize },

    #[error("token {token} in sentence {sentence} has its head {head} in another sentence")]
    HeadOutsideSentence {
        token: usize,
        head: usize,
        sentence: usize,
    },

    #[error("sentence {sentence} has no root token")]
    MissingRoot { sentence: usize },

    #[error("sentence {sentence} has several root tokens: {roots:?}")]
    MultipleRoots { sentence: usize, roots: Vec<usize> },

    #[error("token {token} in sentence {sentence} does not lead to the root")]
    Cycle { sentence: usize, token: usize },

    #[error("token {token} starts at offset {offset}, before the first sentence")]
    TokenOutsideSentences { token: usize, offset: i64 },

    #[error("sentence {sentence} starts at or before the previous sentence")]
    SentencesOutOfOrder { sentence: usize },

    #[error("tokens form {groups} sentences, but the response lists {sentences}")]
    SentenceCountMismatch { groups: usize, sentences: usize },

    #[error("token {token} belongs to a sentence that ended earlier")]
    NonContiguousSentence { token: usize },
}

impl MalformedResponse {
    /// Map a tree-building failure in `sentence` to response terms
    ///
    /// `indices` translates sentence-local node ids back to token indices.
    pub fn from_tree_error(error: TreeError, sentence: usize, indices: &[usize]) -> Self {
        let token = |id: usize| indices.get(id).copied().unwrap_or(id);
        match error {
            TreeError::MissingRoot => MalformedResponse::MissingRoot { sentence },
            TreeError::MultipleRoots(ids) => MalformedResponse::MultipleRoots {
                sentence,
                roots: ids.into_iter().map(token).collect(),
            },
            TreeError::Unreachable(id) => MalformedResponse::Cycle {
                sentence,
                token: token(id),
            },
            TreeError::NoSuchNode(id)
            | TreeError::SelfAttachment(id)
            | TreeError::AlreadyAttached { child: id, .. } => MalformedResponse::Cycle {
                sentence,
                token: token(id),
            },
        }
    }
}
