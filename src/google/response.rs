//! Wire records for `documents:analyzeSyntax` responses
//!
//! Field names follow the REST (camelCase) JSON. proto3 JSON leaves out
//! fields holding their zero value, so every field has a default: offsets
//! and head indices default to 0 and enum names to `UNKNOWN`.
//!
//! Tag and label names are kept verbatim so names newer than [`Tag`] and
//! [`Label`] survive conversion; the typed values are derived on demand.

use crate::google::labels::{Label, Tag};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a saved response
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid response JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Response of the `analyzeSyntax` method
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeSyntaxResponse {
    pub sentences: Vec<SentenceInfo>,
    pub tokens: Vec<Token>,
    /// Language of the text, detected or as given in the request
    pub language: String,
}

impl AnalyzeSyntaxResponse {
    pub fn from_json_str(json: &str) -> Result<Self, ResponseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ResponseError> {
        Ok(serde_json::from_reader(BufReader::new(reader))?)
    }

    /// Load a response saved as JSON; `.gz` files are decompressed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResponseError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ResponseError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        if path.extension().is_some_and(|ext| ext == "gz") {
            Self::from_reader(GzDecoder::new(file))
        } else {
            Self::from_reader(file)
        }
    }
}

/// A span of the analyzed text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSpan {
    pub content: String,
    /// Offset of the span in the request text; -1 when the request used
    /// encoding type `NONE`
    pub begin_offset: i64,
}

impl Default for TextSpan {
    fn default() -> Self {
        Self {
            content: String::new(),
            begin_offset: 0,
        }
    }
}

impl TextSpan {
    pub fn offset(&self) -> Option<usize> {
        usize::try_from(self.begin_offset).ok()
    }
}

/// A sentence boundary reported by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentenceInfo {
    pub text: TextSpan,
}

/// A token and its syntactic information
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
    pub text: TextSpan,
    pub part_of_speech: PartOfSpeech,
    pub dependency_edge: DependencyEdge,
    pub lemma: String,
}

fn unknown_name() -> String {
    "UNKNOWN".to_string()
}

/// Part-of-speech tag and morphology
///
/// Morphology values are kept as the API's enum names (`"SINGULAR"`,
/// `"PAST"`); the `*_UNKNOWN` names mean the attribute is not applicable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartOfSpeech {
    #[serde(default = "unknown_name")]
    pub tag: String,
    pub aspect: Option<String>,
    pub case: Option<String>,
    pub form: Option<String>,
    pub gender: Option<String>,
    pub mood: Option<String>,
    pub number: Option<String>,
    pub person: Option<String>,
    pub proper: Option<String>,
    pub reciprocity: Option<String>,
    pub tense: Option<String>,
    pub voice: Option<String>,
}

impl Default for PartOfSpeech {
    fn default() -> Self {
        Self {
            tag: unknown_name(),
            aspect: None,
            case: None,
            form: None,
            gender: None,
            mood: None,
            number: None,
            person: None,
            proper: None,
            reciprocity: None,
            tense: None,
            voice: None,
        }
    }
}

impl PartOfSpeech {
    /// Typed tag; names this crate does not know give [`Tag::Unknown`]
    pub fn tag_kind(&self) -> Tag {
        self.tag.parse().unwrap_or_default()
    }

    /// Applicable morphological attributes as (name, value) pairs
    pub fn morphology(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("aspect", &self.aspect),
            ("case", &self.case),
            ("form", &self.form),
            ("gender", &self.gender),
            ("mood", &self.mood),
            ("number", &self.number),
            ("person", &self.person),
            ("proper", &self.proper),
            ("reciprocity", &self.reciprocity),
            ("tense", &self.tense),
            ("voice", &self.voice),
        ]
        .into_iter()
        .filter_map(|(name, value)| {
            let value = value.as_deref()?;
            (!value.is_empty() && !value.ends_with("_UNKNOWN")).then_some((name, value))
        })
    }
}

/// Edge to the token's head
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyEdge {
    /// Index of the head in the response's token list; the root points to
    /// itself
    pub head_token_index: i64,
    #[serde(default = "unknown_name")]
    pub label: String,
}

impl Default for DependencyEdge {
    fn default() -> Self {
        Self {
            head_token_index: 0,
            label: unknown_name(),
        }
    }
}

impl DependencyEdge {
    /// Typed label; names this crate does not know give [`Label::Unknown`]
    pub fn label_kind(&self) -> Label {
        self.label.parse().unwrap_or_default()
    }
}
