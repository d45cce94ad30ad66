//! Python bindings for nlst
//!
//! Python objects hold an `Arc` of the converted document plus indices, so
//! nodes handed to Python stay valid as long as any of them is alive.

use pyo3::exceptions::{PyIOError, PyIndexError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::ConvertError;
use crate::document::{Document as RustDocument, Sentence as RustSentence};
use crate::google::response::{AnalyzeSyntaxResponse, ResponseError};
use crate::google::{self, VerbTripleOptions, document_from_response};
use crate::tree::{NodeId, NodeRef};
use crate::triples::{Triple, find_generic_triples_multi_criteria};

impl From<ConvertError> for PyErr {
    fn from(err: ConvertError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

impl From<ResponseError> for PyErr {
    fn from(err: ResponseError) -> PyErr {
        match err {
            ResponseError::Json(e) => {
                PyValueError::new_err(format!("Invalid response JSON: {}", e))
            }
            other => PyIOError::new_err(other.to_string()),
        }
    }
}

#[pyclass(name = "Document", frozen)]
#[derive(Clone)]
pub struct PyDocument {
    pub(crate) inner: Arc<RustDocument>,
}

impl PyDocument {
    fn sentence(&self, index: usize) -> PyResult<PySentence> {
        if index < self.inner.len() {
            Ok(PySentence {
                doc: Arc::clone(&self.inner),
                index,
            })
        } else {
            Err(PyIndexError::new_err(format!(
                "sentence index out of range: {}",
                index
            )))
        }
    }

    /// Python handles for every triple, sentence by sentence
    fn collect_triples<'a, F, I>(&'a self, mut find: F) -> Vec<(PyTree, PyTree, PyTree)>
    where
        F: FnMut(&'a RustSentence) -> I,
        I: Iterator<Item = Triple<'a>>,
    {
        let mut triples = Vec::new();
        for (index, sentence) in self.inner.sentences().iter().enumerate() {
            let handle = |node: NodeRef<'_>| PyTree {
                doc: Arc::clone(&self.inner),
                sentence: index,
                node: node.id(),
            };
            triples.extend(find(sentence).map(|t| {
                let (left, head, right) = t.as_tuple();
                (handle(left), handle(head), handle(right))
            }));
        }
        triples
    }
}

#[pymethods]
impl PyDocument {
    #[getter]
    fn language(&self) -> Option<String> {
        self.inner.language().map(str::to_string)
    }

    #[getter]
    fn sentences(&self) -> Vec<PySentence> {
        (0..self.inner.len())
            .map(|index| PySentence {
                doc: Arc::clone(&self.inner),
                index,
            })
            .collect()
    }

    /// Every node, sentence by sentence, each in pre-order
    fn tokens(&self) -> Vec<PyTree> {
        self.sentences()
            .iter()
            .flat_map(|sentence| sentence.tokens())
            .collect()
    }

    fn __getitem__(&self, index: usize) -> PyResult<PySentence> {
        self.sentence(index)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }

    fn __repr__(&self) -> String {
        format!("<Document ({} sentences)>", self.inner.len())
    }
}

#[pyclass(name = "Sentence", frozen)]
#[derive(Clone)]
pub struct PySentence {
    doc: Arc<RustDocument>,
    index: usize,
}

impl PySentence {
    fn get(&self) -> &RustSentence {
        &self.doc.sentences()[self.index]
    }

    fn handle(&self, node: NodeRef<'_>) -> PyTree {
        PyTree {
            doc: Arc::clone(&self.doc),
            sentence: self.index,
            node: node.id(),
        }
    }
}

#[pymethods]
impl PySentence {
    #[getter]
    fn text(&self) -> Option<String> {
        self.get().text().map(str::to_string)
    }

    #[getter]
    fn root(&self) -> PyTree {
        self.handle(self.get().root())
    }

    /// Nodes in pre-order from the root
    fn tokens(&self) -> Vec<PyTree> {
        self.get().tokens().map(|node| self.handle(node)).collect()
    }

    /// Nodes in textual order
    fn words_in_order(&self) -> Vec<PyTree> {
        self.get()
            .words_in_order()
            .map(|node| self.handle(node))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.get().len()
    }

    fn __str__(&self) -> String {
        self.get().to_string()
    }

    fn __repr__(&self) -> String {
        format!("<Sentence {}: {} tokens>", self.index, self.get().len())
    }
}

/// A node of a sentence's dependency tree
#[pyclass(name = "Tree", frozen)]
#[derive(Clone)]
pub struct PyTree {
    doc: Arc<RustDocument>,
    sentence: usize,
    node: NodeId,
}

impl PyTree {
    fn node_ref(&self) -> PyResult<NodeRef<'_>> {
        self.doc
            .sentences()
            .get(self.sentence)
            .and_then(|sentence| sentence.tree().node(self.node))
            .ok_or_else(|| PyIndexError::new_err(format!("no such node: {}", self.node)))
    }

    fn handle(&self, node: NodeRef<'_>) -> PyTree {
        PyTree {
            doc: Arc::clone(&self.doc),
            sentence: self.sentence,
            node: node.id(),
        }
    }
}

#[pymethods]
impl PyTree {
    /// Position of the token in the response's token list
    #[getter]
    fn index(&self) -> PyResult<usize> {
        Ok(self.node_ref()?.index())
    }

    #[getter]
    fn content(&self) -> PyResult<String> {
        Ok(self.node_ref()?.content().to_string())
    }

    #[getter]
    fn lemma(&self) -> PyResult<String> {
        Ok(self.node_ref()?.lemma().to_string())
    }

    #[getter]
    fn tag(&self) -> PyResult<String> {
        Ok(self.node_ref()?.tag().to_string())
    }

    #[getter]
    fn label(&self) -> PyResult<String> {
        Ok(self.node_ref()?.label().to_string())
    }

    #[getter]
    fn begin_offset(&self) -> PyResult<Option<usize>> {
        Ok(self.node_ref()?.begin_offset())
    }

    #[getter]
    fn features(&self) -> PyResult<HashMap<String, String>> {
        Ok(self
            .node_ref()?
            .features()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect())
    }

    #[getter]
    fn parent(&self) -> PyResult<Option<PyTree>> {
        Ok(self.node_ref()?.parent().map(|node| self.handle(node)))
    }

    #[getter]
    fn children(&self) -> PyResult<Vec<PyTree>> {
        Ok(self
            .node_ref()?
            .children()
            .map(|node| self.handle(node))
            .collect())
    }

    fn is_root(&self) -> PyResult<bool> {
        Ok(self.node_ref()?.is_root())
    }

    fn depth(&self) -> PyResult<usize> {
        Ok(self.node_ref()?.depth())
    }

    /// Pre-order walk of this subtree, starting with this node
    fn walk(&self) -> PyResult<Vec<PyTree>> {
        Ok(self.node_ref()?.walk().map(|node| self.handle(node)).collect())
    }

    #[pyo3(signature = (verbose=false))]
    fn string_repr(&self, verbose: bool) -> PyResult<String> {
        Ok(self.node_ref()?.string_repr(verbose))
    }

    #[pyo3(signature = (max_depth=None, verbose=false))]
    fn printable_tree(&self, max_depth: Option<usize>, verbose: bool) -> PyResult<String> {
        Ok(self.node_ref()?.printable_tree(max_depth, verbose))
    }

    fn __eq__(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc)
            && self.sentence == other.sentence
            && self.node == other.node
    }

    fn __hash__(&self) -> u64 {
        ((self.sentence as u64) << 32) ^ self.node as u64
    }

    fn __str__(&self) -> PyResult<String> {
        Ok(self.node_ref()?.to_string())
    }

    fn __repr__(&self) -> PyResult<String> {
        Ok(format!("<Tree {}>", self.node_ref()?.string_repr(true)))
    }
}

/// Convert an `analyzeSyntax` JSON response into a Document
#[pyfunction]
fn document_from_json(json: &str) -> PyResult<PyDocument> {
    let response = AnalyzeSyntaxResponse::from_json_str(json)?;
    Ok(PyDocument {
        inner: Arc::new(document_from_response(&response)?),
    })
}

/// Load a saved response (plain or gzipped JSON) into a Document
#[pyfunction]
fn load_document(path: &str) -> PyResult<PyDocument> {
    let response = AnalyzeSyntaxResponse::from_path(path)?;
    Ok(PyDocument {
        inner: Arc::new(document_from_response(&response)?),
    })
}

#[pyfunction]
#[pyo3(signature = (doc, active_voice=true, passive_voice=true))]
fn find_verb_triples(
    doc: &PyDocument,
    active_voice: bool,
    passive_voice: bool,
) -> Vec<(PyTree, PyTree, PyTree)> {
    let options = VerbTripleOptions {
        active_voice,
        passive_voice,
    };
    doc.collect_triples(|sentence| google::find_verb_triples(sentence, options))
}

#[pyfunction]
fn find_generic_triples(
    doc: &PyDocument,
    left_labels: Vec<String>,
    head_tags: Vec<String>,
    right_labels: Vec<String>,
) -> Vec<(PyTree, PyTree, PyTree)> {
    let left: Vec<&str> = left_labels.iter().map(String::as_str).collect();
    let heads: Vec<&str> = head_tags.iter().map(String::as_str).collect();
    let right: Vec<&str> = right_labels.iter().map(String::as_str).collect();
    doc.collect_triples(|sentence| {
        find_generic_triples_multi_criteria(sentence, &left, &heads, &right)
    })
}

#[pyfunction]
fn __version__() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[pymodule]
fn nlst(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDocument>()?;
    m.add_class::<PySentence>()?;
    m.add_class::<PyTree>()?;

    m.add_function(wrap_pyfunction!(document_from_json, m)?)?;
    m.add_function(wrap_pyfunction!(load_document, m)?)?;
    m.add_function(wrap_pyfunction!(find_verb_triples, m)?)?;
    m.add_function(wrap_pyfunction!(find_generic_triples, m)?)?;
    m.add_function(wrap_pyfunction!(__version__, m)?)?;

    Ok(())
}
