use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Result;
use crate::manifest::DocSpec;
use crate::scan;

/// Byte position of a term occurrence within one document.
pub type Offset = u32;
pub type DocId = u32;

/// A term is a raw byte string; repetitions of terms are what get counted.
pub type Term = Vec<u8>;

/// A document admitted to the index, with its required repeat count.
#[derive(Debug, Clone)]
pub struct DocRecord {
    pub name: String,
    pub required: u32,
    pub size: u64,
}

impl From<DocSpec> for DocRecord {
    fn from(spec: DocSpec) -> Self {
        DocRecord {
            name: spec.path.display().to_string(),
            required: spec.required,
            size: spec.size,
        }
    }
}

/// Where one term occurs: per-document sorted offset lists plus the total
/// occurrence count over all documents.
#[derive(Debug, Clone, Default)]
pub struct Postings {
    pub total: usize,
    pub offsets: BTreeMap<DocId, Vec<Offset>>,
}

impl Postings {
    pub fn add_offsets(&mut self, doc: DocId, offsets: Vec<Offset>) {
        self.total += offsets.len();
        self.offsets.insert(doc, offsets);
    }
}

/// Inverted index seeded with single-byte terms that occur at least the
/// required number of times in every admitted document. The extension
/// engine grows terms from this seed; the index itself keeps the
/// length-1 postings for the whole run.
pub struct InvertedIndex {
    pub(crate) terms: BTreeMap<Term, Postings>,
    pub(crate) docs: Vec<DocRecord>,
    pub(crate) allowed: HashSet<u8>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        InvertedIndex {
            terms: BTreeMap::new(),
            docs: Vec::new(),
            allowed: (0..=255).collect(),
        }
    }

    /// Ingest every document and seed the index. Documents are processed in
    /// ascending order of repeat size so the most selective alphabet prunes
    /// first; a document in which no byte qualifies is skipped and gets no
    /// doc id.
    pub fn build(mut specs: Vec<DocSpec>) -> Result<InvertedIndex> {
        specs.sort_by(|a, b| a.repeat_size().total_cmp(&b.repeat_size()));

        let mut index = InvertedIndex::new();
        for spec in specs {
            let offsets = scan::scan_document(&spec.path, spec.required, &mut index.allowed)?;
            if offsets.is_empty() {
                tracing::warn!(doc = %spec.path.display(), "no byte repeats often enough, skipping");
                continue;
            }
            index.add_document(DocRecord::from(spec), offsets);
        }
        Ok(index)
    }

    /// Add one scanned document. Terms absent from the document (or no
    /// longer in the allowed alphabet) are erased from the index; the rest
    /// gain the document's offset list under the next dense doc id.
    pub fn add_document(&mut self, record: DocRecord, mut byte_offsets: HashMap<u8, Vec<Offset>>) {
        let common: HashSet<u8> = byte_offsets
            .keys()
            .copied()
            .filter(|b| self.allowed.contains(b))
            .collect();
        self.terms.retain(|term, _| common.contains(&term[0]));

        let doc = self.docs.len() as DocId;
        tracing::debug!(doc, name = %record.name, bytes = common.len(), "adding document");
        self.docs.push(record);

        for &b in &common {
            let offsets = byte_offsets.remove(&b).expect("byte in common set");
            self.terms.entry(vec![b]).or_default().add_offsets(doc, offsets);
        }
    }

    pub fn docs(&self) -> &[DocRecord] {
        &self.docs
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Total number of offsets stored across all postings.
    pub fn total_offsets(&self) -> usize {
        self.terms.values().map(|p| p.total).sum()
    }

    /// Log a summary of the index contents.
    pub fn show(&self, title: &str) {
        tracing::debug!(
            title,
            terms = self.terms.len(),
            docs = self.docs.len(),
            allowed = self.allowed.len(),
            total_offsets = self.total_offsets(),
            "inverted index"
        );
    }
}

impl Default for InvertedIndex {
    fn default() -> Self {
        Self::new()
    }
}
