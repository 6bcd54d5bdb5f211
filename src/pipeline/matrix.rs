use std::io::{Read, Write};

use indexmap::{IndexMap, IndexSet};
use num::Num;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::PipelineError;

use super::filter::DocTerms;
use super::loader::DocId;

/// What to do with documents that lost every term during filtering.
/// Such rows are never emitted silently: an all-zero row destabilizes an
/// external topic-model estimator expecting nonempty documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyDocPolicy {
    /// Drop the row; the dropped ids are reported.
    #[default]
    Drop,
    /// Keep the row as an explicit zero vector.
    KeepZeroRows,
}

/// Sparse document-term matrix in CSR layout.
///
/// Rows follow the pipeline's document order (ascending ids as assigned at
/// load time); columns are the surviving vocabulary in lexicographic order.
/// Both orders are fixed and deterministic so that an external estimator
/// seeded with a fixed seed reproduces its run exactly. Cells hold raw
/// occurrence counts, not weights.
///
/// `N` is the cell type; the pipeline produces `u32` counts, and estimators
/// wanting floats can convert with [`DocTermMatrix::map_values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocTermMatrix<N>
where
    N: Num + Copy,
{
    /// Row start offsets into `col_indices`/`values`, length `rows + 1`.
    row_offsets: Vec<usize>,
    /// Column index of each nonzero, ascending within a row.
    col_indices: Vec<u32>,
    /// Nonzero cell values, parallel to `col_indices`.
    values: Vec<N>,
    /// Row index -> document id.
    doc_ids: Vec<DocId>,
    /// Column index -> term, lexicographically sorted.
    terms: Vec<String>,
}

impl DocTermMatrix<u32> {
    /// Assemble the matrix from the final (document, term, count) table.
    ///
    /// # Arguments
    /// * `docs` - per-document counts in document order
    /// * `policy` - handling of documents with zero surviving terms
    ///
    /// # Returns
    /// * `(DocTermMatrix<u32>, Vec<DocId>)` - the matrix and the ids of
    ///   empty documents (dropped or kept as zero rows per `policy`)
    pub fn from_doc_terms(docs: &[DocTerms], policy: EmptyDocPolicy) -> (Self, Vec<DocId>) {
        // freeze the vocabulary: lexicographic column order
        let mut terms: Vec<String> = {
            let mut seen = IndexSet::new();
            for doc in docs {
                for term in doc.counts.keys() {
                    seen.insert(term.clone());
                }
            }
            seen.into_iter().collect()
        };
        terms.sort_unstable();
        let col_of: IndexMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(col, term)| (term.clone(), col as u32))
            .collect();

        let empty_docs: Vec<DocId> = docs
            .iter()
            .filter(|d| d.is_empty())
            .map(|d| d.doc_id)
            .collect();

        let mut row_offsets = vec![0usize];
        let mut col_indices = Vec::new();
        let mut values = Vec::new();
        let mut doc_ids = Vec::new();

        for doc in docs {
            if doc.is_empty() && policy == EmptyDocPolicy::Drop {
                continue;
            }
            let mut row: Vec<(u32, u32)> = doc
                .counts
                .iter()
                .map(|(term, &count)| (col_of[term.as_str()], count))
                .collect();
            row.sort_unstable_by_key(|&(col, _)| col);
            for (col, count) in row {
                col_indices.push(col);
                values.push(count);
            }
            row_offsets.push(col_indices.len());
            doc_ids.push(doc.doc_id);
        }

        (
            Self {
                row_offsets,
                col_indices,
                values,
                doc_ids,
                terms,
            },
            empty_docs,
        )
    }
}

impl<N> DocTermMatrix<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn rows(&self) -> usize {
        self.doc_ids.len()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.terms.len()
    }

    /// Number of stored nonzero cells.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row index -> document id mapping.
    #[inline]
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// Column index -> term mapping.
    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column of a term, if it survived into the vocabulary.
    pub fn col_of_term(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    /// Row of a document id, if it survived into the matrix.
    pub fn row_of_doc(&self, doc_id: DocId) -> Option<usize> {
        self.doc_ids.binary_search(&doc_id).ok()
    }

    /// Cell value; absent cells are zero.
    pub fn get(&self, row: usize, col: usize) -> N {
        let range = self.row_offsets[row]..self.row_offsets[row + 1];
        match self.col_indices[range.clone()].binary_search(&(col as u32)) {
            Ok(pos) => self.values[range.start + pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate the nonzero cells of one row as `(col, value)`.
    pub fn row_iter(&self, row: usize) -> impl Iterator<Item = (u32, N)> + '_ {
        let range = self.row_offsets[row]..self.row_offsets[row + 1];
        self.col_indices[range.clone()]
            .iter()
            .zip(self.values[range].iter())
            .map(|(&col, &value)| (col, value))
    }

    /// Convert cell values, keeping structure and mappings.
    pub fn map_values<M, F>(&self, mut f: F) -> DocTermMatrix<M>
    where
        M: Num + Copy,
        F: FnMut(N) -> M,
    {
        DocTermMatrix {
            row_offsets: self.row_offsets.clone(),
            col_indices: self.col_indices.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
            doc_ids: self.doc_ids.clone(),
            terms: self.terms.clone(),
        }
    }

    /// Dense copy, rows by columns. Intended for small matrices and tests.
    pub fn to_dense(&self) -> Vec<Vec<N>> {
        (0..self.rows())
            .map(|row| (0..self.cols()).map(|col| self.get(row, col)).collect())
            .collect()
    }

    /// Persist the matrix (with its row and column mappings) as CBOR.
    pub fn save_cbor<W: Write>(&self, writer: W) -> Result<(), PipelineError>
    where
        N: Serialize,
    {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }

    /// Load a matrix previously written with [`DocTermMatrix::save_cbor`].
    pub fn load_cbor<R: Read>(reader: R) -> Result<Self, PipelineError>
    where
        N: DeserializeOwned,
    {
        Ok(serde_cbor::from_reader(reader)?)
    }
}
