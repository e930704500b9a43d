//! Find the longest byte substrings repeated a required number of times in
//! every document of a corpus.
//!
//! Document names encode their required repeat count as `repeats=<N>`. An
//! inverted index is seeded with the single bytes meeting every document's
//! threshold, then grown bottom-up: each pass extends the surviving
//! length-m terms to length m+1 by intersecting sorted offset lists, until
//! no term survives or a length cap is reached.
//!
//! ```no_run
//! use repfind_core::{collect_documents, find_repeats, InvertedIndex, SearchConfig};
//!
//! # fn main() -> repfind_core::Result<()> {
//! let names = repfind_core::read_file_list("corpus.txt".as_ref())?;
//! let specs = collect_documents(&names)?;
//! let index = InvertedIndex::build(specs)?;
//! let results = find_repeats(&index, &SearchConfig::default());
//! println!("{} longest, converged: {}", results.longest.len(), results.converged);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod index;
pub mod manifest;
pub mod repeats;
pub mod scan;

pub use error::{Error, Result};
pub use index::{DocId, DocRecord, InvertedIndex, Offset, Postings, Term};
pub use manifest::{collect_documents, read_file_list, required_repeats, DocSpec};
pub use repeats::{find_repeats, RepeatsResults, SearchConfig, MAX_SUBSTRING_LEN};
