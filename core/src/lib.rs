pub mod collection;
pub mod error;
pub mod index;
pub mod normalizer;
pub mod persist;
pub mod query;

pub use collection::{parse_collection, read_collection, Collection};
pub use error::{Error, Result};
pub use index::{build, build_from_collection, DocId, IndexStats, InvertedIndex, Postings, TermEntry};
pub use normalizer::{default_normalizer, normalize, Normalizer, Stem};
pub use persist::IndexStore;
pub use query::{eval_conjunction, eval_disjunction, format_results, ConjunctiveQuery, Query};
