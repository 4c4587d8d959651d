//! Ingestion helpers: reading sources from disk and naming outputs

mod filename;
mod source;

pub use filename::webp_filename;
pub use source::{content_type_from_extension, detect_content_type, load_source};
