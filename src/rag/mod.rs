mod assembler;
mod index;
mod loader;

pub use assembler::ContextAssembler;
pub use index::{cosine_similarity, ScoredChunk, VectorIndex};
pub use loader::{chunk_text, load_all, load_csv, load_pdf, split_pdf_text, KnowledgeSources};
