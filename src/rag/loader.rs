use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use tripguide_types::{ChunkSource, DocumentChunk};

/// Maximum characters per PDF chunk
const PDF_CHUNK_SIZE: usize = 1000;
/// Characters shared by consecutive PDF chunks
const PDF_CHUNK_OVERLAP: usize = 200;

/// Knowledge files loaded at startup; both are optional
#[derive(Debug, Clone)]
pub struct KnowledgeSources {
    pub csv: PathBuf,
    pub pdf: PathBuf,
}

/// Load every source, skipping the ones that are missing or unreadable
pub fn load_all(sources: &KnowledgeSources) -> Vec<DocumentChunk> {
    let mut chunks = Vec::new();

    match load_csv(&sources.csv) {
        Ok(csv_chunks) => {
            tracing::info!(
                "Loaded {} rows from {}",
                csv_chunks.len(),
                sources.csv.display()
            );
            chunks.extend(csv_chunks);
        }
        Err(e) => tracing::warn!("CSV skipped: {:#}", e),
    }

    match load_pdf(&sources.pdf) {
        Ok(pdf_chunks) => {
            tracing::info!(
                "Loaded {} chunks from {}",
                pdf_chunks.len(),
                sources.pdf.display()
            );
            chunks.extend(pdf_chunks);
        }
        Err(e) => tracing::warn!("PDF skipped: {:#}", e),
    }

    tracing::info!("Total documents loaded: {}", chunks.len());
    chunks
}

/// One chunk per CSV row, rendered as `header: value` lines
pub fn load_csv(path: &Path) -> Result<Vec<DocumentChunk>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    csv_chunks(file, &path.to_string_lossy())
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))
}

fn csv_chunks<R: Read>(reader: R, source_path: &str) -> Result<Vec<DocumentChunk>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let mut chunks = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let content = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| format!("{}: {}", header, value))
            .collect::<Vec<_>>()
            .join("\n");

        if content.trim().is_empty() {
            continue;
        }

        chunks.push(DocumentChunk {
            content,
            source: ChunkSource::Csv {
                path: source_path.to_string(),
                row,
            },
        });
    }

    Ok(chunks)
}

/// Text chunks extracted from a PDF
pub fn load_pdf(path: &Path) -> Result<Vec<DocumentChunk>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF file: {}", path.display()))?;
    // pdf-extract panics on some malformed documents
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes))
        .map_err(|_| anyhow::anyhow!("PDF parser panicked on {}", path.display()))?
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

    let source_path = path.to_string_lossy().to_string();
    Ok(split_pdf_text(&text)
        .into_iter()
        .enumerate()
        .map(|(part, content)| DocumentChunk {
            content,
            source: ChunkSource::Pdf {
                path: source_path.clone(),
                part,
            },
        })
        .collect())
}

/// Split extracted PDF text on page breaks, then window long pages
pub fn split_pdf_text(text: &str) -> Vec<String> {
    text.split('\x0c')
        .flat_map(|page| chunk_text(page, PDF_CHUNK_SIZE, PDF_CHUNK_OVERLAP))
        .collect()
}

/// Split text into overlapping character windows
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim().to_string();
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        if end >= chars.len() {
            break;
        }
        start += step;
    }

    chunks
}
