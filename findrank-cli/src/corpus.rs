use anyhow::{Context, Result};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::{debug, info, trace};

/// A file read from disk, addressed by its `/`-separated path relative to
/// the search root
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub text: String,
}

/// Lists the files under `root`, honouring `.gitignore` and hidden-file
/// rules, sorted by relative path so output order is stable.
pub fn collect_files(root: &Path) -> Vec<String> {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .standard_filters(true)
        .require_git(false)
        .sort_by_file_path(|a, b| a.cmp(b));

    debug!("Scanning directory: {}", root.display());
    let files: Vec<String> = builder
        .build()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?;
            Some(relative.to_string_lossy().replace('\\', "/"))
        })
        .collect();

    info!("Found {} files under {}", files.len(), root.display());
    files
}

/// Reads `files` on a pool of `threads` workers. Files that are not valid
/// UTF-8 or cannot be read are left out. Output keeps the input order.
pub fn read_documents(root: &Path, files: &[String], threads: NonZeroUsize) -> Result<Vec<Document>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.get())
        .build()
        .context("Failed to build reader thread pool")?;

    let documents: Vec<Document> = pool.install(|| {
        files
            .par_iter()
            .filter_map(|path| match fs::read_to_string(root.join(path)) {
                Ok(text) => {
                    trace!("Read {} ({} bytes)", path, text.len());
                    Some(Document {
                        path: path.clone(),
                        text,
                    })
                }
                Err(e) => {
                    debug!("Skipping {}: {}", path, e);
                    None
                }
            })
            .collect()
    });

    debug!(
        "Read {} of {} files with {} threads",
        documents.len(),
        files.len(),
        threads
    );
    Ok(documents)
}
