//! Artist artwork lookup.
//!
//! Logos and background images have been published under several naming
//! conventions over time. Instead of retrying on load failures, each lookup
//! is an ordered [`CandidateChain`] consumed lazily until a candidate exists
//! or the chain is exhausted, at which point callers fall back to the theme
//! colours.

use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateChain {
    candidates: Vec<PathBuf>,
    cursor: usize,
}

impl CandidateChain {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            cursor: 0,
        }
    }

    /// `{slug}-logo.{jpeg,png,jpg}` at the asset root, then the same names
    /// beneath `images/`.
    pub fn logo(slug: &str) -> Self {
        let mut candidates = Vec::with_capacity(6);
        for dir in [None, Some("images")] {
            for ext in ["jpeg", "png", "jpg"] {
                let name = format!("{slug}-logo.{ext}");
                candidates.push(match dir {
                    Some(dir) => Path::new(dir).join(name),
                    None => PathBuf::from(name),
                });
            }
        }
        Self::new(candidates)
    }

    /// `images/{slug}.{jpeg,png,jpg}`.
    pub fn background(slug: &str) -> Self {
        Self::new(
            ["jpeg", "png", "jpg"]
                .iter()
                .map(|ext| Path::new("images").join(format!("{slug}.{ext}")))
                .collect(),
        )
    }

    /// Hand out the next untried candidate.
    pub fn next_candidate(&mut self) -> Option<&Path> {
        let candidate = self.candidates.get(self.cursor)?;
        self.cursor += 1;
        Some(candidate.as_path())
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.candidates.len()
    }

    pub fn remaining(&self) -> usize {
        self.candidates.len().saturating_sub(self.cursor)
    }

    /// Walk the remaining candidates until `exists` accepts one.
    pub fn resolve<F>(&mut self, mut exists: F) -> Option<PathBuf>
    where
        F: FnMut(&Path) -> bool,
    {
        while let Some(candidate) = self.next_candidate() {
            if exists(candidate) {
                return Some(candidate.to_path_buf());
            }
            debug!(candidate = %candidate.display(), "asset candidate missing");
        }
        None
    }

    /// Resolve against files beneath `root`, returning the full path.
    pub fn resolve_in(&mut self, root: &Path) -> Option<PathBuf> {
        self.resolve(|candidate| root.join(candidate).is_file())
            .map(|found| root.join(found))
    }
}
