//! The shared domain-name corpus.

use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

//------------ Corpus --------------------------------------------------------

/// An ordered list of domain names to resolve.
///
/// The corpus is loaded once, is immutable thereafter, and is safely shared
/// by all workers of a run without synchronization. A run only ever
/// consumes a bounded prefix of it.
#[derive(Clone, Debug)]
pub struct Corpus {
    domains: Vec<String>,
}

impl Corpus {
    /// Loads the corpus from a gzip-compressed, newline-delimited file.
    pub fn load_gzip(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        Self::from_reader(GzDecoder::new(File::open(path)?))
    }

    /// Loads the corpus from newline-delimited UTF-8 text.
    ///
    /// Blank lines are skipped, surrounding whitespace is dropped.
    pub fn from_reader(reader: impl Read) -> Result<Self, io::Error> {
        let mut domains = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                domains.push(line.into());
            }
        }
        Ok(Corpus { domains })
    }

    /// Creates a corpus directly from a list of names.
    pub fn from_lines(
        lines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Corpus {
            domains: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the first `count` domains, or all of them if fewer exist.
    pub fn prefix(&self, count: usize) -> &[String] {
        &self.domains[..count.min(self.domains.len())]
    }

    /// Returns the number of domains in the corpus.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns whether the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

//============ Testing =======================================================
