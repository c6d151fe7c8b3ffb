use crate::domain::request::RequestDraft;
use crate::error::{Result, WalletError};
use std::io::Read;

/// Reads balance change requests from a CSV source.
///
/// Expected header: `wallet, operation, amount`. Rows come out as unvalidated
/// [`RequestDraft`]s so the caller can report every violated constraint of a row
/// instead of just the first parse error.
pub struct RequestReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads request drafts, one per row.
    pub fn requests(self) -> impl Iterator<Item = Result<RequestDraft>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(WalletError::from))
    }
}
