//! Record source abstraction.
//!
//! The histogramming core never opens files itself; it pulls records from
//! an [`EventSource`] until the source is exhausted.

use crate::Result;
use crate::types::EventRecord;

/// Ordered, finite producer of event records.
///
/// `None` means the stream is exhausted. An `Err` is fatal to the run.
pub trait EventSource {
    /// Produce the next record in source order.
    fn next_record(&mut self) -> Option<Result<EventRecord>>;

    /// Number of records, if known up front.
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

/// Any iterator of record results is a source (handy for tests and in-memory runs).
impl<I> EventSource for I
where
    I: Iterator<Item = Result<EventRecord>>,
{
    fn next_record(&mut self) -> Option<Result<EventRecord>> {
        self.next()
    }

    fn len_hint(&self) -> Option<u64> {
        match self.size_hint() {
            (lo, Some(hi)) if lo == hi => Some(lo as u64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterator_is_a_source() {
        let records: Vec<Result<EventRecord>> =
            vec![Ok(EventRecord::new(Vec::new(), 1.0)), Ok(EventRecord::new(Vec::new(), -0.5))];
        let mut src = records.into_iter();
        assert_eq!(src.len_hint(), Some(2));
        assert_eq!(src.next_record().unwrap().unwrap().weight, 1.0);
        assert_eq!(src.next_record().unwrap().unwrap().weight, -0.5);
        assert!(src.next_record().is_none());
    }
}
