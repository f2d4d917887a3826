//! Tagged result collection
//!
//! The coordinator feeds every [`StatResult`] it receives into a
//! [`ResultCollector`]. Results are slotted by their kind tag, never by the
//! order they arrive in, so workers may finish in any order.
//!
//! # Example
//!
//! ```
//! use procbench::stats::{StatKind, StatResult, collector::ResultCollector};
//!
//! let mut collector = ResultCollector::new();
//! collector.record(StatResult::new(StatKind::StdDev, 1.5)).unwrap();
//! collector.record(StatResult::new(StatKind::Median, 3.0)).unwrap();
//! collector.record(StatResult::new(StatKind::Mean, 2.0)).unwrap();
//!
//! assert!(collector.is_complete());
//! let stats = collector.finish().unwrap();
//! assert_eq!(stats.median, 3.0);
//! ```

use super::{StatKind, StatResult, Statistics};
use crate::worker::WorkerError;

/// Collects exactly one result per [`StatKind`]
#[derive(Debug, Default)]
pub struct ResultCollector {
    slots: [Option<f64>; 3],
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result in its kind's slot
    ///
    /// A second result for a kind that is already filled is rejected and the
    /// first value is kept.
    pub fn record(&mut self, result: StatResult) -> Result<(), WorkerError> {
        let slot = &mut self.slots[result.kind.index()];
        if slot.is_some() {
            return Err(WorkerError::Duplicate(result.kind));
        }
        *slot = Some(result.value);
        Ok(())
    }

    /// Number of kinds received so far
    pub fn received(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Kinds that have not reported yet, in dispatch order
    pub fn missing(&self) -> Vec<StatKind> {
        StatKind::ALL
            .into_iter()
            .filter(|k| self.slots[k.index()].is_none())
            .collect()
    }

    /// Assemble the final statistics
    pub fn finish(self) -> Result<Statistics, WorkerError> {
        match self.slots {
            [Some(mean), Some(median), Some(std_dev)] => Ok(Statistics { mean, median, std_dev }),
            _ => Err(WorkerError::Missing(self.missing())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_new() {
        let collector = ResultCollector::new();
        assert_eq!(collector.received(), 0);
        assert!(!collector.is_complete());
        assert_eq!(collector.missing(), StatKind::ALL.to_vec());
    }

    #[test]
    fn test_collector_reverse_order() {
        let mut collector = ResultCollector::new();
        for kind in StatKind::ALL.iter().rev() {
            collector.record(StatResult::new(*kind, kind.index() as f64)).unwrap();
        }

        assert!(collector.is_complete());
        let stats = collector.finish().unwrap();
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.median, 1.0);
        assert_eq!(stats.std_dev, 2.0);
    }

    #[test]
    fn test_collector_duplicate() {
        let mut collector = ResultCollector::new();
        collector.record(StatResult::new(StatKind::Median, 1.0)).unwrap();

        let err = collector.record(StatResult::new(StatKind::Median, 2.0)).unwrap_err();
        assert!(matches!(err, WorkerError::Duplicate(StatKind::Median)));
        assert_eq!(collector.received(), 1);
    }

    #[test]
    fn test_collector_missing() {
        let mut collector = ResultCollector::new();
        collector.record(StatResult::new(StatKind::Mean, 1.0)).unwrap();

        match collector.finish() {
            Err(WorkerError::Missing(kinds)) => {
                assert_eq!(kinds, vec![StatKind::Median, StatKind::StdDev]);
            }
            other => panic!("expected Missing, got {:?}", other),
        }
    }
}
