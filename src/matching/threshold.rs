use crate::core::TargetRecord;

/// Strict cutoff rule: a target passes only if its ratio is above `cutoff`
#[must_use]
pub fn passes_threshold(matching_ratio: f64, cutoff: f64) -> bool {
    matching_ratio > cutoff
}

/// Set `pass_threshold` on every record
pub fn apply_threshold(records: &mut [TargetRecord], cutoff: f64) {
    for record in records {
        record.pass_threshold = passes_threshold(record.matching_ratio, cutoff);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TargetSpec;

    fn record(n_barcodes: usize, n_matching: usize) -> TargetRecord {
        TargetRecord::from_counts(&TargetSpec::new("t.txt", "t"), n_barcodes, n_matching)
    }

    #[test]
    fn test_strict_inequality() {
        assert!(!passes_threshold(0.5, 0.5));
        assert!(passes_threshold(0.500_001, 0.5));
        assert!(!passes_threshold(0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_cutoffs() {
        assert!(passes_threshold(0.0, -1.0));
        assert!(!passes_threshold(1.0, 1.5));
    }

    #[test]
    fn test_apply_threshold() {
        let mut records = vec![record(3, 2), record(2, 0), record(0, 0), record(4, 4)];

        for cutoff in [-0.5, 0.0, 0.5, 0.667, 1.0, 2.0] {
            apply_threshold(&mut records, cutoff);
            for r in &records {
                assert_eq!(r.pass_threshold, r.matching_ratio > cutoff);
            }
        }

        apply_threshold(&mut records, 0.5);
        let passed: Vec<bool> = records.iter().map(|r| r.pass_threshold).collect();
        assert_eq!(passed, vec![true, false, false, true]);
    }
}
