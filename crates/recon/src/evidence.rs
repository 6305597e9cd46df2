use std::collections::BTreeMap;

use crate::diagnostic::Discrepancy;
use crate::error::RowParseError;
use crate::model::{ManifestTable, ReconSummary, RollTable};

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    roll: &RollTable,
    manifest: &ManifestTable,
    discrepancies: &[Discrepancy],
    row_errors: &[RowParseError],
) -> ReconSummary {
    let mut by_kind: BTreeMap<String, usize> = BTreeMap::new();
    for d in discrepancies {
        *by_kind.entry(d.kind().to_string()).or_insert(0) += 1;
    }

    ReconSummary {
        roll_entries: roll.len(),
        manifest_entries: manifest.len(),
        row_errors: row_errors.len(),
        discrepancies: discrepancies.len(),
        by_kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts() {
        let mut roll = RollTable::new();
        roll.insert_or_merge("1".into(), vec!["A".into()], 1);
        let manifest = ManifestTable::new();
        let discrepancies = vec![
            Discrepancy::MissingNameInManifest {
                identifier: "1".into(),
                name: "A".into(),
                roll_row: 1,
            },
            Discrepancy::UnknownIdentifierInManifest {
                identifier: "2".into(),
                manifest_row: 1,
            },
            Discrepancy::UnknownIdentifierInManifest {
                identifier: "3".into(),
                manifest_row: 1,
            },
        ];

        let summary = compute_summary(&roll, &manifest, &discrepancies, &[]);
        assert_eq!(summary.roll_entries, 1);
        assert_eq!(summary.manifest_entries, 0);
        assert_eq!(summary.discrepancies, 3);
        assert_eq!(summary.row_errors, 0);
        assert_eq!(summary.by_kind["unknown_identifier_in_manifest"], 2);
        assert_eq!(summary.by_kind["missing_name_in_manifest"], 1);
    }
}
