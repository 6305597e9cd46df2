use crate::diagnostic::{Diagnostic, DiagnosticSink, Discrepancy};
use crate::model::{ManifestTable, RollTable};

/// Cross-check the two tables in both directions and report every mismatch.
///
/// Sweep A walks roll → manifest and credits `matched_count` once per confirmed
/// (identifier, name) pair. Sweep B walks manifest → roll over every claimed
/// occurrence. A final pass flags names whose valid claims outnumber their
/// confirmed pairs, i.e. identifiers listed more often than the roll records them.
///
/// Only `matched_count` is mutated. Every discrepancy is emitted to the sink in
/// the order it is found and returned in the same order.
pub fn cross_check(
    roll: &RollTable,
    manifest: &mut ManifestTable,
    sink: &mut dyn DiagnosticSink,
) -> Vec<Discrepancy> {
    let mut found = Vec::new();
    let mut report = |d: Discrepancy| {
        sink.emit(Diagnostic::Discrepancy(d.clone()));
        found.push(d);
    };

    // Sweep A: roll -> manifest
    for entry in roll.iter() {
        for name in &entry.names {
            match manifest.get_mut(name) {
                None => report(Discrepancy::MissingNameInManifest {
                    identifier: entry.identifier.clone(),
                    name: name.clone(),
                    roll_row: entry.source_row,
                }),
                Some(claim) if !claim.claims(&entry.identifier) => {
                    report(Discrepancy::MissingIdentifierInManifest {
                        identifier: entry.identifier.clone(),
                        name: name.clone(),
                        manifest_row: claim.source_row,
                    })
                }
                Some(claim) => claim.matched_count += 1,
            }
        }
    }

    // Sweep B: manifest -> roll
    let mut valid_claims = Vec::with_capacity(manifest.len());
    for claim in manifest.iter() {
        let mut valid = 0;
        for identifier in &claim.identifiers {
            match roll.get(identifier) {
                None => report(Discrepancy::UnknownIdentifierInManifest {
                    identifier: identifier.clone(),
                    manifest_row: claim.source_row,
                }),
                Some(entry) if !entry.has_name(&claim.name) => {
                    report(Discrepancy::NameMissingFromRoll {
                        identifier: identifier.clone(),
                        name: claim.name.clone(),
                        manifest_row: claim.source_row,
                    })
                }
                Some(_) => valid += 1,
            }
        }
        valid_claims.push(valid);
    }

    // Surplus: valid claims beyond the pairs the roll confirmed
    for (claim, valid) in manifest.iter().zip(valid_claims) {
        if valid > claim.matched_count {
            report(Discrepancy::SurplusIdentifierInManifest {
                name: claim.name.clone(),
                manifest_row: claim.source_row,
                surplus: valid - claim.matched_count,
            });
        }
    }

    found
}
