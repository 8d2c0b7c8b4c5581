use crate::extraction::Record;
use crate::grid::format_number;
use crate::report::Report;
use crate::values::{Period, compare_values, scale_output};

/// How a client record found its output counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Code,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchedPair {
    pub client: usize,
    pub output: usize,
    pub kind: MatchKind,
}

/// Partition of two record lists into matched pairs and leftovers.
///
/// Records are referenced by index; the record lists themselves are never
/// mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Code matches in client order, then label matches in client order.
    pub pairs: Vec<MatchedPair>,
    pub client_only: Vec<usize>,
    pub output_only: Vec<usize>,
}

/// Pair client records with output records.
///
/// Each client record takes the first unmatched output record (in original
/// order) with the same code. Client records left over then take the first
/// unmatched output record with the same label.
pub fn match_records(client: &[Record], output: &[Record]) -> MatchOutcome {
    let mut client_used = vec![false; client.len()];
    let mut output_used = vec![false; output.len()];
    let mut pairs = Vec::new();

    let phases: [(MatchKind, fn(&Record, &Record) -> bool); 2] = [
        (MatchKind::Code, |c, o| c.code == o.code),
        (MatchKind::Label, |c, o| c.label == o.label),
    ];

    for (kind, same) in phases {
        for (ci, client_record) in client.iter().enumerate() {
            if client_used[ci] {
                continue;
            }
            let found = output
                .iter()
                .enumerate()
                .position(|(oi, output_record)| !output_used[oi] && same(client_record, output_record));

            if let Some(oi) = found {
                client_used[ci] = true;
                output_used[oi] = true;
                pairs.push(MatchedPair {
                    client: ci,
                    output: oi,
                    kind,
                });
            }
        }
    }

    MatchOutcome {
        pairs,
        client_only: unused(&client_used),
        output_only: unused(&output_used),
    }
}

fn unused(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(i, _)| i)
        .collect()
}

/// Match both record lists and write every finding for this sheet pair.
///
/// # Arguments
/// * `context` - Sheet-pair label, e.g. "Sheet 'Balance' vs Sheet 'ESF'"
/// * `client` - Records extracted from the client sheet
/// * `output` - Records extracted from the output sheet
/// * `report` - Receives advisory and inconsistency lines
pub fn reconcile_records(
    context: &str,
    client: &[Record],
    output: &[Record],
    report: &mut Report,
) -> MatchOutcome {
    let outcome = match_records(client, output);

    for pair in &outcome.pairs {
        let client_record = &client[pair.client];
        let output_record = &output[pair.output];

        if pair.kind == MatchKind::Label {
            report.advisory(format!(
                "[{context}] [NOTICE] Matched by LABEL: Client ('{}') vs Output ('{}')",
                client_record.full_title, output_record.full_title
            ));
        }

        check_period(
            context,
            Period::Current,
            client_record,
            client_record.current_value,
            output_record.current_value,
            report,
        );
        check_period(
            context,
            Period::Prior,
            client_record,
            client_record.prior_value,
            output_record.prior_value,
            report,
        );
    }

    for &ci in &outcome.client_only {
        let record = &client[ci];
        let current = record.current_value.unwrap_or(0.0);
        let prior = record.prior_value.unwrap_or(0.0);
        if current != 0.0 || prior != 0.0 {
            report.inconsistency(format!(
                "[{context}] (Client row: {}) '{}': missing in output (client values: {}, {}).",
                record.source_row,
                record.full_title,
                format_number(current),
                format_number(prior)
            ));
        }
    }

    for &oi in &outcome.output_only {
        let record = &output[oi];
        let current = scale_output(record.current_value);
        let prior = scale_output(record.prior_value);
        if current != 0 || prior != 0 {
            report.inconsistency(format!(
                "[{context}] (Output row: {}) '{}': extra in output, not present in client (scaled output values: {}, {}).",
                record.source_row, record.full_title, current, prior
            ));
        }
    }

    outcome
}

fn check_period(
    context: &str,
    period: Period,
    client_record: &Record,
    client_value: Option<f64>,
    output_value: Option<f64>,
    report: &mut Report,
) {
    if let Some(discrepancy) = compare_values(client_value, output_value) {
        let context = format!("{context} {}", period.tag());
        report.inconsistency(discrepancy.describe(&context, &client_record.full_title));
    }
}
