//! Numeric parity rules between client and output amounts.
//!
//! The output workbook reports amounts 1000x smaller than the client. Both
//! sides are rounded to integers (ties to even) and compared by absolute
//! value, so a sign flip on its own is not a discrepancy.

use serde::Serialize;

/// Factor between the client's and the output's unit of account.
pub const OUTPUT_SCALE: f64 = 1000.0;

/// Which of the two reported values is being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    Current,
    Prior,
}

impl Period {
    /// Tag appended to the sheet-pair context in report lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Period::Current => "[Actual]",
            Period::Prior => "[Anterior]",
        }
    }
}

/// A matched pair whose amounts disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Discrepancy {
    /// The client reports zero but the scaled output does not.
    ClientZero { output_scaled: u64 },
    /// Both sides are non-zero and differ.
    Mismatch { client: u64, output_scaled: u64 },
}

impl Discrepancy {
    pub fn describe(&self, context: &str, title: &str) -> String {
        match self {
            Discrepancy::ClientZero { output_scaled } => format!(
                "[{context}] '{title}': client is zero but output reports a value (scaled: {output_scaled})."
            ),
            Discrepancy::Mismatch {
                client,
                output_scaled,
            } => format!(
                "[{context}] '{title}': DISCREPANCY. Client: {client}, Output (scaled): {output_scaled}."
            ),
        }
    }
}

/// Magnitude of a client amount rounded to an integer; absent counts as zero.
///
/// The sign is dropped before the cast, so amounts beyond `u64` saturate
/// instead of overflowing.
pub fn round_client(raw: Option<f64>) -> u64 {
    raw.unwrap_or(0.0).abs().round_ties_even() as u64
}

/// Magnitude of an output amount in client units; absent counts as zero.
pub fn scale_output(raw: Option<f64>) -> u64 {
    (raw.unwrap_or(0.0).abs() / OUTPUT_SCALE).round_ties_even() as u64
}

/// Compare one period of a matched pair.
pub fn compare_values(client: Option<f64>, output: Option<f64>) -> Option<Discrepancy> {
    let client = round_client(client);
    let output_scaled = scale_output(output);

    if client == 0 {
        if output_scaled != 0 {
            return Some(Discrepancy::ClientZero { output_scaled });
        }
        return None;
    }

    if client != output_scaled {
        return Some(Discrepancy::Mismatch {
            client,
            output_scaled,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_zero() {
        assert_eq!(compare_values(Some(0.0), Some(0.0)), None);
        assert_eq!(compare_values(None, None), None);
    }

    #[test]
    fn test_scaled_values_agree() {
        assert_eq!(compare_values(Some(150000.0), Some(150000000.0)), None);
    }

    #[test]
    fn test_scaled_values_disagree() {
        assert_eq!(
            compare_values(Some(150000.0), Some(149000000.0)),
            Some(Discrepancy::Mismatch {
                client: 150000,
                output_scaled: 149000
            })
        );
    }

    #[test]
    fn test_client_zero_output_nonzero() {
        assert_eq!(
            compare_values(Some(0.0), Some(500000.0)),
            Some(Discrepancy::ClientZero { output_scaled: 500 })
        );
        // Absent client is zero
        assert_eq!(
            compare_values(None, Some(500000.0)),
            Some(Discrepancy::ClientZero { output_scaled: 500 })
        );
    }

    #[test]
    fn test_output_rounding_to_zero_is_not_reported() {
        // 400 / 1000 rounds to 0
        assert_eq!(compare_values(Some(0.0), Some(400.0)), None);
        assert_eq!(compare_values(Some(0.4), Some(-499.0)), None);
    }

    #[test]
    fn test_sign_is_ignored() {
        assert_eq!(compare_values(Some(-1200.0), Some(1200000.0)), None);
        assert_eq!(compare_values(Some(1200.0), Some(-1200000.0)), None);
    }

    #[test]
    fn test_client_absent_with_output_absent_is_equal() {
        assert_eq!(compare_values(Some(0.2), None), None);
    }

    #[test]
    fn test_ties_round_to_even() {
        assert_eq!(scale_output(Some(2500.0)), 2);
        assert_eq!(scale_output(Some(3500.0)), 4);
        assert_eq!(scale_output(Some(-2500.0)), 2);
        assert_eq!(round_client(Some(0.5)), 0);
        assert_eq!(round_client(Some(1.5)), 2);
        assert_eq!(round_client(Some(2.5)), 2);
        // 2.5 thousand output vs 3 client: output rounds down to 2
        assert_eq!(
            compare_values(Some(3.0), Some(2500.0)),
            Some(Discrepancy::Mismatch {
                client: 3,
                output_scaled: 2
            })
        );
    }

    #[test]
    fn test_no_epsilon_tolerance() {
        assert_eq!(
            compare_values(Some(100.0), Some(101000.0)),
            Some(Discrepancy::Mismatch {
                client: 100,
                output_scaled: 101
            })
        );
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        assert_eq!(
            compare_values(Some(-1e19), Some(1.0)),
            Some(Discrepancy::Mismatch {
                client: 10_000_000_000_000_000_000,
                output_scaled: 0
            })
        );
        assert_eq!(scale_output(Some(-1e30)), u64::MAX);
        assert_eq!(compare_values(Some(f64::MIN), Some(f64::MIN)), None);
    }

    #[test]
    fn test_describe() {
        let line = Discrepancy::Mismatch {
            client: 150000,
            output_scaled: 149000,
        }
        .describe("Sheet 'A' vs Sheet 'B' [Actual]", "1.1 Caja");
        assert_eq!(
            line,
            "[Sheet 'A' vs Sheet 'B' [Actual]] '1.1 Caja': DISCREPANCY. Client: 150000, Output (scaled): 149000."
        );

        let line = Discrepancy::ClientZero { output_scaled: 500 }.describe("ctx", "2 Pasivo");
        assert!(line.contains("client is zero but output reports a value"));
        assert!(line.contains("500"));
    }
}
