//! Tolerance-based comparison of whitespace-tokenized numeric text files.

use std::fmt;
use std::path::Path;
use log::{debug, info};
use anyhow::{Context, Result};

/// Absolute difference above which a single numeric value pair counts as an error
pub const VALUE_ATOL: f64 = 1e-5;
/// Maximum allowed mean absolute difference across all compared values
pub const OVERALL_ATOL: f64 = 1e-4;
/// Maximum allowed percentage of value pairs exceeding the per-value tolerance
pub const ACCEPTABLE_ERROR_PERCENTAGE: f64 = 25.0;

/// Tolerance thresholds for one comparison run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Per-value absolute tolerance; a pair with `|ref - cand| >= value_atol` is an error
    pub value_atol: f64,
    /// Upper bound on the mean absolute difference over all numeric pairs
    pub overall_atol: f64,
    /// Upper bound on the percentage of erroring pairs
    pub acceptable_error_percentage: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            value_atol: VALUE_ATOL,
            overall_atol: OVERALL_ATOL,
            acceptable_error_percentage: ACCEPTABLE_ERROR_PERCENTAGE,
        }
    }
}

/// Aggregate statistics accumulated over all numerically-compared token pairs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Sum of `|ref - cand|` over all numeric pairs
    pub total_error: f64,
    /// Number of pairs whose difference met or exceeded the per-value tolerance
    pub num_errors: usize,
    /// Number of pairs compared numerically
    pub num_values: usize,
}

impl Summary {
    /// Mean absolute difference across all compared values.
    /// Only meaningful when `num_values > 0`.
    pub fn mean_abs_diff(&self) -> f64 {
        self.total_error / self.num_values as f64
    }

    /// Percentage of compared values that exceeded the per-value tolerance
    pub fn error_percentage(&self) -> f64 {
        self.num_errors as f64 / self.num_values as f64 * 100.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Abs. diff: {:.8}, errors: {} ({:.1}%)",
            self.mean_abs_diff(),
            self.num_errors,
            self.error_percentage()
        )
    }
}

/// The reason a comparison failed
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchKind {
    /// The two files have a different number of lines
    LineCount { reference: usize, candidate: usize },
    /// A line has a different number of tokens on each side (1-based line number)
    RowLength { line: usize },
    /// Two non-numeric tokens differ (1-based line and column)
    NonNumericToken {
        line: usize,
        col: usize,
        reference: String,
        candidate: String,
    },
    /// The reference token is numeric but the candidate token is not
    TokenType {
        line: usize,
        col: usize,
        reference: String,
        candidate: String,
    },
    /// No token pair was numeric on both sides, so the tolerance metrics are undefined
    NoValues,
    /// The full scan completed but the aggregate statistics exceed the thresholds
    Tolerance(Summary),
}

impl MismatchKind {
    /// Exit code in the granular legacy scheme (codes 3-7 per failure kind)
    pub fn legacy_exit_code(&self) -> u8 {
        match self {
            MismatchKind::LineCount { .. } => 3,
            MismatchKind::RowLength { .. } => 4,
            MismatchKind::NonNumericToken { .. } | MismatchKind::TokenType { .. } => 5,
            MismatchKind::NoValues => 6,
            MismatchKind::Tolerance(_) => 7,
        }
    }
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::LineCount { reference, candidate } => {
                write!(f, "ERROR: Line count mismatch! ({} != {})", reference, candidate)
            }
            MismatchKind::RowLength { line } => {
                write!(f, "ERROR: Row length mismatch at line {}", line)
            }
            MismatchKind::NonNumericToken { line, col, reference, candidate } => {
                write!(
                    f,
                    "ERROR: Non-numeric token mismatch at ({}, {}): {} != {}",
                    line, col, reference, candidate
                )
            }
            MismatchKind::TokenType { line, col, reference, candidate } => {
                write!(
                    f,
                    "ERROR: Token type mismatch at ({}, {}): {} != {}",
                    line, col, reference, candidate
                )
            }
            MismatchKind::NoValues => write!(f, "ERROR: No values to compare"),
            MismatchKind::Tolerance(_) => write!(f, "ERROR: Tolerance exceeded"),
        }
    }
}

/// Outcome of one comparison invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The files match within tolerance; carries the aggregate statistics
    Match(Summary),
    /// The files do not match
    Mismatch(MismatchKind),
}

impl Verdict {
    /// Whether the comparison passed
    pub fn is_match(&self) -> bool {
        matches!(self, Verdict::Match(_))
    }

    /// The aggregate statistics, available whenever the full scan completed
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Verdict::Match(summary) => Some(summary),
            Verdict::Mismatch(MismatchKind::Tolerance(summary)) => Some(summary),
            Verdict::Mismatch(_) => None,
        }
    }
}

/// Compares two in-memory line sequences token-by-token.
///
/// Non-numeric tokens must be identical; numeric tokens are compared under
/// the given absolute tolerances. The scan is strictly positional: the first
/// structural, type, or string mismatch aborts the comparison.
///
/// # Arguments
///
/// * `reference` - Lines of the reference file, in order
/// * `candidate` - Lines of the candidate file, in order
/// * `ignore_newlines` - Collapse each side into a single logical line first
/// * `tolerances` - Thresholds applied per value and to the aggregates
///
/// # Returns
///
/// The structured verdict of the comparison
pub fn compare_lines(
    reference: &[String],
    candidate: &[String],
    ignore_newlines: bool,
    tolerances: &Tolerances,
) -> Verdict {
    let joined_ref;
    let joined_cand;
    let (rlines, clines): (&[String], &[String]) = if ignore_newlines {
        // Line boundaries become irrelevant; the token sequences still must agree.
        joined_ref = [reference.join(" ")];
        joined_cand = [candidate.join(" ")];
        (&joined_ref, &joined_cand)
    } else {
        (reference, candidate)
    };

    if rlines.len() != clines.len() {
        return Verdict::Mismatch(MismatchKind::LineCount {
            reference: rlines.len(),
            candidate: clines.len(),
        });
    }

    let mut summary = Summary::default();

    for (lnum, (rline, cline)) in rlines.iter().zip(clines.iter()).enumerate() {
        let rtoks: Vec<&str> = rline.split_whitespace().collect();
        let ctoks: Vec<&str> = cline.split_whitespace().collect();
        if rtoks.len() != ctoks.len() {
            return Verdict::Mismatch(MismatchKind::RowLength { line: lnum + 1 });
        }

        for (i, (rtok, ctok)) in rtoks.iter().zip(ctoks.iter()).enumerate() {
            let refval = match rtok.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    // String comparison
                    if rtok != ctok {
                        return Verdict::Mismatch(MismatchKind::NonNumericToken {
                            line: lnum + 1,
                            col: i + 1,
                            reference: rtok.to_string(),
                            candidate: ctok.to_string(),
                        });
                    }
                    continue;
                }
            };
            // Float comparison
            let cmpval = match ctok.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    return Verdict::Mismatch(MismatchKind::TokenType {
                        line: lnum + 1,
                        col: i + 1,
                        reference: rtok.to_string(),
                        candidate: ctok.to_string(),
                    });
                }
            };
            let diff = (refval - cmpval).abs();
            summary.total_error += diff;
            if diff >= tolerances.value_atol {
                summary.num_errors += 1;
            }
            summary.num_values += 1;
        }
    }

    if summary.num_values == 0 {
        return Verdict::Mismatch(MismatchKind::NoValues);
    }

    debug!(
        "compared {} values, {} over per-value tolerance",
        summary.num_values, summary.num_errors
    );

    if summary.mean_abs_diff() > tolerances.overall_atol
        || summary.error_percentage() > tolerances.acceptable_error_percentage
    {
        Verdict::Mismatch(MismatchKind::Tolerance(summary))
    } else {
        Verdict::Match(summary)
    }
}

/// Compares a reference and a candidate result file within the default tolerances.
///
/// Both files are read fully into memory before any comparison begins. The
/// diagnostic text goes to standard output: the `ERROR:` line for any
/// mismatch, and the summary line whenever the full scan completed (on a
/// match as well as on a tolerance failure).
///
/// # Arguments
///
/// * `ref_path` - Path to the reference file
/// * `cand_path` - Path to the candidate file
/// * `ignore_newlines` - Compare the files as single logical lines
///
/// # Returns
///
/// A Result containing the verdict, or an error if either file could not be read
pub fn compare_files<P: AsRef<Path>>(
    ref_path: P,
    cand_path: P,
    ignore_newlines: bool,
) -> Result<Verdict> {
    let ref_path = ref_path.as_ref();
    let cand_path = cand_path.as_ref();

    let rlines = super::file_utils::read_lines(ref_path)
        .with_context(|| format!("Failed to read reference file: {}", ref_path.display()))?;
    let clines = super::file_utils::read_lines(cand_path)
        .with_context(|| format!("Failed to read candidate file: {}", cand_path.display()))?;

    info!(
        "comparing {} ({} lines) against {} ({} lines)",
        cand_path.display(),
        clines.len(),
        ref_path.display(),
        rlines.len()
    );

    let verdict = compare_lines(&rlines, &clines, ignore_newlines, &Tolerances::default());

    if let Some(summary) = verdict.summary() {
        println!("{}", summary);
    }
    if let Verdict::Mismatch(kind) = &verdict {
        println!("{}", kind);
    }

    Ok(verdict)
}
