//! Line-oriented decoding of the solver's solution-file grammar.

use crate::error::DriveError;
use crate::status::status_from_label;
use drover_model::{SymbolKind, SymbolTable};
use drover_solver::SolverStatus;
use std::collections::BTreeMap;
use tracing::debug;

pub(crate) const MODEL_STATUS_MARKER: &str = "Model status";
pub(crate) const PRIMAL_SECTION_MARKER: &str = "# Primal solution values";

/// How deep into the file the status header may appear.
const STATUS_SEARCH_WINDOW: usize = 10;

/// A decoded solution before value normalization.
#[derive(Debug, Clone)]
pub struct RawSolution {
    /// Status parsed from the header.
    pub status: SolverStatus,
    /// Verbatim status label from the file.
    pub status_label: String,
    /// Summary line the solver emits under the primal section header.
    pub primal_summary: String,
    /// Objective value, absent when the objective line did not parse.
    pub objective: Option<f64>,
    /// Raw decoded values for known decision symbols.
    pub values: BTreeMap<String, f64>,
}

/// Decode a completed solution file.
///
/// Decoding is all-or-nothing: either every row for a known decision
/// symbol decodes, or a structural error is returned and no partial
/// result escapes. Two leniency policies are deliberate, not gaps:
///
/// - *ignore-unknown-symbol*: the solver emits basis and row metadata the
///   caller's table does not track; rows with unknown symbols are skipped.
/// - *lenient-objective*: an objective line whose value token fails to
///   parse leaves the objective unset and decoding continues.
///
/// # Errors
///
/// Returns a structural error when a required marker is missing, the file
/// ends inside a required section, or a known decision symbol's row lacks
/// a parseable value.
pub fn decode_solution(text: &str, symbols: &SymbolTable) -> Result<RawSolution, DriveError> {
    let lines: Vec<&str> = text.lines().collect();

    let status_label = find_status_label(&lines)?;
    let status = status_from_label(&status_label);

    let section = lines
        .iter()
        .position(|line| line.contains(PRIMAL_SECTION_MARKER))
        .ok_or(DriveError::MissingSection {
            marker: PRIMAL_SECTION_MARKER,
        })?;
    let primal_summary = lines
        .get(section + 1)
        .ok_or(DriveError::TruncatedSolution {
            marker: PRIMAL_SECTION_MARKER,
        })?
        .to_string();
    let objective_line = *lines.get(section + 2).ok_or(DriveError::TruncatedSolution {
        marker: PRIMAL_SECTION_MARKER,
    })?;
    let objective = parse_objective(objective_line);

    let mut values = BTreeMap::new();
    for line in lines.get(section + 3..).unwrap_or(&[]) {
        let (symbol, rest) = split_row(line);
        let Some(kind) = symbols.kind(symbol) else {
            continue;
        };
        if kind != SymbolKind::Decision {
            continue;
        }
        let Some(text) = rest else {
            return Err(DriveError::MissingValue {
                symbol: symbol.to_string(),
            });
        };
        let value: f64 = text
            .trim()
            .parse()
            .map_err(|_| DriveError::InvalidValue {
                symbol: symbol.to_string(),
                text: text.to_string(),
            })?;
        values.insert(symbol.to_string(), value);
    }

    debug!(
        component = "decode",
        operation = "decode_solution",
        status = "success",
        solver_status = %status,
        objective = ?objective,
        num_values = values.len() as u64,
        "Decoded solution file"
    );

    Ok(RawSolution {
        status,
        status_label,
        primal_summary,
        objective,
        values,
    })
}

fn find_status_label(lines: &[&str]) -> Result<String, DriveError> {
    for (index, line) in lines.iter().take(STATUS_SEARCH_WINDOW).enumerate() {
        if line.contains(MODEL_STATUS_MARKER) {
            return lines
                .get(index + 1)
                .map(|label| label.trim().to_string())
                .ok_or(DriveError::TruncatedSolution {
                    marker: MODEL_STATUS_MARKER,
                });
        }
    }
    Err(DriveError::MissingSection {
        marker: MODEL_STATUS_MARKER,
    })
}

/// The objective line is `Objective <value>`; everything after the first
/// space is the value token.
fn parse_objective(line: &str) -> Option<f64> {
    let (_, rest) = line.split_once(' ')?;
    rest.trim().parse().ok()
}

/// Split a row on the first whitespace into (symbol, value text).
fn split_row(line: &str) -> (&str, Option<&str>) {
    match line.split_once(char::is_whitespace) {
        Some((symbol, rest)) => (symbol, Some(rest)),
        None => (line.trim(), None),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    const COMPLETE_BODY: &str = "Model status\n\
                                 Optimal\n\
                                 \n\
                                 # Primal solution values\n\
                                 1\n\
                                 Objective 42.0\n\
                                 x1 3.14159265\n\
                                 \n\
                                 # Basis\n\
                                 HiGHS v1\n\
                                 None\n";

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        table.insert("x1", SymbolKind::Decision).unwrap();
        table.insert("c0", SymbolKind::Auxiliary).unwrap();
        table
    }

    #[test]
    fn decode_complete_file() {
        let solution = decode_solution(COMPLETE_BODY, &table()).unwrap();
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert_eq!(solution.status_label, "Optimal");
        assert_eq!(solution.primal_summary, "1");
        assert_eq!(solution.objective, Some(42.0));
        assert_eq!(solution.values.len(), 1);
        assert_eq!(solution.values["x1"], 3.14159265);
    }

    #[test]
    fn decode_ignores_unknown_symbols() {
        let body = "Model status\nOptimal\n\n# Primal solution values\n2\nObjective 1.0\n\
                    x1 2.0\nslack_row_7 9.9\n# Rows 1\nc9 4.0\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.values.len(), 1);
        assert_eq!(solution.values["x1"], 2.0);
    }

    #[test]
    fn decode_ignores_known_auxiliary_rows() {
        let body = "Model status\nOptimal\n\n# Primal solution values\n1\nObjective 1.0\n\
                    x1 2.0\nc0 5.0\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.values.len(), 1);
        assert!(!solution.values.contains_key("c0"));
    }

    #[test]
    fn decode_missing_value_is_structural_error() {
        let body = "Model status\nOptimal\n\n# Primal solution values\n1\nObjective 1.0\nx1\n";
        let err = decode_solution(body, &table()).unwrap_err();
        match err {
            DriveError::MissingValue { symbol } => assert_eq!(symbol, "x1"),
            other => panic!("expected MissingValue, got {other}"),
        }
    }

    #[test]
    fn decode_unparseable_value_is_structural_error() {
        let body =
            "Model status\nOptimal\n\n# Primal solution values\n1\nObjective 1.0\nx1 oops\n";
        let err = decode_solution(body, &table()).unwrap_err();
        assert!(matches!(err, DriveError::InvalidValue { .. }));
    }

    #[test]
    fn decode_lenient_objective_keeps_values() {
        let body =
            "Model status\nOptimal\n\n# Primal solution values\n1\nObjective Unknown\nx1 2.5\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.objective, None);
        assert_eq!(solution.values["x1"], 2.5);
    }

    #[test]
    fn decode_bare_objective_line_is_lenient() {
        let body = "Model status\nOptimal\n\n# Primal solution values\n1\nObjective\nx1 2.5\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.objective, None);
    }

    #[test]
    fn decode_missing_primal_marker_is_structural_error() {
        let body = "Model status\nOptimal\n\nno rows here\n";
        let err = decode_solution(body, &table()).unwrap_err();
        assert!(matches!(
            err,
            DriveError::MissingSection {
                marker: PRIMAL_SECTION_MARKER
            }
        ));
    }

    #[test]
    fn decode_missing_status_marker_is_structural_error() {
        let body = "# Primal solution values\n1\nObjective 1.0\n";
        let err = decode_solution(body, &table()).unwrap_err();
        assert!(matches!(
            err,
            DriveError::MissingSection {
                marker: MODEL_STATUS_MARKER
            }
        ));
    }

    #[test]
    fn decode_truncated_primal_section_is_structural_error() {
        let body = "Model status\nOptimal\n\n# Primal solution values\n1\n";
        let err = decode_solution(body, &table()).unwrap_err();
        assert!(matches!(err, DriveError::TruncatedSolution { .. }));
    }

    #[test]
    fn decode_status_beyond_window_is_not_found() {
        let padding = "line\n".repeat(STATUS_SEARCH_WINDOW);
        let body = format!("{padding}Model status\nOptimal\n# Primal solution values\n1\nObjective 1.0\n");
        let err = decode_solution(&body, &table()).unwrap_err();
        assert!(matches!(
            err,
            DriveError::MissingSection {
                marker: MODEL_STATUS_MARKER
            }
        ));
    }

    #[test]
    fn decode_time_limit_status() {
        let body = "Model status\nTime limit reached\n\n# Primal solution values\n1\n\
                    Objective 7.5\nx1 1.0\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.status, SolverStatus::ReachedTimeLimit);
        assert_eq!(solution.status_label, "Time limit reached");
    }

    #[test]
    fn decode_infeasible_file_without_rows() {
        let body = "Model status\nInfeasible\n\n# Primal solution values\nNone\n\n\
                    # Basis\nHiGHS v1\nNone\n";
        let solution = decode_solution(body, &table()).unwrap();
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert_eq!(solution.primal_summary, "None");
        assert_eq!(solution.objective, None);
        assert!(solution.values.is_empty());
    }
}
