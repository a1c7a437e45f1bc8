//! Warm-start file encoding.

use drover_model::SymbolTable;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write the table's decision symbols as a warm-start file the solver
/// accepts as a prior solution.
///
/// The header fields are fixed placeholders; the solver only consumes the
/// column rows, in table order. Values are written raw: the rounding
/// applied when decoding solver output does not apply on the way in, so a
/// decode of this file reproduces every assigned value exactly.
/// Unassigned decision symbols are written as `0.0`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn encode_warmstart(path: &Path, table: &SymbolTable) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "Model status")?;
    writeln!(out, "Unknown")?;
    writeln!(out)?;
    writeln!(out, "# Primal solution values")?;
    writeln!(out, "Unknown")?;
    writeln!(out, "Objective Unknown")?;
    writeln!(out, "# Columns {}", table.decision_count())?;
    for (name, entry) in table.decisions() {
        match entry.value {
            Some(value) => writeln!(out, "{} {}", name, value)?,
            None => writeln!(out, "{} 0.0", name)?,
        }
    }
    out.flush()?;

    debug!(
        component = "warmstart",
        operation = "encode",
        status = "success",
        columns = table.decision_count() as u64,
        path = %path.display(),
        "Wrote warm-start file"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::decode::decode_solution;
    use drover_model::SymbolKind;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("drover-warmstart-{}-{}", std::process::id(), name))
    }

    #[test]
    fn encode_writes_placeholder_header_and_rows() {
        let mut table = SymbolTable::new();
        table.insert("x1", SymbolKind::Decision).unwrap();
        table.insert("c0", SymbolKind::Auxiliary).unwrap();
        table.insert("x2", SymbolKind::Decision).unwrap();
        table.set_value("x1", 1.5).unwrap();

        let path = scratch_path("header.sol");
        encode_warmstart(&path, &table).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert_eq!(
            text,
            "Model status\nUnknown\n\n# Primal solution values\nUnknown\n\
             Objective Unknown\n# Columns 2\nx1 1.5\nx2 0.0\n"
        );
        fs::remove_file(&path).ok();
    }

    #[test]
    fn encode_then_decode_reproduces_values_exactly() {
        let mut table = SymbolTable::new();
        table.insert("a", SymbolKind::Decision).unwrap();
        table.insert("b", SymbolKind::Decision).unwrap();
        table.insert("c", SymbolKind::Decision).unwrap();
        table.set_value("a", 0.1234567891234).unwrap();
        table.set_value("b", -2.25e-9).unwrap();

        let path = scratch_path("roundtrip.sol");
        encode_warmstart(&path, &table).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let solution = decode_solution(&text, &table).unwrap();

        assert_eq!(solution.values["a"], 0.1234567891234);
        assert_eq!(solution.values["b"], -2.25e-9);
        // Unassigned symbols come back as the 0.0 placeholder.
        assert_eq!(solution.values["c"], 0.0);
        // Placeholder header fields decode leniently.
        assert_eq!(solution.objective, None);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn encode_empty_table_writes_zero_columns() {
        let table = SymbolTable::new();
        let path = scratch_path("empty.sol");
        encode_warmstart(&path, &table).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("# Columns 0\n"));
        fs::remove_file(&path).ok();
    }
}
