//! CSV export for generated load curves.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::curve::LoadCurves;

/// Column header for load curve export.
const HEADER: [&str; 5] = ["hour", "label", "baseline", "strategy_a", "strategy_b"];

/// Exports load curves to a CSV file at `path`.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_curves_csv(curves: &LoadCurves, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_curves_csv(curves, io::BufWriter::new(file))
}

/// Writes one row per hour: index, label and the three loads in kW.
///
/// Output is deterministic for identical curves.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_curves_csv(curves: &LoadCurves, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    for ((hour, baseline, a, b), label) in curves.rows().zip(&curves.labels) {
        wtr.write_record(&[
            hour.to_string(),
            label.clone(),
            format!("{baseline:.3}"),
            format!("{a:.3}"),
            format!("{b:.3}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
