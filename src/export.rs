//! CSV export of the rankings table

use crate::error::RatingError;
use crate::rankings::PowerRankingRow;
use std::io::Write;
use std::path::Path;
use tracing::info;

fn export_error(message: String) -> anyhow::Error {
    RatingError::ExportError { message }.into()
}

/// Write rows as CSV with a `Team,W,L,Rating,Rank,GS,GA` header
pub fn write_rankings<W: Write>(rows: &[PowerRankingRow], writer: W) -> crate::error::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)
            .map_err(|e| export_error(format!("failed to write row for {}: {}", row.team, e)))?;
    }
    csv.flush()
        .map_err(|e| export_error(format!("failed to flush rankings: {}", e)))?;
    Ok(())
}

/// Write the rankings CSV to `path`, replacing any existing file
pub fn save_rankings(rows: &[PowerRankingRow], path: &Path) -> crate::error::Result<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| export_error(format!("cannot create {}: {}", path.display(), e)))?;
    write_rankings(rows, file)?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
