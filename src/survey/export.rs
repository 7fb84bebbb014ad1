// Per-respondent export in CSV format.

use std::io::Write;

use log::debug;
use ranked_traits::ExportRow;
use snafu::prelude::*;

use crate::survey::*;

pub const EXPORT_HEADER: [&str; 3] = ["Name", "Top Gifts", "Bottom Gifts"];

/// Writes one line per respondent, after a header line. The header is written even
/// when there are no rows.
pub fn write_export<W: Write>(rows: &[ExportRow], wtr: W) -> SurveyResult<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer
        .write_record(EXPORT_HEADER)
        .context(WritingCsvSnafu {})?;
    for row in rows {
        writer
            .write_record([
                row.name.as_str(),
                row.top_traits.as_str(),
                row.bottom_traits.as_str(),
            ])
            .context(WritingCsvSnafu {})?;
    }
    debug!("write_export: {} rows", rows.len());
    writer.flush().context(FlushingOutputSnafu {})?;
    Ok(())
}
