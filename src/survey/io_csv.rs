// Primitives for reading CSV files.

use std::io::Read;

use csv::{Reader, ReaderBuilder, Trim};
use log::{debug, info};
use ranked_traits::ScoreTable;
use snafu::prelude::*;

use crate::survey::{
    config_reader::FileSource,
    io_common::{column_name, parse_score, respondent_name, start_table},
    *,
};

pub fn read_csv_table(path: &str, cfs: &FileSource) -> SurveyResult<ScoreTable> {
    info!("read_csv_table: reading {:?}", path);
    let rdr = reader_builder(cfs.delimiter()?)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr)
}

/// Reads a table from any source of CSV data.
pub fn read_csv_scores<R: Read>(data: R, delimiter: u8) -> SurveyResult<ScoreTable> {
    read_records(reader_builder(delimiter).from_reader(data))
}

fn reader_builder(delimiter: u8) -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // The header is read as a plain record, and short lines are reported with their
    // line number rather than rejected by the reader.
    builder
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter);
    builder
}

fn read_records<R: Read>(rdr: Reader<R>) -> SurveyResult<ScoreTable> {
    let mut records = rdr.into_records();

    let header: Vec<String> = records
        .next()
        .context(MissingHeaderSnafu {})?
        .context(CsvLineParseSnafu {})?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_scores: header: {:?}", header);
    let mut builder = start_table(&header)?;
    let traits: Vec<String> = header.iter().skip(1).map(|s| s.to_string()).collect();

    for line_r in records {
        let line = line_r.context(CsvLineParseSnafu {})?;
        let lineno = line.position().map(|p| p.line() as usize).unwrap_or(0);
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        let name = respondent_name(line.get(0).unwrap_or(""), lineno)?;
        let scores: Vec<f64> = line
            .iter()
            .skip(1)
            .enumerate()
            .map(|(idx, cell)| parse_score(cell, lineno, &column_name(&traits, idx)))
            .collect::<SurveyResult<Vec<f64>>>()?;
        debug!(
            "read_csv_scores: lineno: {:?} name: {:?} scores: {:?}",
            lineno, name, scores
        );
        builder
            .add_respondent(&name, &scores)
            .context(InvalidTableSnafu { lineno })?;
    }
    Ok(builder.build())
}
