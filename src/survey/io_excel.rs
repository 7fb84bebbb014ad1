// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::{debug, info};
use ranked_traits::ScoreTable;
use snafu::prelude::*;

use crate::survey::{
    config_reader::FileSource,
    io_common::{column_name, parse_score, respondent_name, start_table},
    *,
};

pub fn read_excel_table(path: &str, cfs: &FileSource) -> SurveyResult<ScoreTable> {
    info!("read_excel_table: reading {:?}", path);
    let wrange = get_range(path, cfs)?;
    read_range(&wrange)
}

fn get_range(path: &str, cfs: &FileSource) -> SurveyResult<Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                name: worksheet_name.clone(),
                path,
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => EmptyExcelSnafu { path }.fail(),
            [(worksheet_name, wrange)] => {
                debug!("get_range: using worksheet {:?}", worksheet_name);
                Ok(wrange.clone())
            }
            _ => AmbiguousWorksheetSnafu { path }.fail(),
        }
    }
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Empty => String::new(),
        x => format!("{:?}", x),
    }
}

fn read_score_cell(cell: &DataType, lineno: usize, column: &str) -> SurveyResult<f64> {
    match cell {
        DataType::Float(f) if f.is_finite() => Ok(*f),
        DataType::Int(i) => Ok(*i as f64),
        DataType::String(s) => parse_score(s, lineno, column),
        x => MalformedScoreSnafu {
            lineno,
            column,
            content: format!("{:?}", x),
        }
        .fail(),
    }
}

/// Reads a table from a worksheet: names in the first column, one trait per
/// following column, and a header row.
pub fn read_range(wrange: &Range<DataType>) -> SurveyResult<ScoreTable> {
    let mut rows = wrange.rows();
    let header: Vec<String> = rows
        .next()
        .context(MissingHeaderSnafu {})?
        .iter()
        .map(cell_to_string)
        .collect();
    debug!("read_range: header: {:?}", header);
    let mut builder = start_table(&header)?;
    let traits: Vec<String> = header.iter().skip(1).cloned().collect();

    for (idx, row) in rows.enumerate() {
        // Line numbers as shown by Excel, the header being on the first line.
        let lineno = idx + 2;
        if row.iter().all(|c| *c == DataType::Empty) {
            continue;
        }
        let first = row.first().map(cell_to_string).unwrap_or_default();
        let name = respondent_name(&first, lineno)?;
        let scores: Vec<f64> = row
            .iter()
            .skip(1)
            .enumerate()
            .map(|(cidx, cell)| read_score_cell(cell, lineno, &column_name(&traits, cidx)))
            .collect::<SurveyResult<Vec<f64>>>()?;
        debug!(
            "read_range: lineno: {:?} name: {:?} scores: {:?}",
            lineno, name, scores
        );
        builder
            .add_respondent(&name, &scores)
            .context(InvalidTableSnafu { lineno })?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(cells: &[&[DataType]]) -> Range<DataType> {
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (cells.len() as u32 - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn reads_numbers_and_strings() {
        let range = sheet(&[
            &[s("Name"), s("Mercy"), s("Faith")],
            &[s("Anna"), DataType::Float(12.0), DataType::Int(3)],
            &[DataType::Empty, DataType::Empty, DataType::Empty],
            &[s("Ben"), s(" 7 "), DataType::Float(2.5)],
        ]);
        let table = read_range(&range).unwrap();
        assert_eq!(table.traits(), &["Mercy", "Faith"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.respondents()[0].scores, vec![12.0, 3.0]);
        assert_eq!(table.respondents()[1].name, "Ben");
        assert_eq!(table.respondents()[1].scores, vec![7.0, 2.5]);
    }

    #[test]
    fn rejects_empty_cells() {
        let range = sheet(&[
            &[s("Name"), s("Mercy"), s("Faith")],
            &[s("Anna"), DataType::Float(12.0), DataType::Empty],
        ]);
        match read_range(&range) {
            Err(SurveyError::MalformedScore { lineno, column, .. }) => {
                assert_eq!(lineno, 2);
                assert_eq!(column, "Faith");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn rejects_booleans() {
        let range = sheet(&[
            &[s("Name"), s("Mercy")],
            &[s("Anna"), DataType::Bool(true)],
        ]);
        assert!(matches!(
            read_range(&range),
            Err(SurveyError::MalformedScore { lineno: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_names() {
        let range = sheet(&[
            &[s("Name"), s("Mercy")],
            &[s("Anna"), DataType::Int(3)],
            &[DataType::Empty, DataType::Int(4)],
        ]);
        assert!(matches!(
            read_range(&range),
            Err(SurveyError::MissingName { lineno: 3 })
        ));
    }

    fn workbook_source(file: &str, worksheet: Option<&str>) -> (String, FileSource) {
        let path = format!(
            "{}/tests/data/excel_survey/{}",
            env!("CARGO_MANIFEST_DIR"),
            file
        );
        let mut source = SurveyConfig::for_input(&path).source;
        source.excel_worksheet_name = worksheet.map(|s| s.to_string());
        (path, source)
    }

    #[test]
    fn single_worksheet_is_picked() {
        let (path, source) = workbook_source("raw_data.xlsx", None);
        let table = read_excel_table(&path, &source).unwrap();
        assert_eq!(table.traits().len(), 8);
        assert_eq!(table.traits()[0], "Teaching");
        assert_eq!(table.len(), 4);
        assert_eq!(table.respondents()[3].name, "Dan");
        assert_eq!(
            table.respondents()[0].scores,
            vec![15.0, 12.0, 9.0, 14.0, 7.0, 13.0, 5.0, 10.0]
        );
    }

    #[test]
    fn named_worksheet() {
        let (path, source) = workbook_source("two_sheets.xlsx", Some("Form1"));
        let table = read_excel_table(&path, &source).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.respondents()[1].name, "Bob");
    }

    #[test]
    fn unknown_worksheet() {
        let (path, source) = workbook_source("two_sheets.xlsx", Some("Form2"));
        match read_excel_table(&path, &source) {
            Err(SurveyError::MissingWorksheet { name, .. }) => assert_eq!(name, "Form2"),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn several_worksheets_need_a_name() {
        let (path, source) = workbook_source("two_sheets.xlsx", None);
        assert!(matches!(
            read_excel_table(&path, &source),
            Err(SurveyError::AmbiguousWorksheet { .. })
        ));
    }

    #[test]
    fn missing_workbook() {
        let (path, source) = workbook_source("no_such_file.xlsx", None);
        assert!(matches!(
            read_excel_table(&path, &source),
            Err(SurveyError::OpeningExcel { .. })
        ));
    }

    #[test]
    fn empty_sheet() {
        let range: Range<DataType> = Range::empty();
        assert!(matches!(
            read_range(&range),
            Err(SurveyError::MissingHeader {})
        ));
    }
}
