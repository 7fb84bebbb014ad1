// Primitives shared by the readers.

use std::path::Path;

use log::debug;
use ranked_traits::builder::Builder;
use snafu::prelude::*;

use crate::survey::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Starts a table from the header row. The first column holds the respondent names and
/// its title is ignored.
pub fn start_table(header: &[String]) -> SurveyResult<Builder> {
    let traits: Vec<String> = header.iter().skip(1).map(|s| s.trim().to_string()).collect();
    debug!("start_table: traits: {:?}", traits);
    Builder::new(&traits).context(InvalidTableSnafu { lineno: 1usize })
}

pub fn parse_score(cell: &str, lineno: usize, column: &str) -> SurveyResult<f64> {
    let content = cell.trim();
    match content.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(x),
        _ => MalformedScoreSnafu {
            lineno,
            column,
            content,
        }
        .fail(),
    }
}

/// The name of a respondent, which may not be blank.
pub fn respondent_name(cell: &str, lineno: usize) -> SurveyResult<String> {
    let name = cell.trim();
    ensure!(!name.is_empty(), MissingNameSnafu { lineno });
    Ok(name.to_string())
}

/// The name of the trait in the given score column, for error messages.
pub fn column_name(traits: &[String], idx: usize) -> String {
    traits
        .get(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("input/raw_data.csv"), "raw_data.csv");
        assert_eq!(simplify_file_name("raw_data.csv"), "raw_data.csv");
    }

    #[test]
    fn scores() {
        assert_eq!(parse_score(" 12 ", 2, "Mercy").unwrap(), 12.0);
        assert_eq!(parse_score("3.5", 2, "Mercy").unwrap(), 3.5);
        assert!(matches!(
            parse_score("", 4, "Mercy"),
            Err(SurveyError::MalformedScore { lineno: 4, .. })
        ));
        assert!(parse_score("high", 2, "Mercy").is_err());
        assert!(parse_score("NaN", 2, "Mercy").is_err());
        assert!(parse_score("inf", 2, "Mercy").is_err());
    }

    #[test]
    fn names() {
        assert_eq!(respondent_name(" Anna ", 2).unwrap(), "Anna");
        assert!(matches!(
            respondent_name("  ", 5),
            Err(SurveyError::MissingName { lineno: 5 })
        ));
    }

    #[test]
    fn header_skips_the_name_column() {
        let header: Vec<String> = vec!["Name".into(), " Mercy".into(), "Faith ".into()];
        let mut builder = start_table(&header).unwrap();
        builder.add_respondent("Anna", &[1.0, 2.0]).unwrap();
        assert_eq!(builder.build().traits(), &["Mercy", "Faith"]);
    }

    #[test]
    fn header_with_duplicates() {
        let header: Vec<String> = vec!["Name".into(), "Mercy".into(), "Mercy".into()];
        assert!(matches!(
            start_table(&header),
            Err(SurveyError::InvalidTable { lineno: 1, .. })
        ));
    }
}
