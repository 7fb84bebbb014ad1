use crate::args::Args;
use crate::survey::io_common::simplify_file_name;
use crate::survey::*;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    // "stdout" is accepted as well as a file name.
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
    #[serde(rename = "exportFile")]
    pub export_file: Option<String>,
    #[serde(rename = "generateCharts")]
    pub generate_charts: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "delimiter")]
    pub delimiter: Option<String>,
}

impl FileSource {
    /// The provider to use for this file. When it is not given, it is guessed from the extension.
    pub fn provider(&self) -> String {
        match &self.provider {
            Some(p) => p.clone(),
            None if self.file_path.to_lowercase().ends_with(".xlsx") => "xlsx".to_string(),
            None => "csv".to_string(),
        }
    }

    pub fn delimiter(&self) -> SurveyResult<u8> {
        match self.delimiter.as_deref() {
            None => Ok(b','),
            Some("\\t") | Some("tab") => Ok(b'\t'),
            Some(d) if d.len() == 1 => Ok(d.as_bytes()[0]),
            Some(d) => whatever!("The delimiter must be a single character, got {:?}", d),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyRules {
    #[serde(rename = "topCount")]
    pub top_count: Option<u32>,
    #[serde(rename = "bottomCount")]
    pub bottom_count: Option<u32>,
    #[serde(rename = "displayGroupSize")]
    pub display_group_size: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub source: FileSource,
    #[serde(default)]
    pub rules: SurveyRules,
}

impl SurveyConfig {
    /// A configuration with all the defaults, reading the given file.
    pub fn for_input(input: &str) -> SurveyConfig {
        SurveyConfig {
            output_settings: OutputSettings {
                survey_name: simplify_file_name(input),
                output_directory: None,
                summary_file: None,
                export_file: None,
                generate_charts: None,
            },
            source: FileSource {
                provider: None,
                file_path: input.to_string(),
                excel_worksheet_name: None,
                delimiter: None,
            },
            rules: SurveyRules::default(),
        }
    }

    /// Applies the flags passed on the command line on top of this configuration.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.source.file_path = input.clone();
        }
        if args.input_type.is_some() {
            self.source.provider = args.input_type.clone();
        }
        if args.excel_worksheet_name.is_some() {
            self.source.excel_worksheet_name = args.excel_worksheet_name.clone();
        }
        if args.out.is_some() {
            self.output_settings.summary_file = args.out.clone();
        }
        if args.export.is_some() {
            self.output_settings.export_file = args.export.clone();
        }
        if args.charts {
            self.output_settings.generate_charts = Some(true);
        }
        if args.output_directory.is_some() {
            self.output_settings.output_directory = args.output_directory.clone();
        }
        if args.top_count.is_some() {
            self.rules.top_count = args.top_count;
        }
        if args.bottom_count.is_some() {
            self.rules.bottom_count = args.bottom_count;
        }
        if args.display_group_size.is_some() {
            self.rules.display_group_size = args.display_group_size;
        }
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Finds the configuration and the directory against which its paths are resolved.
///
/// The paths given on the command line are relative to the current directory, the ones
/// inside a configuration file are relative to that file.
pub fn resolve_config(args: &Args) -> SurveyResult<(SurveyConfig, PathBuf)> {
    match (&args.config, &args.input) {
        (Some(config_path), _) => {
            let mut config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            // Flags are relative to the current directory, which may not be the root.
            let cwd = std::env::current_dir().context(CurrentDirSnafu {})?;
            let mut overrides = args.clone();
            overrides.input = args.input.as_ref().map(|p| absolute(&cwd, p));
            overrides.out = args.out.as_ref().map(|p| absolute(&cwd, p));
            overrides.export = args.export.as_ref().map(|p| absolute(&cwd, p));
            overrides.output_directory = args
                .output_directory
                .as_ref()
                .map(|p| absolute(&cwd, p));
            config.apply_args(&overrides);
            debug!("resolve_config: config: {:?} root: {:?}", config, root);
            Ok((config, root))
        }
        (None, Some(input)) => {
            let mut config = SurveyConfig::for_input(input);
            config.apply_args(args);
            debug!("resolve_config: config: {:?}", config);
            Ok((config, PathBuf::from(".")))
        }
        (None, None) => whatever!("Either --config or --input must be provided"),
    }
}

fn absolute(cwd: &Path, p: &str) -> String {
    if p == STDOUT {
        return p.to_string();
    }
    cwd.join(p).display().to_string()
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() {
        let js = r#"{
            "outputSettings": {
                "surveyName": "Gifts",
                "outputDirectory": "out",
                "summaryFile": "stdout",
                "exportFile": "report.csv",
                "generateCharts": true
            },
            "source": {"provider": "xlsx", "filePath": "data.xlsx", "excelWorksheetName": "Form1"},
            "rules": {"topCount": 2, "displayGroupSize": 5}
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.survey_name, "Gifts");
        assert_eq!(config.output_settings.generate_charts, Some(true));
        assert_eq!(config.source.provider(), "xlsx");
        assert_eq!(config.source.excel_worksheet_name.as_deref(), Some("Form1"));
        assert_eq!(config.rules.top_count, Some(2));
        assert_eq!(config.rules.bottom_count, None);
    }

    #[test]
    fn rules_are_optional() {
        let js = r#"{
            "outputSettings": {"surveyName": "Gifts"},
            "source": {"filePath": "raw_data.csv"}
        }"#;
        let config: SurveyConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.rules, SurveyRules::default());
        assert_eq!(config.source.provider(), "csv");
    }

    #[test]
    fn provider_from_extension() {
        let config = SurveyConfig::for_input("input/Survey.XLSX");
        assert_eq!(config.source.provider(), "xlsx");
        assert_eq!(config.output_settings.survey_name, "Survey.XLSX");
    }

    #[test]
    fn delimiters() {
        let mut source = SurveyConfig::for_input("a.csv").source;
        assert_eq!(source.delimiter().unwrap(), b',');
        source.delimiter = Some(";".to_string());
        assert_eq!(source.delimiter().unwrap(), b';');
        source.delimiter = Some("tab".to_string());
        assert_eq!(source.delimiter().unwrap(), b'\t');
        source.delimiter = Some(";;".to_string());
        assert!(source.delimiter().is_err());
    }

    #[test]
    fn args_override_the_file() {
        let mut config = SurveyConfig::for_input("a.csv");
        let args = Args {
            input: Some("b.csv".to_string()),
            export: Some("report.csv".to_string()),
            charts: true,
            top_count: Some(4),
            ..Default::default()
        };
        config.apply_args(&args);
        assert_eq!(config.source.file_path, "b.csv");
        assert_eq!(config.output_settings.export_file.as_deref(), Some("report.csv"));
        assert_eq!(config.output_settings.generate_charts, Some(true));
        assert_eq!(config.rules.top_count, Some(4));
        assert_eq!(config.rules.bottom_count, None);
        // The survey name still comes from the first input.
        assert_eq!(config.output_settings.survey_name, "a.csv");
    }

    #[test]
    fn input_or_config_is_required() {
        assert!(resolve_config(&Args::default()).is_err());
    }
}
