use log::{debug, info, warn};

use ranked_traits::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;

pub mod chart;
pub mod config_reader;
pub mod export;
pub mod io_common;
pub mod io_csv;
pub mod io_excel;

/// Special value for the output paths: the content is printed instead of being written.
pub const STDOUT: &str = "stdout";

pub const TOP_CHART_FILE: &str = "top_gifts.svg";
pub const BOTTOM_CHART_FILE: &str = "bottom_gifts.svg";

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The file {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The file {path} has several worksheets, pick one with excelWorksheetName"))]
    AmbiguousWorksheet { path: String },
    #[snafu(display("The input has no header row"))]
    MissingHeader {},
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error while reading a line"))]
    CsvLineParse { source: csv::Error },
    #[snafu(display("Line {lineno}: the score for {column} is not a number: {content:?}"))]
    MalformedScore {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Line {lineno}: the respondent has no name"))]
    MissingName { lineno: usize },
    #[snafu(display("Line {lineno}: {source}"))]
    InvalidTable {
        source: RankingErrors,
        lineno: usize,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Cannot access the current directory"))]
    CurrentDir { source: std::io::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing CSV"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("Error flushing the output"))]
    FlushingOutput { source: std::io::Error },
    #[snafu(display("Error drawing chart {title}"))]
    RenderingChart {
        source: plotters::drawing::DrawingAreaErrorKind<std::io::Error>,
        title: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

fn validate_count(name: &str, x: Option<u32>, default: usize) -> SurveyResult<usize> {
    match x {
        None => Ok(default),
        Some(0) => whatever!("{} must be at least 1", name),
        Some(n) => Ok(n as usize),
    }
}

fn validate_rules(rules: &SurveyRules) -> SurveyResult<RankRules> {
    let defaults = RankRules::DEFAULT_RULES;
    let res = RankRules {
        top_count: validate_count("topCount", rules.top_count, defaults.top_count)?,
        bottom_count: validate_count("bottomCount", rules.bottom_count, defaults.bottom_count)?,
        display_group_size: validate_count(
            "displayGroupSize",
            rules.display_group_size,
            defaults.display_group_size,
        )?,
    };
    Ok(res)
}

fn read_score_table(root_path: &Path, cfs: &FileSource) -> SurveyResult<ScoreTable> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read score file {:?}", p2);
    match cfs.provider().as_str() {
        "csv" => io_csv::read_csv_table(&p2, cfs),
        "xlsx" => io_excel::read_excel_table(&p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn frequency_to_json(freq: &FrequencyTable, grouping: &DisplayGrouping) -> JSValue {
    let tally: Vec<JSValue> = freq
        .entries()
        .iter()
        .map(|e| json!({"trait": e.name, "count": e.count}))
        .collect();
    let featured: Vec<JSValue> = grouping
        .featured
        .iter()
        .map(|f| json!({"trait": f.name, "count": f.count, "percentage": f.percentage}))
        .collect();
    let others = match &grouping.others {
        Some(o) => json!({"count": o.count, "traits": o.traits}),
        None => JSValue::Null,
    };
    json!({
        "tally": tally,
        "display": {"featured": featured, "others": others}
    })
}

fn build_summary_js(
    config: &SurveyConfig,
    table: &ScoreTable,
    agg: &Aggregate,
    rules: &RankRules,
) -> JSValue {
    let top_group = group_for_display(&agg.top, agg.respondents, rules);
    let bottom_group = group_for_display(&agg.bottom, agg.respondents, rules);
    json!({
        "config": {
            "survey": config.output_settings.survey_name,
            "respondents": agg.respondents,
            "traits": table.traits(),
        },
        "results": {
            "top": frequency_to_json(&agg.top, &top_group),
            "bottom": frequency_to_json(&agg.bottom, &bottom_group),
        }
    })
}

/// Resolves an output path against the output directory. The directory itself is
/// relative to the root of the configuration.
fn output_path(root: &Path, config: &SurveyConfig, file: &str) -> PathBuf {
    let dir = match &config.output_settings.output_directory {
        Some(d) => root.join(d),
        None => root.to_path_buf(),
    };
    dir.join(file)
}

fn create_output(path: &Path) -> SurveyResult<fs::File> {
    let path_s = path.display().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(WritingOutputSnafu {
            path: path_s.clone(),
        })?;
    }
    fs::File::create(path).context(WritingOutputSnafu { path: path_s })
}

fn write_text(path: &Path, content: &str) -> SurveyResult<()> {
    let mut file = create_output(path)?;
    file.write_all(content.as_bytes())
        .context(WritingOutputSnafu {
            path: path.display().to_string(),
        })?;
    Ok(())
}

/// The flags that have no effect when a single respondent is looked up.
fn ignored_with_name(args: &Args) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if args.export.is_some() {
        ignored.push("--export");
    }
    if args.charts {
        ignored.push("--charts");
    }
    if args.reference.is_some() {
        ignored.push("--reference");
    }
    ignored
}

/// Runs the program as requested by the command line.
pub fn run(args: &Args) -> SurveyResult<()> {
    let (config, root) = resolve_config(args)?;
    match &args.name {
        Some(name) => {
            let ignored = ignored_with_name(args);
            if !ignored.is_empty() {
                warn!("run: {} ignored when --name is given", ignored.join(", "));
            }
            run_lookup(&config, &root, name)
        }
        None => run_survey(&config, &root, &args.reference),
    }
}

/// Prints the top and bottom traits of a single respondent.
pub fn run_lookup(config: &SurveyConfig, root: &Path, name: &str) -> SurveyResult<()> {
    let rules = validate_rules(&config.rules)?;
    let table = read_score_table(root, &config.source)?;
    match lookup(&table, name, &rules) {
        Ok(rs) => {
            println!("Top gifts: {}", rs.top.join(", "));
            println!("Bottom gifts: {}", rs.bottom.join(", "));
            Ok(())
        }
        Err(RankingErrors::RespondentNotFound(n)) => {
            warn!("run_lookup: respondent {:?} not found", n);
            eprintln!("Name not found: {}", n);
            Ok(())
        }
        Err(e) => whatever!("Lookup error: {}", e),
    }
}

pub fn run_survey(
    config: &SurveyConfig,
    root: &Path,
    check_summary_path: &Option<String>,
) -> SurveyResult<()> {
    info!("config: {:?}", config);

    // Validate the rules:
    let rules = validate_rules(&config.rules)?;

    let table = read_score_table(root, &config.source)?;
    info!("# of respondents: {}", table.len());
    debug!("table: {:?}", table);

    let agg = aggregate(&table, &rules);

    // Assemble the final json
    let result_js = build_summary_js(config, &table, &agg, &rules);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    match config.output_settings.summary_file.as_deref() {
        None | Some(STDOUT) => println!("{}", pretty_js_stats),
        Some(file) => {
            let p = output_path(root, config, file);
            info!("Writing summary to {:?}", p);
            write_text(&p, &pretty_js_stats)?;
        }
    }

    if let Some(file) = &config.output_settings.export_file {
        if file == STDOUT {
            export::write_export(&agg.rows, std::io::stdout())?;
        } else {
            let p = output_path(root, config, file);
            info!("Writing export to {:?}", p);
            export::write_export(&agg.rows, create_output(&p)?)?;
        }
    }

    if config.output_settings.generate_charts.unwrap_or(false) {
        let charts = [
            (
                "Top Gifts",
                &agg.top,
                &chart::TOP_PALETTE[..],
                TOP_CHART_FILE,
            ),
            (
                "Bottom Gifts",
                &agg.bottom,
                &chart::BOTTOM_PALETTE[..],
                BOTTOM_CHART_FILE,
            ),
        ];
        for (title, freq, palette, file) in charts {
            let grouping = group_for_display(freq, agg.respondents, &rules);
            let svg = chart::render_pie_svg(title, &grouping, palette)?;
            let p = output_path(root, config, file);
            info!("Writing chart to {:?}", p);
            write_text(&p, &svg)?;
        }
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_survey_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");
    info!("Running test {}", test_name);
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        ..Default::default()
    };
    let res = run(&args);
    if let Err(e) = res {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = snafu::ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        panic!("Test {} failed", test_name);
    }
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_survey_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn sample_survey() {
        init();
        test_wrapper("sample_survey");
    }

    #[test]
    fn excel_survey() {
        init();
        test_wrapper("excel_survey");
    }

    #[test]
    fn flags_ignored_by_lookup() {
        let args = Args {
            name: Some("Bob".to_string()),
            export: Some("report.csv".to_string()),
            charts: true,
            ..Default::default()
        };
        assert_eq!(ignored_with_name(&args), vec!["--export", "--charts"]);
        let args = Args {
            name: Some("Bob".to_string()),
            reference: Some("summary.json".to_string()),
            ..Default::default()
        };
        assert_eq!(ignored_with_name(&args), vec!["--reference"]);
        assert!(ignored_with_name(&Args::default()).is_empty());
    }

    #[test]
    fn tab_delimited() {
        init();
        test_wrapper("tab_delimited");
    }

    #[test]
    fn writes_export_and_charts() {
        init();
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_survey");
        let out_dir = std::env::temp_dir().join("giftrank_writes_export_and_charts");
        let mut config = read_config(
            root.join("sample_survey_config.json")
                .display()
                .to_string()
                .as_str(),
        )
        .unwrap();
        config.output_settings.output_directory = Some(out_dir.display().to_string());
        config.output_settings.summary_file = Some("summary.json".to_string());
        config.output_settings.export_file = Some("report.csv".to_string());
        config.output_settings.generate_charts = Some(true);
        run_survey(&config, &root, &None).unwrap();

        let export = fs::read_to_string(out_dir.join("report.csv")).unwrap();
        let lines: Vec<&str> = export.lines().collect();
        assert_eq!(lines[0], "Name,Top Gifts,Bottom Gifts");
        assert_eq!(
            lines[1],
            "Alice,\"Teaching, Giving, Faith\",\"Leadership, Service, Wisdom\""
        );
        assert_eq!(lines.len(), 5);
        let summary = read_summary(out_dir.join("summary.json").to_str().unwrap()).unwrap();
        assert_eq!(summary["config"]["respondents"], 4);
        assert!(fs::read_to_string(out_dir.join(TOP_CHART_FILE))
            .unwrap()
            .contains("<svg"));
        assert!(out_dir.join(BOTTOM_CHART_FILE).exists());
    }

    #[test]
    fn unknown_respondent_is_not_an_error() {
        init();
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/sample_survey");
        let config = SurveyConfig::for_input("raw_data.csv");
        assert!(run_lookup(&config, &root, "Zed").is_ok());
        assert!(run_lookup(&config, &root, "Bob").is_ok());
    }

    #[test]
    fn unknown_provider() {
        let mut source = SurveyConfig::for_input("raw_data.csv").source;
        source.provider = Some("ods".to_string());
        assert!(read_score_table(Path::new("."), &source).is_err());
    }

    #[test]
    fn rules_defaults() {
        let rules = validate_rules(&SurveyRules::default()).unwrap();
        assert_eq!(rules, RankRules::DEFAULT_RULES);
    }

    #[test]
    fn rules_reject_zero() {
        let rules = SurveyRules {
            top_count: Some(0),
            ..Default::default()
        };
        assert!(validate_rules(&rules).is_err());
        let rules = SurveyRules {
            display_group_size: Some(2),
            ..Default::default()
        };
        assert_eq!(validate_rules(&rules).unwrap().display_group_size, 2);
    }

    #[test]
    fn summary_layout() {
        let traits: Vec<String> = ["Mercy", "Faith", "Giving"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut builder = builder::Builder::new(&traits).unwrap();
        builder.add_respondent("Anna", &[3.0, 2.0, 1.0]).unwrap();
        let table = builder.build();
        let rules = RankRules {
            top_count: 1,
            bottom_count: 1,
            display_group_size: 7,
        };
        let agg = aggregate(&table, &rules);
        let config = SurveyConfig::for_input("gifts.csv");
        let js = build_summary_js(&config, &table, &agg, &rules);
        assert_eq!(js["config"]["survey"], "gifts.csv");
        assert_eq!(js["config"]["respondents"], 1);
        assert_eq!(js["results"]["top"]["tally"][0]["trait"], "Mercy");
        assert_eq!(js["results"]["bottom"]["tally"][0]["trait"], "Giving");
        assert_eq!(
            js["results"]["top"]["display"]["featured"][0]["percentage"],
            100.0
        );
        assert!(js["results"]["top"]["display"]["others"].is_null());
    }

    #[test]
    fn output_paths() {
        let mut config = SurveyConfig::for_input("gifts.csv");
        let root = Path::new("data");
        assert_eq!(
            output_path(root, &config, "report.csv"),
            PathBuf::from("data/report.csv")
        );
        config.output_settings.output_directory = Some("out".to_string());
        assert_eq!(
            output_path(root, &config, "report.csv"),
            PathBuf::from("data/out/report.csv")
        );
    }
}
