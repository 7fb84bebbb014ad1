use clap::Parser;

/// This is a ranking and tallying program for trait-score surveys.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the survey description in JSON format.
    /// See the manual of the ranked_traits crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the summary of a survey in JSON format. If provided, giftrank will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the survey will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the scores. Setting this option overrides the file that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx) The type of the input. By default, it is deduced from the extension of the input file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (name, optional) If specified, only shows the top and bottom traits of this respondent.
    #[clap(short, long, value_parser)]
    pub name: Option<String>,

    /// (file path, optional) If specified, writes one line per respondent with their top and bottom traits
    /// in CSV format.
    #[clap(short, long, value_parser)]
    pub export: Option<String>,

    /// If passed as an argument, writes the pie charts of the top and bottom traits in SVG format.
    #[clap(long, takes_value = false)]
    pub charts: bool,

    /// (directory, optional) Where the summary, the export and the charts are written.
    #[clap(long, value_parser)]
    pub output_directory: Option<String>,

    /// (default 3) How many of the highest scores define the top traits of a respondent.
    #[clap(long, value_parser)]
    pub top_count: Option<u32>,

    /// (default 3) How many of the lowest scores define the bottom traits of a respondent.
    #[clap(long, value_parser)]
    pub bottom_count: Option<u32>,

    /// (default 7) How many traits are shown on their own in the charts before the others are merged.
    #[clap(long, value_parser)]
    pub display_group_size: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
