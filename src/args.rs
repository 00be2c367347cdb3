use clap::Parser;

/// Loads Nevada election result files and writes normalized result records.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration listing the files to load and their election metadata.
    /// When provided, the file paths in the configuration are relative to the configuration file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file with the expected output in JSON lines format. If provided, nvload will
    /// check that the produced records match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) Where the records are written, one JSON object per line.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) The results file to load when no configuration is given.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or xlsx, default from the file extension) The type of the input.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (election id, for example nv-2010-06-08-primary) Required when no configuration is given.
    #[clap(short, long, value_parser)]
    pub election: Option<String>,

    /// (OCD division id) The jurisdiction covered by the input file.
    #[clap(long, value_parser)]
    pub ocd_id: Option<String>,

    /// (name) The display name of the jurisdiction covered by the input file.
    #[clap(long, value_parser)]
    pub name: Option<String>,

    /// (url) The location of the structured version of the results, if any.
    #[clap(long, value_parser)]
    pub raw_url: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
