use clap::Parser;
use common::KeyValue;
use itertools::Itertools;
use std::{
    fs::{read_to_string, File},
    io::{BufWriter, Write},
    path::PathBuf,
};
use tracing::info;
use wordfreq::{
    init_logger,
    logger::level_from_verbosity,
    normalize,
    stages::{map_token, reduce_group},
    Vocabulary,
};

/// Counts words across local files on the calling thread only.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(short, long, default_value = "mr-wc-seq")]
    output: PathBuf,
    /// Only count these words (case-insensitive)
    #[arg(short, long = "words")]
    words: Vec<String>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(required = true)]
    input_files: Vec<PathBuf>,
}

/// Map every text, sort the pairs, reduce each run of equal keys.
fn sequential_count<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    filter: Option<&Vocabulary>,
) -> Vec<(String, u64)> {
    let mut intermediate: Vec<KeyValue> = texts
        .into_iter()
        .flat_map(|text| normalize(text, filter))
        .map(|token| map_token(&token))
        .collect_vec();

    intermediate.sort();

    let mut output = vec![];
    for (k, kvs) in intermediate
        .into_iter()
        .group_by(|kv| kv.key.clone())
        .into_iter()
    {
        output.push(reduce_group((k, kvs.map(|kv| kv.value).collect_vec())));
    }
    output
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logger(level_from_verbosity(cli.verbose), None)?;

    let contents = cli
        .input_files
        .iter()
        .map(read_to_string)
        .collect::<Result<Vec<_>, _>>()?;
    let vocabulary = Vocabulary::new(&cli.words);
    let counts = sequential_count(contents.iter().map(String::as_str), Some(&vocabulary));

    let mut output_file = BufWriter::new(File::create(&cli.output)?);
    for (k, count) in &counts {
        writeln!(output_file, "{} {}", k, count)?;
    }
    output_file.flush()?;
    info!("wrote {} keys to {}", counts.len(), cli.output.display());

    Ok(())
}
