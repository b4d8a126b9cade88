mod data;
mod report;
mod state;

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use data::store::DataStore;
use state::Selection;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (path, picked) = parse_args(&args)?;

    let store = DataStore::new(path);
    let dataset = store
        .get()
        .with_context(|| format!("loading dataset from {}", store.path().display()))?;

    // Default to the full dataset window, like the date picker's initial
    // value in the dashboard.
    let picked = match picked {
        Some(dates) => dates,
        None => match (dataset.min_date(), dataset.max_date()) {
            (Some(min), Some(max)) => vec![min, max],
            _ => bail!("dataset {} contains no records", store.path().display()),
        },
    };

    let selection = Selection::classify(&dataset, &picked);
    print!("{}", report::render(&selection));
    Ok(())
}

fn parse_args(args: &[String]) -> Result<(PathBuf, Option<Vec<NaiveDate>>)> {
    match args {
        [path] => Ok((PathBuf::from(path), None)),
        [path, start] => Ok((PathBuf::from(path), Some(vec![parse_date(start)?]))),
        [path, start, end] => Ok((
            PathBuf::from(path),
            Some(vec![parse_date(start)?, parse_date(end)?]),
        )),
        _ => bail!("usage: bikeshare-engine <data.csv|data.json> [START [END]] (dates as YYYY-MM-DD)"),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}
