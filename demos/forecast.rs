/*!
Forecast the next week of closes for a stock and recommend what to do about it
*/

use anyhow::format_err;
use chrono::NaiveDate;
use clap::{App, Arg};
use closecast::config::{DeviceChoice, TrainConfig};
use closecast::data::daily::{read_series, write_points, DAILY_DATE};
use closecast::data::fake::{fake_series, PriceRandomWalk};
use closecast::data::PriceSeries;
use closecast::pipeline::{run, Report};
use closecast::PipelineConfig;
use indicatif::{ProgressBar, ProgressStyle};
use io_enum::*;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::Normal;
use rustyline::error::ReadlineError;
use rustyline::Editor;
use std::fs::File;
use std::io::{stdin, Stdin};
use std::path::Path;

#[derive(Debug, Read)]
pub enum IoSources {
    Stdin(Stdin),
    File(File),
}

/// Ask for a path to a CSV of daily closes, returning `None` if the user gives up
fn prompt_path() -> Option<String> {
    let mut rl = Editor::<()>::new();
    loop {
        match rl.readline("Daily closes CSV (date,close): ") {
            Ok(line) if line.trim().is_empty() => eprintln!("Please enter a path"),
            Ok(line) => break Some(line.trim().to_string()),
            Err(ReadlineError::Interrupted) => {
                eprintln!("CTRL-C");
                return None;
            }
            Err(ReadlineError::Eof) => {
                eprintln!("CTRL-D");
                return None;
            }
            Err(err) => eprintln!("Error: {:?}", err),
        }
    }
}

fn load_series(input: Option<&str>, fake: Option<usize>) -> anyhow::Result<PriceSeries> {
    if let Some(days) = fake {
        let mut walk = PriceRandomWalk {
            rng: StdRng::seed_from_u64(0),
            price: 40.0,
            returns: Normal::new(0.0005, 0.015)
                .map_err(|err| format_err!("Bad return distribution: {:?}", err))?,
        };
        let start = NaiveDate::from_ymd_opt(2020, 9, 11).ok_or_else(|| format_err!("Bad start date"))?;
        return Ok(fake_series(&mut walk, start, days)?);
    }
    let reader = if let Some(path) = input {
        IoSources::File(File::open(Path::new(path))?)
    } else {
        IoSources::Stdin(stdin())
    };
    Ok(read_series(reader)?)
}

fn print_report(report: &Report) {
    println!("Current close: ${:.2}", report.last.c);
    println!("\nForecast for the next week:");
    for point in report.dated.iter() {
        println!("{}: ${:.2}", point.t.format("%d/%m/%Y"), point.c);
    }
    println!("\nMean squared error (MSE) of the model: {:.4}", report.metrics.mse);
    println!("Mean absolute error (MAE) of the model: {:.4}", report.metrics.mae);
    println!("\nForecast change: {:.2}%", report.signal.pct_change);
    println!(
        "Recommendation: {} {}",
        report.signal.recommendation,
        report.signal.recommendation.advice()
    );
}

pub fn main() -> anyhow::Result<()> {
    let matches = App::new("Closecast")
        .version("1.0")
        .author("Jad Elkhaleq Ghalayini <jad.ghalayini@mail.utoronto.ca>")
        .about("Trains an LSTM on a stock's daily closes and forecasts the next five business days")
        .arg(
            Arg::with_name("INPUT")
                .help("Daily closes in CSV format (date,close); reads stdin if omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("interactive")
                .short("i")
                .long("interactive")
                .help("Prompt for the input file"),
        )
        .arg(
            Arg::with_name("fake")
                .long("fake")
                .help("Forecast a seeded random walk of this many days instead of reading input")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("epochs")
                .short("e")
                .long("epochs")
                .help("Training epochs. Defaults to 300")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .help("Also write the dated forecast to this CSV file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("device")
                .short("d")
                .long("device")
                .help("Device to use: cuda, cpu. Defaults to cuda if available")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Log more; repeat for more detail"),
        )
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let device = match matches.value_of("device") {
        None => DeviceChoice::Auto,
        Some("cuda") => DeviceChoice::Cuda,
        Some("cpu") => DeviceChoice::Cpu,
        Some(device) => Err(format_err!("Invalid value for device: {:?}", device))?,
    };
    let epochs = matches
        .value_of("epochs")
        .map(|e| usize::from_str_radix(e, 10))
        .unwrap_or(Ok(TrainConfig::default().epochs))?;
    let fake = matches
        .value_of("fake")
        .map(|n| usize::from_str_radix(n, 10))
        .transpose()?;
    let config = PipelineConfig::default()
        .with_train(TrainConfig::default().with_epochs(epochs))
        .with_device(device);

    let prompted = if matches.is_present("interactive") && fake.is_none() {
        match prompt_path() {
            Some(path) => Some(path),
            None => return Ok(()),
        }
    } else {
        None
    };
    let input = prompted.as_deref().or_else(|| matches.value_of("INPUT"));
    let series = load_series(input, fake)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner} {msg} [{elapsed}]"));
    spinner.set_message(&format!(
        "Training on {} closes up to {}",
        series.len(),
        series.last().t.format(DAILY_DATE)
    ));
    spinner.enable_steady_tick(100);
    let report = run(&series, &config);
    spinner.finish_and_clear();
    let report = report?;

    print_report(&report);

    if let Some(path) = matches.value_of("output") {
        let written = write_points(File::create(Path::new(path))?, report.dated.iter().copied())?;
        eprintln!("Wrote {} forecast rows to {}", written, path);
    }

    Ok(())
}
