#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation, clippy::single_match_else)]

use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    time::{Duration, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use otpgen_core::OtpDescriptor;
use otpgen_engine::{Countdown, OtpCode, TotpEngine};
use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, Opt};

mod cli;

/// Width of the progress bar that `watch` prints next to each code.
const BAR_WIDTH: usize = 30;

fn main() -> Result<ExitCode> {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    let result = match opt.cmd {
        Command::Code { uri, time } => code(uri, time),
        Command::Watch { uri, count } => watch(uri, count),
        Command::Verify {
            uri,
            code,
            skew,
            time,
        } => verify(&uri, &code, skew, time),
        Command::Inspect { uri } => inspect(uri),
        Command::Completions { shell } => cli::completions(shell),
        Command::Manpages { dir } => cli::manpages(&dir),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is::<Mismatch>() => Ok(ExitCode::FAILURE),
        Err(e) => Err(e),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(level)
        .init();
}

/// Marker for a code that failed verification, turned into a failure exit code.
#[derive(Debug, thiserror::Error)]
#[error("the code is not valid")]
struct Mismatch;

/// Current Unix time. This is the only place that reads the system clock.
fn unix_now() -> Result<i64> {
    let secs = UNIX_EPOCH.elapsed()?.as_secs();
    i64::try_from(secs).context("system time is too far in the future")
}

fn load(uri: Option<String>) -> Result<(OtpDescriptor, String)> {
    let uri = match uri {
        Some(uri) => uri,
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed reading the URI from stdin")?;
            line
        }
    };

    let descriptor = uri
        .trim()
        .parse::<OtpDescriptor>()
        .context("failed parsing the otpauth URI")?;
    let name = match descriptor
        .issuer
        .as_deref()
        .or_else(|| descriptor.label_issuer())
    {
        Some(issuer) => format!("{issuer} ({})", descriptor.account()),
        None => descriptor.label.clone(),
    };

    Ok((descriptor, name))
}

fn engine(uri: Option<String>) -> Result<(TotpEngine, String)> {
    let (descriptor, name) = load(uri)?;
    let engine = TotpEngine::try_from(descriptor).context("failed setting up the generator")?;

    Ok((engine, name))
}

fn code(uri: Option<String>, time: Option<i64>) -> Result<()> {
    let (engine, name) = engine(uri)?;
    let now = time.map_or_else(unix_now, Ok)?;

    let code = engine.current_code(now)?;
    let remaining = engine.seconds_remaining(now)?;

    println!("{name}");
    println!("{code} (valid for {remaining}s)");

    Ok(())
}

fn watch(uri: Option<String>, count: Option<u64>) -> Result<()> {
    let (engine, name) = engine(uri)?;
    let ticker = crossbeam_channel::tick(Duration::from_millis(1000));
    let mut stdout = io::stdout().lock();
    let mut shown: Option<OtpCode> = None;
    let mut updates = 0;

    writeln!(stdout, "{name}")?;

    loop {
        let now = unix_now()?;
        let code = engine.current_code(now)?;
        let countdown = engine.countdown(now)?;

        if shown.as_ref() != Some(&code) {
            if shown.is_some() {
                writeln!(stdout)?;
            }
            debug!(counter = engine.counter(now)?, "code rolled over");
            shown = Some(code);
        }

        if let Some(code) = &shown {
            write!(stdout, "\r{code} {}", progress_bar(countdown))?;
            stdout.flush()?;
        }

        updates += 1;
        if count.is_some_and(|count| updates >= count) {
            writeln!(stdout)?;
            break;
        }

        ticker.recv()?;
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn progress_bar(countdown: Countdown) -> String {
    let filled = ((1.0 - countdown.progress) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    format!(
        "[{}{}] {:>2}s",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        countdown.remaining
    )
}

fn verify(uri: &str, code: &str, skew: u64, time: Option<i64>) -> Result<()> {
    let (engine, _) = engine(Some(uri.to_owned()))?;
    let now = time.map_or_else(unix_now, Ok)?;

    if engine.verify_with_skew(code.trim(), now, skew)? {
        info!(skew, "code accepted");
        println!("valid");
        Ok(())
    } else {
        info!(skew, "code rejected");
        println!("invalid");
        Err(Mismatch.into())
    }
}

fn inspect(uri: Option<String>) -> Result<()> {
    let (descriptor, _) = load(uri)?;

    println!("label:     {}", descriptor.label);
    println!(
        "issuer:    {}",
        descriptor
            .issuer
            .as_deref()
            .or_else(|| descriptor.label_issuer())
            .unwrap_or("-")
    );
    println!("account:   {}", descriptor.account());
    println!("digits:    {}", descriptor.config.digits());
    println!("period:    {}s", descriptor.config.period());
    println!("algorithm: {}", descriptor.config.algorithm());
    println!("key size:  {} bytes", descriptor.secret.len());

    Ok(())
}
