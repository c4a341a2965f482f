use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::Shell;
use otpgen_engine::{DEFAULT_SKEW, MAX_SKEW};

#[derive(Parser)]
#[command(about, author, version, propagate_version = true)]
pub struct Opt {
    /// Increase log output on stderr, can be repeated up to three times.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Command,
}

impl Opt {
    pub fn parse() -> Self {
        <Opt as Parser>::parse()
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the currently valid code of an account.
    Code {
        /// The `otpauth://totp/...` URI of the account. Read from stdin if omitted.
        uri: Option<String>,
        /// Unix timestamp to generate the code for, instead of the current time.
        #[arg(short, long, allow_negative_numbers = true)]
        time: Option<i64>,
    },
    /// Continuously print the current code and the time until it expires.
    Watch {
        /// The `otpauth://totp/...` URI of the account. Read from stdin if omitted.
        uri: Option<String>,
        /// Stop after this many updates, instead of running until interrupted.
        #[arg(short, long)]
        count: Option<u64>,
    },
    /// Check whether a code is valid for an account.
    ///
    /// Exits with status `0` if the code matches, `1` otherwise.
    Verify {
        /// The `otpauth://totp/...` URI of the account.
        uri: String,
        /// The code to verify.
        code: String,
        /// Amount of time steps before and after the current one that are accepted as well.
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_SKEW,
            value_parser = clap::value_parser!(u64).range(..=MAX_SKEW),
        )]
        skew: u64,
        /// Unix timestamp to verify the code against, instead of the current time.
        #[arg(short, long, allow_negative_numbers = true)]
        time: Option<i64>,
    },
    /// Show the parameters of an account, without revealing its secret.
    Inspect {
        /// The `otpauth://totp/...` URI of the account. Read from stdin if omitted.
        uri: Option<String>,
    },
    /// Generate auto-completion scripts for various shells.
    Completions {
        /// Shell to generate an auto-completion script for.
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Generate man pages into the given directory.
    Manpages {
        /// Target directory, that must already exist and be empty. If the any file with the same
        /// name as any of the man pages already exist, it'll not be overwritten, but instead an
        /// error be returned.
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },
}

#[allow(clippy::unnecessary_wraps)]
pub fn completions(shell: Shell) -> Result<()> {
    clap_complete::generate(
        shell,
        &mut Opt::command(),
        env!("CARGO_PKG_NAME"),
        &mut io::stdout().lock(),
    );
    Ok(())
}

pub fn manpages(dir: &Path) -> Result<()> {
    fn print(dir: &Path, app: &clap::Command) -> Result<()> {
        let name = app.get_display_name().unwrap_or_else(|| app.get_name());
        let out = dir.join(format!("{name}.1"));
        let mut out = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&out)
            .with_context(|| format!("the file `{}` already exists", out.display()))?;

        clap_mangen::Man::new(app.clone()).render(&mut out)?;
        out.flush()?;

        for sub in app.get_subcommands() {
            print(dir, sub)?;
        }

        Ok(())
    }

    ensure!(dir.try_exists()?, "target directory doesn't exist");

    let mut app = Opt::command();
    app.build();

    print(dir, &app)
}
