// SPDX-License-Identifier: GPL-3.0-or-later

/*
 *  src/main.rs - Recover readable text from ASUS FZ and ASRock CAE files.
 *  Copyright (C) 2026  Forest Crossman <cyrozap@gmail.com>
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcbscrub::scrub::{Scrubbed, scrub};
use pcbscrub::unscramble::{READABLE_ENTROPY_THRESHOLD, SearchOptions};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The board file to read.
    file: PathBuf,

    /// Where to write the recovered characters.
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Also try XOR with a repeating key of this many bytes.
    #[arg(short, long)]
    key_length: Option<NonZeroUsize>,

    /// Entropy (bits per byte) below which a candidate is accepted.
    #[arg(short, long, default_value_t = READABLE_ENTROPY_THRESHOLD, value_parser = parse_threshold)]
    threshold: f64,
}

impl Args {
    fn search_options(&self) -> SearchOptions {
        SearchOptions {
            threshold: self.threshold,
            key_length: self.key_length,
        }
    }
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if !value.is_finite() {
        return Err(format!("{} is not a finite number", s));
    }
    Ok(value)
}

fn run(args: &Args) -> pcbscrub::Result<Scrubbed> {
    scrub(&args.file, &args.output, args.search_options())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(scrubbed) => {
            println!("Entropy: {}", scrubbed.entropy);
            println!("CSV output saved to: {}", args.output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Error processing file {:?}: {}", &args.file, error);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use pcbscrub::Error;

    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pcbscrub", "board.fz"]).unwrap();
        assert_eq!(args.output, PathBuf::from("output.csv"));
        assert_eq!(args.search_options(), SearchOptions::default());
    }

    #[test]
    fn test_options_pass_through() {
        let args = Args::try_parse_from([
            "pcbscrub",
            "board.fz",
            "-o",
            "out.csv",
            "--key-length",
            "8",
            "--threshold",
            "6.5",
        ])
        .unwrap();
        assert_eq!(
            args.search_options(),
            SearchOptions {
                threshold: 6.5,
                key_length: NonZeroUsize::new(8),
            }
        );
    }

    #[test]
    fn test_threshold_must_be_finite() {
        for bad in ["NaN", "nan", "inf", "-inf", "seven"] {
            let result = Args::try_parse_from(["pcbscrub", "board.fz", "--threshold", bad]);
            assert!(result.is_err(), "{} was accepted", bad);
        }
    }

    #[test]
    fn test_zero_key_length_is_rejected() {
        let result = Args::try_parse_from(["pcbscrub", "board.fz", "--key-length", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            file: dir.path().join("missing.fz"),
            output: dir.path().join("out.csv"),
            key_length: None,
            threshold: READABLE_ENTROPY_THRESHOLD,
        };
        assert!(matches!(run(&args), Err(Error::Io(_))));
        assert!(!args.output.exists());
    }

    #[test]
    fn test_run_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("garbage.fz");
        std::fs::write(&input, b"not a board file").unwrap();
        let args = Args {
            file: input,
            output: dir.path().join("out.csv"),
            key_length: None,
            threshold: READABLE_ENTROPY_THRESHOLD,
        };
        assert!(matches!(run(&args), Err(Error::Decode(_) | Error::Io(_))));
        assert!(!args.output.exists());
    }
}
