//! Replays captured exchanges through the interception pipeline.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_bootstrap::{InterceptorConfig, PipelineBuilder};
use runtime::Interceptor;
use tracing::{info, warn};

use crate::capture::CapturedExchange;
use crate::sink::JsonLinesSink;

/// Replay a JSON-lines capture through the interceptor
#[derive(Parser, Debug)]
pub struct Replay {
    /// Capture file, one exchange per line
    #[arg(value_name = "CAPTURE")]
    capture: PathBuf,

    /// Write intercepted exchanges here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write notifications here instead of stderr
    #[arg(short, long, value_name = "FILE")]
    notifications: Option<PathBuf>,
}

impl Replay {
    pub fn execute(self, config: InterceptorConfig) -> Result<()> {
        let input = File::open(&self.capture)
            .with_context(|| format!("failed to open capture {}", self.capture.display()))?;

        let builder = PipelineBuilder::new(config);
        let setup = match &self.notifications {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                builder.sink(JsonLinesSink::new(file)).build()
            }
            None => builder.sink(JsonLinesSink::new(io::stderr())).build(),
        };

        let summary = match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                let summary = replay(&setup.interceptor, BufReader::new(input), &mut writer)?;
                writer.flush()?;
                summary
            }
            None => replay(&setup.interceptor, BufReader::new(input), &mut io::stdout().lock())?,
        };

        info!(
            exchanges = summary.exchanges,
            modified = summary.modified,
            skipped = summary.skipped,
            "Replay finished"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Exchanges run through the pipeline.
    pub exchanges: usize,
    /// Exchanges whose responses differ after interception.
    pub modified: usize,
    /// Lines that could not be parsed into an envelope.
    pub skipped: usize,
}

/// Runs every capture line of `input` through `interceptor` and writes the
/// intercepted exchange to `output` in the same format.
///
/// Unparsable lines are logged and skipped. I/O errors abort the replay.
pub fn replay<R: BufRead, W: Write>(
    interceptor: &Interceptor,
    input: R,
    output: &mut W,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("failed to read line {number}"))?;
        if line.trim().is_empty() {
            continue;
        }

        let envelope = match CapturedExchange::parse(&line).and_then(CapturedExchange::into_envelope) {
            Ok(envelope) => envelope,
            Err(error) => {
                warn!(line = number, %error, "Skipping capture line");
                summary.skipped += 1;
                continue;
            }
        };

        let intercepted = interceptor.on_exchange(envelope.clone());
        if intercepted != envelope {
            summary.modified += 1;
        }
        summary.exchanges += 1;

        let line = CapturedExchange::from_envelope(intercepted).to_line()?;
        writeln!(output, "{line}").with_context(|| format!("failed to write line {number}"))?;
    }

    Ok(summary)
}
