//! Test reporter - display run results

use crate::testing::runner::{RunResult, TestOutcome, TestRun};
use colored::*;
use serde::Deserialize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::str::FromStr;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Failure lines followed by `true` or `false`
    #[default]
    Plain,
    /// One line per test, failure details and a summary
    Verbose,
    /// A single JSON object
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "verbose" => Ok(OutputFormat::Verbose),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{}' (expected plain, verbose or json)",
                other
            )),
        }
    }
}

/// Test reporter with output configuration
#[derive(Debug, Default)]
pub struct TestReporter {
    format: OutputFormat,
    /// Disable colored output
    no_color: bool,
}

impl TestReporter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            no_color: false,
        }
    }

    /// Disable colored output
    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    /// Write the rendered result to stdout
    pub fn report(&self, result: &RunResult) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        out.write_all(self.render(result).as_bytes())?;
        out.flush()
    }

    /// Render a result in the configured format
    pub fn render(&self, result: &RunResult) -> String {
        match self.format {
            OutputFormat::Plain => render_plain(result),
            OutputFormat::Verbose => self.render_verbose(result),
            OutputFormat::Json => render_json(result),
        }
    }

    fn render_verbose(&self, result: &RunResult) -> String {
        let mut out = String::new();

        for run in result.runs() {
            let _ = writeln!(out, "{}", self.test_line(run));
        }
        if !result.runs().is_empty() {
            out.push('\n');
        }

        if !result.failures().is_empty() {
            let _ = writeln!(out, "{}", self.paint("Failures:", Color::Red));
            for failure in result.failures() {
                let _ = writeln!(out, "  {}", failure);
            }
            out.push('\n');
        }

        let status = if result.was_successful() {
            self.paint("PASSED", Color::Green)
        } else {
            self.paint("FAILED", Color::Red)
        };

        let _ = writeln!(out, "{}", "─".repeat(50));
        let _ = writeln!(
            out,
            "{} {} | {} run, {} passed, {} failed, {} ignored",
            result.suite(),
            status,
            result.run_count(),
            result.pass_count(),
            result.failure_count(),
            result.ignore_count()
        );
        let _ = writeln!(out, "Time: {:.2?}", result.run_time());
        let _ = writeln!(out, "{}", result.was_successful());
        out
    }

    fn test_line(&self, run: &TestRun) -> String {
        let (label, color) = match run.outcome {
            TestOutcome::Pass { .. } => ("PASS", Color::Green),
            TestOutcome::Fail { .. } => ("FAIL", Color::Red),
            TestOutcome::Ignored => {
                return format!("{} {}", self.paint("IGNORED", Color::Yellow), run.name)
            }
        };
        format!(
            "{} {} ({:.2?})",
            self.paint(label, color),
            run.name,
            run.outcome.duration()
        )
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.no_color {
            text.to_string()
        } else {
            text.color(color).bold().to_string()
        }
    }
}

fn render_plain(result: &RunResult) -> String {
    let mut out = String::new();
    for failure in result.failures() {
        let _ = writeln!(out, "{}", failure);
    }
    let _ = writeln!(out, "{}", result.was_successful());
    out
}

fn render_json(result: &RunResult) -> String {
    let summary = serde_json::json!({
        "suite": result.suite(),
        "run_count": result.run_count(),
        "failure_count": result.failure_count(),
        "ignore_count": result.ignore_count(),
        "run_time_ms": result.run_time().as_millis() as u64,
        "failures": result.failures(),
        "successful": result.was_successful(),
    });
    format!("{}\n", summary)
}
