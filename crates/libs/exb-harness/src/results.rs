//! Aggregated test results.

use std::io::{self, Write};

use crate::test_case::TestCase;

/// Final state of one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Success,
    /// Holds the build tool's status message.
    Failure(String),
    /// The target cannot be built with the IDE's toolchain.
    Unsupported,
}

/// Test descriptors grouped by outcome, in the order they were recorded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultSets {
    pub successes: Vec<String>,
    pub failures: Vec<String>,
    pub skips: Vec<String>,
}

impl ResultSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, test_case: &TestCase, outcome: &BuildOutcome) {
        let descriptor = test_case.descriptor();
        match outcome {
            BuildOutcome::Success => self.successes.push(descriptor),
            BuildOutcome::Failure(_) => self.failures.push(descriptor),
            BuildOutcome::Unsupported => self.skips.push(descriptor),
        }
    }

    /// Number of recorded test cases.
    pub fn total(&self) -> usize {
        self.successes.len() + self.failures.len() + self.skips.len()
    }

    /// Process exit status: the number of failures, saturated at 255.
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.failures.len()).unwrap_or(u8::MAX)
    }

    /// Print the non-empty result sections.
    pub fn print(&self, mut output: impl Write) -> io::Result<()> {
        for (title, items) in [
            ("Successful", &self.successes),
            ("Failed", &self.failures),
            ("Skipped", &self.skips),
        ] {
            if items.is_empty() {
                continue;
            }
            writeln!(output, "{title}:")?;
            for item in items {
                writeln!(output, "  * {item}")?;
            }
        }
        output.flush()
    }
}
