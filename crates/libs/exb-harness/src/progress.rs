//! Console progress shared by export workers and the build loop.

use std::{
    fmt,
    io::{self, Write},
    sync::{Mutex, MutexGuard, PoisonError},
};

struct ProgressState {
    counter: usize,
    total: usize,
    output: Box<dyn Write + Send>,
}

/// Counts processed items and prints one `N/Total message` line per item.
///
/// Incrementing the counter and printing the line happen under one lock, so
/// concurrent workers never print interleaved or duplicated numbers.
pub struct Progress {
    state: Mutex<ProgressState>,
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("Progress")
            .field("counter", &state.counter)
            .field("total", &state.total)
            .finish_non_exhaustive()
    }
}

impl Progress {
    pub fn new(output: impl Write + Send + 'static) -> Self {
        Self {
            state: Mutex::new(ProgressState {
                counter: 0,
                total: 0,
                output: Box::new(output),
            }),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Discards everything.
    pub fn sink() -> Self {
        Self::new(io::sink())
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new phase of `total` items.
    pub fn reset(&self, total: usize) {
        let mut state = self.lock();
        state.counter = 0;
        state.total = total;
    }

    /// Count one item and print its progress line. Returns the item's number.
    pub fn advance(&self, message: impl fmt::Display) -> usize {
        let mut state = self.lock();
        state.counter += 1;
        let (counter, total) = (state.counter, state.total);
        // Console output is best effort
        let _ = writeln!(state.output, "{counter}/{total} {message}");
        let _ = state.output.flush();
        counter
    }

    /// Print `text` as is, without counting.
    pub fn print(&self, text: impl fmt::Display) {
        let mut state = self.lock();
        let _ = writeln!(state.output, "{text}");
        let _ = state.output.flush();
    }

    pub fn counter(&self) -> usize {
        self.lock().counter
    }

    pub fn total(&self) -> usize {
        self.lock().total
    }
}
