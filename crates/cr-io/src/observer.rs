//! `HeatMapObserver`: bridges `SimObserver` to a [`HeatMapWriter`].

use cr_core::Round;
use cr_grid::Grid;
use cr_sim::{RoundSummary, SimObserver};
use tracing::info;

use crate::{HeatMapWriter, IoError, IoResult};

/// A [`SimObserver`] that dumps the crime heat map after every
/// `dump_frequency`-th round (counting from round 0) and once more when the
/// run ends.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct HeatMapObserver {
    writer:     HeatMapWriter,
    every:      u64,
    last_error: Option<IoError>,
}

impl HeatMapObserver {
    /// `every == 0` disables the periodic dumps; the final one still happens.
    pub fn new(writer: HeatMapWriter, every: u64) -> Self {
        Self { writer, every, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<IoError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> HeatMapWriter {
        self.writer
    }

    fn store_err(&mut self, result: IoResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl SimObserver for HeatMapObserver {
    fn on_round_end(&mut self, summary: &RoundSummary, grid: &Grid) {
        if summary.round.is_multiple_of(self.every) {
            let result = self.writer.write(grid, summary.round.next()).map(drop);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, rounds: Round, grid: &Grid) {
        let result = self.writer.write(grid, rounds).map(drop);
        self.store_err(result);
        info!(dumps = self.writer.written().len(), "heat maps written");
    }
}
