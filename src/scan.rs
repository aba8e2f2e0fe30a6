use std::time::Instant;

use tracing::{info, warn};

use crate::core::model::{ExtractedDate, PageOutcome};
use crate::error::ExtractError;

/// State of the sequential page scan. `Found`, `Blank` and `Exhausted` are
/// terminal; `Blank` deliberately stops the scan even though a later page
/// might carry a date, because the first context match is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanState {
    Scanning(usize),
    Found(ExtractedDate),
    Blank,
    Exhausted,
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ScanState::Scanning(_))
    }

    /// Applies one page outcome. Terminal states absorb further input.
    pub fn on_page_outcome(self, outcome: PageOutcome) -> ScanState {
        match (self, outcome) {
            (ScanState::Scanning(_), PageOutcome::Found(date)) => ScanState::Found(date),
            (ScanState::Scanning(_), PageOutcome::Blank) => ScanState::Blank,
            (ScanState::Scanning(page), PageOutcome::NotFound) => ScanState::Scanning(page + 1),
            (state, _) => state,
        }
    }
}

/// Walks pages in order, stopping at the first page that resolves the
/// document: a concrete date, or a located context whose field is blank.
#[derive(Debug, Clone)]
pub struct PageScanner {
    max_pages: usize,
}

impl PageScanner {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Runs the scan over `min(max_pages, page_count)` pages. A failing
    /// page read or recognition is logged and treated as "no date on this
    /// page"; the scan continues with the next page.
    pub fn scan<F>(&self, page_count: usize, mut read_page: F) -> ScanState
    where
        F: FnMut(usize) -> Result<PageOutcome, ExtractError>,
    {
        let budget = self.max_pages.min(page_count);
        let mut state = ScanState::Scanning(0);
        loop {
            let page = match state {
                ScanState::Scanning(page) => page,
                _ => return state,
            };
            if page >= budget {
                return ScanState::Exhausted;
            }

            let started = Instant::now();
            let outcome = read_page(page).unwrap_or_else(|err| {
                warn!(page = page + 1, error = %err, "page evaluation failed, continuing");
                PageOutcome::NotFound
            });
            let elapsed = started.elapsed().as_secs_f32();
            match &outcome {
                PageOutcome::Found(date) => {
                    info!(page = page + 1, %date, elapsed_s = elapsed, "found date")
                }
                PageOutcome::Blank => {
                    info!(page = page + 1, elapsed_s = elapsed, "date field is blank")
                }
                PageOutcome::NotFound => {
                    info!(page = page + 1, elapsed_s = elapsed, "no date on page")
                }
            }

            state = state.on_page_outcome(outcome);
        }
    }
}
