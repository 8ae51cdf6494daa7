//! Parallel page normalization with in-order delivery.
//!
//! Pages are started in page order, each one holding a credit from a fixed
//! pool of `window` credits, and normalized on the rayon pool. Finished pages
//! are sent over a bounded channel to a single ordering stage that buffers
//! out-of-order arrivals and hands pages to the sink strictly in the order
//! they were given. A credit returns to the pool only once its page has been
//! delivered, so at most `window` pages are ever running or buffered. Output
//! is identical to the sequential [`ContentStream`](super::ContentStream).

use std::collections::BTreeMap;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use super::{ContentNormalizer, PageOutcome};
use crate::error::{Error, Result};
use crate::source::{DocumentSource, PageHandle};

/// Configuration for parallel normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Worker threads (None = rayon's global pool)
    pub threads: Option<usize>,

    /// Pages that may be in flight or awaiting delivery at once
    pub window: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threads: None,
            window: 64,
        }
    }
}

/// Normalize `pages` in parallel and feed outcomes to `sink` in order.
///
/// No page is started while `config.window` earlier pages are still
/// undelivered. If `sink` fails, no further pages are started and the error
/// is returned.
pub fn for_each_page_ordered<S, F>(
    source: &S,
    normalizer: &ContentNormalizer,
    pages: &[PageHandle],
    config: ParallelConfig,
    mut sink: F,
) -> Result<()>
where
    S: DocumentSource + Sync + ?Sized,
    F: FnMut(PageOutcome) -> Result<()>,
{
    let pool = match config.threads {
        Some(threads) => Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| Error::Other(format!("Failed to build thread pool: {}", e)))?,
        ),
        None => None,
    };
    let window = config.window.clamp(1, pages.len().max(1));

    thread::scope(|scope| {
        let (tx, rx) = bounded::<(usize, PageOutcome)>(window);
        let (credit_tx, credit_rx) = bounded::<()>(window);
        for _ in 0..window {
            credit_tx
                .send(())
                .map_err(|_| Error::Other("credit pool closed".to_string()))?;
        }
        let pool = pool.as_ref();

        // Dispatch blocks on credits, so it must stay off the pool's workers.
        let workers = scope.spawn(move || match pool {
            Some(pool) => pool.in_place_scope(|s| {
                dispatch(s, source, normalizer, pages, &credit_rx, tx);
            }),
            None => rayon::in_place_scope(|s| {
                dispatch(s, source, normalizer, pages, &credit_rx, tx);
            }),
        });

        let mut pending: BTreeMap<usize, PageOutcome> = BTreeMap::new();
        let mut next = 0;
        let mut result = Ok(());

        'recv: for (idx, outcome) in rx.iter() {
            pending.insert(idx, outcome);
            while let Some(outcome) = pending.remove(&next) {
                next += 1;
                if let Err(e) = sink(outcome) {
                    result = Err(e);
                    break 'recv;
                }
                // Never blocks: outstanding credits never exceed the capacity.
                let _ = credit_tx.send(());
            }
        }

        // Stops dispatch once its remaining credits run out and unblocks
        // any worker still waiting to send.
        drop(credit_tx);
        drop(rx);

        if workers.join().is_err() {
            return Err(Error::Other("page worker panicked".to_string()));
        }
        if result.is_ok() && next != pages.len() {
            return Err(Error::Other(format!(
                "ordering stage delivered {} of {} pages",
                next,
                pages.len()
            )));
        }
        result
    })
}

/// Start pages in order, one credit each, on the rayon scope.
fn dispatch<'scope, S>(
    scope: &rayon::Scope<'scope>,
    source: &'scope S,
    normalizer: &'scope ContentNormalizer,
    pages: &'scope [PageHandle],
    credits: &Receiver<()>,
    tx: Sender<(usize, PageOutcome)>,
) where
    S: DocumentSource + Sync + ?Sized,
{
    for (idx, handle) in pages.iter().enumerate() {
        if credits.recv().is_err() {
            break;
        }
        let tx = tx.clone();
        scope.spawn(move |_| {
            // A closed channel means the sink failed; the outcome is discarded.
            let _ = tx.send((idx, normalizer.process_page(source, handle)));
        });
    }
}
