// service/pager.rs
//
// Cursor-based forward pagination over an ordered remote collection. The
// fetch closure receives the last seen cursor and a page size, and returns
// the next batch in ascending cursor order.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;

/// One fetched page. `has_more` is `returned == page_size` — an
/// approximation, not a guarantee: a page that exactly fills the limit can
/// still be the last one. The design accepts that rather than issuing a
/// lookahead query per page.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CursorPage<T, C> {
    pub items: Vec<T>,
    pub next_cursor: Option<C>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// A fetch was already in flight; this call did nothing.
    AlreadyLoading,
    /// The previous page came back short, so the end has been reached.
    Exhausted,
}

pub struct CursorPager<T, C> {
    page_size: i64,
    cursor: Mutex<Option<C>>,
    exhausted: AtomicBool,
    in_flight: AtomicBool,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, C: Clone> CursorPager<T, C> {
    pub fn new(page_size: i64) -> Self {
        Self {
            page_size,
            cursor: Mutex::new(None),
            exhausted: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
            _marker: std::marker::PhantomData,
        }
    }

    /// Loads the next page via `fetch`. Concurrent calls while a fetch is in
    /// flight are no-ops, which prevents duplicate appends when a caller
    /// double-fires.
    pub async fn load_more<F, Fut, E>(
        &self,
        extract_cursor: impl Fn(&T) -> C,
        fetch: F,
        sink: &mut Vec<T>,
    ) -> Result<LoadOutcome, E>
    where
        F: FnOnce(Option<C>, i64) -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if self.exhausted.load(Ordering::Acquire) {
            return Ok(LoadOutcome::Exhausted);
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(LoadOutcome::AlreadyLoading);
        }

        let cursor = self.cursor.lock().unwrap().clone();
        let result = fetch(cursor, self.page_size).await;

        let outcome = match &result {
            Ok(items) => {
                if let Some(last) = items.last() {
                    *self.cursor.lock().unwrap() = Some(extract_cursor(last));
                }
                if (items.len() as i64) < self.page_size {
                    self.exhausted.store(true, Ordering::Release);
                }
                Ok(LoadOutcome::Loaded(items.len()))
            }
            Err(_) => Ok(LoadOutcome::Loaded(0)),
        };

        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(mut items) => {
                sink.append(&mut items);
                outcome
            }
            Err(e) => Err(e),
        }
    }

    /// Resets the cursor to the start of the collection.
    pub fn refresh(&self) {
        *self.cursor.lock().unwrap() = None;
        self.exhausted.store(false, Ordering::Release);
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }
}

/// Builds the page envelope handlers return for one keyset batch.
pub fn page_envelope<T, C>(
    items: Vec<T>,
    page_size: i64,
    extract_cursor: impl Fn(&T) -> C,
) -> CursorPage<T, C> {
    let has_more = items.len() as i64 == page_size;
    let next_cursor = items.last().map(&extract_cursor);
    CursorPage {
        items,
        next_cursor,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    async fn fetch_range(
        cursor: Option<i64>,
        limit: i64,
        total: i64,
    ) -> Result<Vec<i64>, sqlx::Error> {
        let start = cursor.map(|c| c + 1).unwrap_or(0);
        Ok((start..total.min(start + limit)).collect())
    }

    #[tokio::test]
    async fn walks_the_collection_in_order_without_duplicates() {
        let pager: CursorPager<i64, i64> = CursorPager::new(4);
        let mut all = Vec::new();

        loop {
            let outcome = pager
                .load_more(|v| *v, |cursor, limit| fetch_range(cursor, limit, 10), &mut all)
                .await
                .unwrap();
            if matches!(outcome, LoadOutcome::Exhausted | LoadOutcome::Loaded(0)) {
                break;
            }
            if let LoadOutcome::Loaded(n) = outcome {
                if (n as i64) < pager.page_size() {
                    break;
                }
            }
        }

        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn exact_fill_reports_has_more_even_at_the_end() {
        // 8 items, page size 4: the second page fills exactly, so the
        // envelope's has_more is an over-approximation by design.
        let items = fetch_range(Some(3), 4, 8).await.unwrap();
        let page = page_envelope(items, 4, |v| *v);
        assert_eq!(page.items.len(), 4);
        assert!(page.has_more);

        let items = fetch_range(Some(7), 4, 8).await.unwrap();
        let page = page_envelope(items, 4, |v| *v);
        assert!(page.items.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn concurrent_load_more_is_a_no_op_while_in_flight() {
        let pager: Arc<CursorPager<i64, i64>> = Arc::new(CursorPager::new(4));
        let fetches = Arc::new(AtomicUsize::new(0));

        // First call parks inside fetch until we let it finish; second call
        // must bounce off the in-flight guard without fetching.
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let pager_a = pager.clone();
        let fetches_a = fetches.clone();
        let slow = tokio::spawn(async move {
            let mut sink = Vec::new();
            let outcome = pager_a
                .load_more(
                    |v| *v,
                    |cursor, limit| {
                        let fetches = fetches_a.clone();
                        async move {
                            fetches.fetch_add(1, Ordering::SeqCst);
                            let _ = rx.await;
                            fetch_range(cursor, limit, 10).await
                        }
                    },
                    &mut sink,
                )
                .await
                .unwrap();
            (outcome, sink)
        });

        // Give the slow fetch time to take the guard.
        tokio::task::yield_now().await;
        while fetches.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let mut sink = Vec::new();
        let second = pager
            .load_more(
                |v| *v,
                |cursor, limit| {
                    let fetches = fetches.clone();
                    async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        fetch_range(cursor, limit, 10).await
                    }
                },
                &mut sink,
            )
            .await
            .unwrap();

        assert_eq!(second, LoadOutcome::AlreadyLoading);
        assert!(sink.is_empty());

        tx.send(()).unwrap();
        let (outcome, loaded) = slow.await.unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded(4));
        assert_eq!(loaded, vec![0, 1, 2, 3]);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_resets_to_the_start() {
        let pager: CursorPager<i64, i64> = CursorPager::new(4);
        let mut sink = Vec::new();

        pager
            .load_more(|v| *v, |c, l| fetch_range(c, l, 10), &mut sink)
            .await
            .unwrap();
        assert_eq!(sink, vec![0, 1, 2, 3]);

        pager.refresh();
        let mut fresh = Vec::new();
        pager
            .load_more(|v| *v, |c, l| fetch_range(c, l, 10), &mut fresh)
            .await
            .unwrap();
        assert_eq!(fresh, vec![0, 1, 2, 3]);
    }
}
