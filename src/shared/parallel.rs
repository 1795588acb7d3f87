use futures::future::try_join_all;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Runs `task` over every item with at most `concurrency` tasks in flight.
///
/// Each worker claims the next unclaimed index until the input is exhausted,
/// so a slow item never holds back the rest of the pool. Results come back in
/// input order regardless of completion order.
///
/// The first task error fails the whole batch. Callers that want per-item
/// isolation must catch inside `task` and return a default.
pub async fn parallel_map<'a, T, R, E, F, Fut>(
    items: &'a [T],
    concurrency: usize,
    task: F,
) -> Result<Vec<R>, E>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let next_index = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<R>>> = Mutex::new((0..items.len()).map(|_| None).collect());

    let workers = concurrency.max(1).min(items.len().max(1));
    let (next_index, slots_ref, task) = (&next_index, &slots, &task);

    try_join_all((0..workers).map(|_| async move {
        loop {
            let index = next_index.fetch_add(1, Ordering::Relaxed);
            let Some(item) = items.get(index) else {
                return Ok::<(), E>(());
            };
            let result = task(item).await?;
            slots_ref.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(result);
        }
    }))
    .await?;

    Ok(slots
        .into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .into_iter()
        .flatten()
        .collect())
}
