use std::future::Future;

/// Applies `local` to `state` right away, then awaits `remote`.
///
/// When `remote` fails, `state` is restored to a snapshot taken before `local`
/// ran and the error is handed back. On success the optimistic state is kept
/// and the remote value is returned for the caller to reconcile.
pub async fn apply_optimistically<S, T, E, L, R>(state: &mut S, local: L, remote: R) -> Result<T, E>
where
    S: Clone,
    L: FnOnce(&mut S),
    R: Future<Output = Result<T, E>>,
{
    let snapshot = state.clone();
    local(state);
    match remote.await {
        Ok(value) => Ok(value),
        Err(err) => {
            *state = snapshot;
            Err(err)
        }
    }
}
