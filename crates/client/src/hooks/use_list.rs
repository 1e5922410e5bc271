//! A list resource bound to signals.
//!
//! `use_list` wraps `use_resource` with a refresh counter: the counter is read
//! inside the resource, so bumping it re-runs the fetch. Loading, error and
//! toast handling follow [`ListState`].

use std::future::Future;

use dioxus::prelude::*;
use spacedash_shared::ApiError;

use crate::resource::{run_mutation, ListState, Refetch};
use crate::stores::ToastNotifier;

pub struct ListHandle<T: 'static> {
    state: Signal<ListState<T>>,
    refresh: Signal<u64>,
}

impl<T: 'static> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ListHandle<T> {}

impl<T: 'static> PartialEq for ListHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state && self.refresh == other.refresh
    }
}

impl<T: Clone + 'static> ListHandle<T> {
    /// Current state (subscribes the caller).
    pub fn read(&self) -> ListState<T> {
        self.state.read().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.read().items.clone()
    }

    /// Re-run the fetch.
    pub fn refresh(&self) {
        let mut refresh = self.refresh;
        *refresh.write() += 1;
    }

    /// Run a mutation in the background: one toast, then one refetch on
    /// success when asked. Nothing is applied optimistically.
    pub fn mutate<R, F>(
        &self,
        mutation: F,
        success: impl Into<String>,
        what: impl Into<String>,
        refetch: Refetch,
    ) where
        R: 'static,
        F: Future<Output = Result<R, ApiError>> + 'static,
    {
        let handle = *self;
        let success = success.into();
        let what = what.into();
        spawn(async move {
            run_mutation(mutation, &success, &what, refetch, &ToastNotifier, || {
                handle.refresh()
            })
            .await;
        });
    }
}

/// See module docs. `what` completes "Failed to ..." in errors.
pub fn use_list<T, F>(what: &'static str, mut fetch: impl FnMut() -> F + 'static) -> ListHandle<T>
where
    T: Clone + 'static,
    F: Future<Output = Result<Vec<T>, ApiError>> + 'static,
{
    let state = use_signal(ListState::<T>::default);
    let refresh = use_signal(|| 0u64);

    use_resource(move || {
        let mut state = state;
        refresh.read();
        let request = fetch();
        async move {
            state.write().begin();
            let result = request.await;
            state.write().finish(result, what, &ToastNotifier);
        }
    });

    ListHandle { state, refresh }
}
