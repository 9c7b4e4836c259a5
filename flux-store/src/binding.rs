//! View bindings: keep derived view state in sync with stores
//!
//! A view implements `FluxComponent` to declare the stores it reads and how
//! to derive its state from them. `ComponentBinding::mount` subscribes to
//! those stores; every changed notification recomputes the derived state and
//! merges it into the displayed state. Unmounting (or dropping the binding)
//! removes every subscription, so an unmounted view never sees further
//! changes even if a fetch it started completes later.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use flux_store::prelude::*;
//! use flux_store::{ComponentBinding, FluxComponent};
//!
//! struct Teams;
//! impl StoreDefinition for Teams {
//!     const KEY: &'static str = "TeamStore";
//!     type Item = Vec<String>;
//! }
//!
//! #[derive(Clone, Default)]
//! struct PickerState {
//!     teams: Option<Vec<String>>,
//!     loading: bool,
//! }
//!
//! struct TeamPicker {
//!     project: String,
//!     store: Arc<KeyedStore<Teams>>,
//! }
//!
//! impl FluxComponent for TeamPicker {
//!     type State = PickerState;
//!
//!     fn stores(&self) -> Vec<Arc<dyn ChangeNotifier>> {
//!         vec![self.store.clone() as Arc<dyn ChangeNotifier>]
//!     }
//!
//!     fn initial_state(&self) -> PickerState {
//!         PickerState { teams: None, loading: true }
//!     }
//!
//!     fn state_from_stores(&self, state: &mut PickerState) {
//!         state.teams = self.store.get_item(&self.project);
//!         state.loading = !self.store.is_loaded(Some(self.project.as_str()));
//!     }
//! }
//!
//! let store = Arc::new(KeyedStore::<Teams>::new(Arc::new(KeyedActions::new())));
//! let picker = Arc::new(TeamPicker { project: "Fabrikam".into(), store: store.clone() });
//! let binding = ComponentBinding::mount(picker);
//! assert!(binding.state().loading);
//!
//! store.actions().loaded("fabrikam", Some(vec!["Web".into()]));
//! assert_eq!(binding.state().teams, Some(vec!["Web".to_string()]));
//! assert!(!binding.state().loading);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::observable::SubscriptionId;
use crate::store::ChangeNotifier;

/// A view whose state is derived from one or more stores
pub trait FluxComponent: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;

    /// Stores this view subscribes to while mounted
    fn stores(&self) -> Vec<Arc<dyn ChangeNotifier>>;

    /// State before any store has been read (explicit loading flags etc.)
    fn initial_state(&self) -> Self::State;

    /// Recompute the store-derived part of the state and merge it in
    fn state_from_stores(&self, state: &mut Self::State);
}

type RenderCallback<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// A mounted `FluxComponent`
pub struct ComponentBinding<C: FluxComponent> {
    component: Arc<C>,
    state: Arc<RwLock<C::State>>,
    renders: Arc<AtomicUsize>,
    subscriptions: Vec<(Arc<dyn ChangeNotifier>, SubscriptionId)>,
}

impl<C: FluxComponent> ComponentBinding<C> {
    /// Subscribe `component` to its stores and compute its initial state
    pub fn mount(component: Arc<C>) -> Self {
        Self::mount_inner(component, None)
    }

    /// Like `mount`, calling `on_render` with the new state after every change
    pub fn mount_with_render<F>(component: Arc<C>, on_render: F) -> Self
    where
        F: Fn(&C::State) + Send + Sync + 'static,
    {
        Self::mount_inner(component, Some(Arc::new(on_render)))
    }

    fn mount_inner(component: Arc<C>, on_render: Option<RenderCallback<C::State>>) -> Self {
        let mut initial = component.initial_state();
        component.state_from_stores(&mut initial);

        let state = Arc::new(RwLock::new(initial));
        let renders = Arc::new(AtomicUsize::new(0));

        let subscriptions = component
            .stores()
            .into_iter()
            .map(|store| {
                let component = Arc::downgrade(&component);
                let state = Arc::downgrade(&state);
                let renders = Arc::clone(&renders);
                let on_render = on_render.clone();
                let store_key = store.store_key();

                let id = store.subscribe_changed(Box::new(move || {
                    let (Some(component), Some(state)) = (component.upgrade(), state.upgrade())
                    else {
                        return;
                    };

                    let snapshot = {
                        let mut state = state.write();
                        component.state_from_stores(&mut state);
                        state.clone()
                    };
                    renders.fetch_add(1, Ordering::SeqCst);
                    trace!(store = store_key, "Component state recomputed");

                    if let Some(on_render) = &on_render {
                        on_render(&snapshot);
                    }
                }));
                (store, id)
            })
            .collect();

        Self {
            component,
            state,
            renders,
            subscriptions,
        }
    }

    /// Current displayed state
    pub fn state(&self) -> C::State {
        self.state.read().clone()
    }

    /// Apply a view-local change (e.g. a selection) to the displayed state
    pub fn update_state<F: FnOnce(&mut C::State)>(&self, update: F) {
        update(&mut self.state.write());
    }

    pub fn component(&self) -> &Arc<C> {
        &self.component
    }

    /// Number of store-driven recomputations since mount
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Unsubscribe from every store, returning the last displayed state
    pub fn unmount(mut self) -> C::State {
        self.release();
        self.state()
    }

    fn release(&mut self) {
        for (store, id) in self.subscriptions.drain(..) {
            store.unsubscribe_changed(id);
        }
    }
}

impl<C: FluxComponent> Drop for ComponentBinding<C> {
    fn drop(&mut self) {
        self.release();
    }
}
