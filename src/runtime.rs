use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::actions::Action;
use crate::api::CatalogClient;
use crate::effects::{Dispatcher, Effects, StateHandle};
use crate::error::CatalogError;
use crate::save::FileSaveSink;
use crate::state::AppState;

enum Message {
    Action(Action),
    Finished {
        kind: &'static str,
        result: Result<(), CatalogError>,
    },
}

/// Single-consumer action loop. Reducers run on the caller's thread in
/// arrival order; effect handlers run on worker threads and feed their
/// actions back through a channel.
pub struct Store<C: CatalogClient + 'static, S: FileSaveSink + 'static> {
    state: StateHandle,
    effects: Arc<Effects<C, S>>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    pending: usize,
    failures: Vec<CatalogError>,
}

impl<C: CatalogClient + 'static, S: FileSaveSink + 'static> Store<C, S> {
    pub fn new(initial: AppState, client: C, saver: S) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: StateHandle::new(initial),
            effects: Arc::new(Effects::new(client, saver)),
            tx,
            rx,
            pending: 0,
            failures: Vec::new(),
        }
    }

    pub fn state(&self) -> AppState {
        self.state.snapshot()
    }

    pub fn pending_effects(&self) -> usize {
        self.pending
    }

    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = action.kind(), "dispatch");
        self.state.update(|state| state.reduce(&action));
        if let Action::ShowNotification { notification } = &action {
            tracing::warn!(title = %notification.title, message = %notification.message, "notification");
        }
        if Effects::<C, S>::handles(&action) {
            self.spawn_effect(action);
        }
    }

    fn spawn_effect(&mut self, action: Action) {
        let effects = Arc::clone(&self.effects);
        let state = self.state.clone();
        let tx = self.tx.clone();
        let out_tx = self.tx.clone();
        let out = Dispatcher::new(move |action| {
            if out_tx.send(Message::Action(action)).is_err() {
                tracing::debug!("store dropped, discarding effect output");
            }
        });
        self.pending += 1;
        thread::spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                effects.run(&action, &state, &out)
            }))
            .unwrap_or_else(|_| Err(CatalogError::EffectPanicked(action.kind().to_string())));
            let _ = tx.send(Message::Finished {
                kind: action.kind(),
                result,
            });
        });
    }

    /// Processes emitted actions until no effect is in flight. Configuration
    /// errors raised by handlers are returned here; the first one wins.
    pub fn run_until_idle(&mut self) -> Result<(), CatalogError> {
        while self.pending > 0 {
            let Ok(message) = self.rx.recv() else {
                break;
            };
            match message {
                Message::Action(action) => self.dispatch(action),
                Message::Finished { kind, result } => {
                    self.pending -= 1;
                    if let Err(err) = result {
                        tracing::error!(action = kind, error = %err, "effect failed");
                        self.failures.push(err);
                    }
                }
            }
        }
        match self.failures.drain(..).next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn dispatch_and_wait(&mut self, action: Action) -> Result<AppState, CatalogError> {
        self.dispatch(action);
        self.run_until_idle()?;
        Ok(self.state())
    }
}
