use std::sync::mpsc;

use anyhow::Context;
use pks_core::{update, AppState, AppViewModel, Msg};
use pks_engine::EngineConfig;

use crate::effects::EffectRunner;

/// Owns the state machine and its engine bridge for one CLI invocation.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl Session {
    pub fn new(config: EngineConfig) -> anyhow::Result<Self> {
        let (msg_tx, msg_rx) = mpsc::channel();
        let runner = EffectRunner::new(config, msg_tx)?;
        Ok(Self {
            state: AppState::new(),
            runner,
            msg_rx,
        })
    }

    /// Applies one message; returns the fresh view only when it changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        let was_dirty = self.state.consume_dirty();
        was_dirty.then(|| self.state.view())
    }

    /// Blocks for the next engine message and applies it.
    pub fn pump(&mut self) -> anyhow::Result<Option<AppViewModel>> {
        let msg = self
            .msg_rx
            .recv()
            .context("engine event channel closed")?;
        Ok(self.dispatch(msg))
    }

    /// Pumps messages until `done` accepts a view.
    pub fn wait_for(
        &mut self,
        done: impl Fn(&AppViewModel) -> bool,
    ) -> anyhow::Result<AppViewModel> {
        loop {
            if let Some(view) = self.pump()? {
                if done(&view) {
                    return Ok(view);
                }
            }
        }
    }
}
