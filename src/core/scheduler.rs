// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/gestureos

//! Timer tasks for the session ticks

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::debug;

/// Cancellable timer stored next to the state it drives.
///
/// Every arm or cancel bumps the generation. A tick carries the generation it
/// was armed with and must be dropped unless `is_current` still holds, so a
/// callback already in flight when `cancel` runs can never touch new state.
#[derive(Debug)]
pub struct TimerSlot {
    name: &'static str,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl TimerSlot {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            handle: None,
        }
    }

    /// Cancel any previous timer and return the generation for the next one
    pub fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation
    }

    pub fn attach(&mut self, handle: JoinHandle<()>) {
        self.handle = Some(handle);
        debug!("Timer '{}' armed (generation {})", self.name, self.generation);
    }

    /// Invalidate and abort. Returns whether a timer was running.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                debug!("Timer '{}' cancelled", self.name);
                true
            }
            None => false,
        }
    }

    /// Invalidate without aborting; used by a timer retiring itself
    pub fn disarm(&mut self) {
        self.generation += 1;
        self.handle = None;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && self.generation == generation
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

/// Call `tick` every `period`, starting one period from now, until it returns false
pub fn every<F>(runtime: &Handle, period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> bool + Send + 'static,
{
    runtime.spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !tick() {
                break;
            }
        }
    })
}

/// Call `tick` after `first`, then after whatever delay it returns, until it returns None
pub fn paced<F>(runtime: &Handle, first: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> Option<Duration> + Send + 'static,
{
    runtime.spawn(async move {
        let mut delay = first;
        loop {
            sleep(delay).await;
            match tick() {
                Some(next) => delay = next,
                None => break,
            }
        }
    })
}
