//! Latest-request-wins state holder for a presentation layer.
//!
//! Each [`Session::submit`] starts a new generation. Results and transitions
//! from older generations are dropped, so a slow superseded request can never
//! overwrite the state of a newer one.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;
use tracing::debug;

use crate::{
    error::PipelineError,
    model::{Location, ViewModel},
    pipeline::{Pipeline, PipelineState},
};

/// What became of a submitted request.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// The request was still the latest when it finished.
    Completed(Result<Arc<ViewModel>, PipelineError>),
    /// A newer request was submitted first; this result was discarded.
    Superseded,
}

#[derive(Debug)]
pub struct Session {
    pipeline: Pipeline,
    generation: AtomicU64,
    state: watch::Sender<PipelineState>,
}

impl Session {
    pub fn new(pipeline: Pipeline) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            pipeline,
            generation: AtomicU64::new(0),
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PipelineState {
        self.state.borrow().clone()
    }

    pub async fn submit(&self, location: Location) -> Submission {
        let mut ticket = self.begin();
        let generation = ticket.generation;

        let result = self
            .pipeline
            .run_observed(location, |s| {
                self.publish(generation, s.clone());
            })
            .await;
        ticket.finished = true;

        if self.generation.load(Ordering::SeqCst) == generation {
            Submission::Completed(result)
        } else {
            debug!(generation, "discarding superseded result");
            Submission::Superseded
        }
    }

    fn begin(&self) -> Ticket<'_> {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = PipelineState::Idle;
        });
        debug!(generation, "request started");

        Ticket {
            session: self,
            generation,
            finished: false,
        }
    }

    /// Replace the state if `generation` is still the latest request.
    fn publish(&self, generation: u64, next: PipelineState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }
}

/// Resets the state to `Idle` if a request is dropped before it finishes.
struct Ticket<'a> {
    session: &'a Session,
    generation: u64,
    finished: bool,
}

impl Drop for Ticket<'_> {
    fn drop(&mut self) {
        if !self.finished && self.session.publish(self.generation, PipelineState::Idle) {
            debug!(generation = self.generation, "request cancelled");
        }
    }
}
