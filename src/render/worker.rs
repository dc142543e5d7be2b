// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Callnav-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Callnav and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Background rendering so a slow diagram never blocks input handling.

use std::io;
use std::thread::{self, JoinHandle};

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::{DiagramRenderer, RenderError, RenderedDiagram};
use crate::nav::{RenderRequest, RenderTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    pub ticket: RenderTicket,
    pub description: String,
}

impl From<RenderRequest> for RenderJob {
    fn from(request: RenderRequest) -> Self {
        Self { ticket: request.ticket, description: request.description }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed { ticket: RenderTicket, diagram: RenderedDiagram },
    Failed { ticket: RenderTicket, error: RenderError },
}

impl RenderOutcome {
    pub fn ticket(&self) -> &RenderTicket {
        match self {
            Self::Completed { ticket, .. } | Self::Failed { ticket, .. } => ticket,
        }
    }
}

/// Owns the render thread. Jobs are processed in submission order; results are polled.
#[derive(Debug)]
pub struct RenderWorker {
    jobs: Option<UnboundedSender<RenderJob>>,
    outcomes: UnboundedReceiver<RenderOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl RenderWorker {
    pub fn spawn<R>(renderer: R) -> io::Result<Self>
    where
        R: DiagramRenderer + Send + 'static,
    {
        let (jobs_tx, mut jobs_rx) = mpsc::unbounded_channel::<RenderJob>();
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();

        let thread = thread::Builder::new().name("callnav-render".to_owned()).spawn(move || {
            while let Some(job) = jobs_rx.blocking_recv() {
                let outcome = match renderer.render(&job.description) {
                    Ok(diagram) => RenderOutcome::Completed { ticket: job.ticket, diagram },
                    Err(error) => RenderOutcome::Failed { ticket: job.ticket, error },
                };
                tracing::debug!(
                    key = %outcome.ticket().key(),
                    seq = outcome.ticket().seq(),
                    ok = matches!(outcome, RenderOutcome::Completed { .. }),
                    "render job finished"
                );
                if outcomes_tx.send(outcome).is_err() {
                    break;
                }
            }
        })?;

        Ok(Self { jobs: Some(jobs_tx), outcomes: outcomes_rx, thread: Some(thread) })
    }

    pub fn submit(&self, job: impl Into<RenderJob>) -> Result<(), RenderError> {
        let sender = self.jobs.as_ref().ok_or(RenderError::WorkerUnavailable)?;
        sender.send(job.into()).map_err(|_| RenderError::WorkerUnavailable)
    }

    /// Next finished job, if any, without blocking.
    pub fn try_next(&mut self) -> Option<RenderOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until a job finishes; `None` once the worker has stopped.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait_next(&mut self) -> Option<RenderOutcome> {
        self.outcomes.blocking_recv()
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
