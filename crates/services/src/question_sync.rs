//! Background delivery of best-effort question patches.
//!
//! Patches go through a single worker so they reach the server in the order
//! they were queued. Failures are logged and dropped.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use quiz_core::model::QuizId;

use crate::api::{QuestionPatch, QuizApi};

enum SyncCommand {
    Patch {
        quiz_id: QuizId,
        index: usize,
        patch: QuestionPatch,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the patch worker. Dropping every handle stops the worker once its
/// queue is drained.
#[derive(Clone)]
pub struct QuestionSync {
    tx: mpsc::UnboundedSender<SyncCommand>,
}

impl QuestionSync {
    /// Spawn the worker on the current tokio runtime.
    #[must_use]
    pub fn spawn(api: Arc<dyn QuizApi>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(api, rx));
        Self { tx }
    }

    /// Queue a patch without waiting for delivery.
    pub fn send(&self, quiz_id: &QuizId, index: usize, patch: QuestionPatch) {
        let command = SyncCommand::Patch {
            quiz_id: quiz_id.clone(),
            index,
            patch,
        };
        if self.tx.send(command).is_err() {
            warn!("question sync worker is gone; dropping patch for question {index}");
        }
    }

    /// Wait until every patch queued so far has been attempted.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(SyncCommand::Flush(done)).is_err() {
            return;
        }
        let _ = wait.await;
    }
}

async fn run(api: Arc<dyn QuizApi>, mut rx: mpsc::UnboundedReceiver<SyncCommand>) {
    while let Some(command) = rx.recv().await {
        match command {
            SyncCommand::Patch {
                quiz_id,
                index,
                patch,
            } => {
                if let Err(err) = api.update_question(&quiz_id, index, &patch).await {
                    warn!("could not update question {index} of quiz {quiz_id}: {err}");
                }
            }
            SyncCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
