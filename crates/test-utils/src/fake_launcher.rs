use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use dagrun::dag::ScheduledNode;
use dagrun::engine::{NodeOutcome, RunEvent};
use dagrun::errors::Result;
use dagrun::exec::NodeLauncher;

/// A fake launcher that:
/// - records which nodes were dispatched
/// - immediately reports `NodeCompleted` for each of them, with `Failed` for
///   nodes in the configured failing set and `Success` otherwise.
pub struct FakeLauncher {
    events: mpsc::Sender<RunEvent>,
    launched: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl FakeLauncher {
    pub fn new(events: mpsc::Sender<RunEvent>, launched: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            events,
            launched,
            failing: HashSet::new(),
        }
    }

    /// Mark a node as failing when dispatched.
    pub fn with_failing(mut self, node: &str) -> Self {
        self.failing.insert(node.to_string());
        self
    }
}

impl NodeLauncher for FakeLauncher {
    fn launch_ready_nodes(
        &mut self,
        nodes: Vec<ScheduledNode>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let events = self.events.clone();
        let launched = Arc::clone(&self.launched);
        let failing = self.failing.clone();

        Box::pin(async move {
            for node in nodes {
                {
                    let mut guard = launched.lock().unwrap();
                    guard.push(node.name.clone());
                }

                let outcome = if failing.contains(&node.name) {
                    NodeOutcome::Failed
                } else {
                    NodeOutcome::Success
                };

                events
                    .send(RunEvent::NodeCompleted {
                        node: node.name.clone(),
                        outcome,
                    })
                    .await
                    .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
