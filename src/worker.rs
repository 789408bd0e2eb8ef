use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use tracing::debug;

use crate::protocol::{Completion, Pending};
use crate::remote::{RemoteSource, execute};

/// Runs requests off the UI thread and hands their completions back.
///
/// Every dispatched request gets its own thread; completions queue up on a
/// channel that the event loop drains with [`Worker::poll`], so all state
/// mutation stays on the UI thread.
pub struct Worker {
    remote: Arc<dyn RemoteSource>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl Worker {
    pub fn new(remote: Arc<dyn RemoteSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            remote,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, pending: Pending) {
        let remote = Arc::clone(&self.remote);
        let tx = self.tx.clone();
        self.in_flight += 1;
        debug!(path = %pending.request.path(), generation = pending.generation, "Dispatching");

        std::thread::spawn(move || {
            let completion = match execute(remote.as_ref(), &pending.request) {
                Ok(response) => Completion::ok(&pending, response),
                Err(err) => Completion::failed(&pending, err),
            };
            let _ = tx.send(completion);
        });
    }

    pub fn dispatch_all(&mut self, pending: impl IntoIterator<Item = Pending>) {
        for p in pending {
            self.dispatch(p);
        }
    }

    /// Completions that have arrived since the last call, without blocking.
    pub fn poll(&mut self) -> Vec<Completion> {
        let completions: Vec<Completion> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(completions.len());
        completions
    }

    /// Block until at least one completion arrives or `timeout` passes.
    pub fn wait(&mut self, timeout: std::time::Duration) -> Vec<Completion> {
        let mut completions = Vec::new();
        if let Ok(first) = self.rx.recv_timeout(timeout) {
            completions.push(first);
            completions.extend(self.rx.try_iter());
        }
        self.in_flight = self.in_flight.saturating_sub(completions.len());
        completions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FetchError, Method, Request, Response};
    use crate::remote::Body;
    use std::time::{Duration, Instant};

    struct CountingRemote;

    impl RemoteSource for CountingRemote {
        fn send(&self, _method: Method, path: &str, _body: Body<'_>) -> Result<String, FetchError> {
            match path {
                "/dynamic/stat/num-pages" => Ok("12".to_string()),
                _ => Err(FetchError::Status {
                    path: path.to_string(),
                    status: 404,
                }),
            }
        }

        fn url(&self, path: &str) -> String {
            path.to_string()
        }
    }

    fn collect(worker: &mut Worker, expected: usize) -> Vec<Completion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut completions = Vec::new();
        while completions.len() < expected && Instant::now() < deadline {
            completions.extend(worker.wait(Duration::from_millis(100)));
        }
        completions
    }

    #[test]
    fn completions_come_back_with_their_generation() {
        let mut worker = Worker::new(Arc::new(CountingRemote));
        worker.dispatch_all([
            Pending {
                generation: 4,
                request: Request::NumPages,
            },
            Pending {
                generation: 7,
                request: Request::PageNav,
            },
        ]);
        assert_eq!(worker.in_flight(), 2);

        let mut completions = collect(&mut worker, 2);
        completions.sort_by_key(|c| c.generation);

        assert_eq!(completions.len(), 2);
        assert_eq!(worker.in_flight(), 0);
        assert_eq!(completions[0].result, Ok(Response::Count(12)));
        assert!(matches!(
            completions[1].result,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert!(worker.poll().is_empty());
    }
}
