use futures::future::{AbortHandle, Abortable, Aborted};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, PartialEq)]
pub enum TaskError {
    Cancelled,
    TimedOut,
}

impl std::fmt::Display for TaskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskError::Cancelled => write!(f, "Operation was cancelled"),
            TaskError::TimedOut => write!(f, "Operation timed out"),
        }
    }
}

impl std::error::Error for TaskError {}

/// A fixed-delay stand-in for a remote call (sending a code, charging a
/// card). It can be aborted through the returned handle and gives up once
/// `timeout` elapses.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedTask {
    pub delay: Duration,
    pub timeout: Duration,
}

impl SimulatedTask {
    pub fn new(delay: Duration, timeout: Duration) -> Self {
        Self { delay, timeout }
    }

    /// Returns the abort handle and a future that waits out the delay and
    /// then runs `finish`. `finish` never runs for a cancelled or timed out
    /// task.
    pub fn start<T, F>(
        &self,
        finish: F,
    ) -> (AbortHandle, impl Future<Output = Result<T, TaskError>>)
    where
        F: FnOnce() -> T,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let delay = self.delay;
        let timeout = self.timeout;

        let task = async move {
            let wait = Abortable::new(tokio::time::sleep(delay), registration);
            match tokio::time::timeout(timeout, wait).await {
                Err(_) => Err(TaskError::TimedOut),
                Ok(Err(Aborted)) => Err(TaskError::Cancelled),
                Ok(Ok(())) => Ok(finish()),
            }
        };

        (handle, task)
    }

    pub async fn run(&self) -> Result<(), TaskError> {
        let (_handle, task) = self.start(|| ());
        task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_task_completes_after_delay() {
        let task = SimulatedTask::new(Duration::from_millis(5), Duration::from_secs(1));
        let (_handle, fut) = task.start(|| 42);
        assert_eq!(fut.await, Ok(42));
    }

    #[actix_rt::test]
    async fn test_aborted_task_never_finishes() {
        let task = SimulatedTask::new(Duration::from_secs(5), Duration::from_secs(10));
        let mut finished = false;
        let (handle, fut) = task.start(|| finished = true);
        handle.abort();
        assert_eq!(fut.await, Err(TaskError::Cancelled));
        assert!(!finished);
    }

    #[actix_rt::test]
    async fn test_task_times_out() {
        let task = SimulatedTask::new(Duration::from_secs(5), Duration::from_millis(10));
        assert_eq!(task.run().await, Err(TaskError::TimedOut));
    }

    #[actix_rt::test]
    async fn test_zero_delay_runs_immediately() {
        let task = SimulatedTask::new(Duration::ZERO, Duration::from_secs(1));
        assert_eq!(task.run().await, Ok(()));
    }
}
