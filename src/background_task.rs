use std::{fmt, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot},
    task::{JoinHandle, JoinSet},
    time::{sleep, timeout, Duration},
};
use uuid::Uuid;

use crate::{
    entities::contact_message::ContactMessage,
    errors::MailError,
    mailer::{templates, Email, Mailer},
    settings::AppConfig,
};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    AdminAlert,
    AutoReply,
    CustomReply,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::AdminAlert => f.write_str("admin_alert"),
            NotificationKind::AutoReply => f.write_str("auto_reply"),
            NotificationKind::CustomReply => f.write_str("custom_reply"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub contact_message_id: i64,
    pub email: Email,
}

/// Sending half of the notification queue. Enqueueing never blocks and never
/// fails the caller.
#[derive(Clone)]
pub struct NotificationOutbox {
    sender: mpsc::UnboundedSender<NotificationJob>,
}

impl NotificationOutbox {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationJob>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (NotificationOutbox { sender }, receiver)
    }

    pub fn enqueue(&self, kind: NotificationKind, contact_message_id: i64, email: Email) -> Uuid {
        let job = NotificationJob {
            id: Uuid::new_v4(),
            kind,
            contact_message_id,
            email,
        };
        let id = job.id;

        match self.sender.send(job) {
            Ok(()) => tracing::debug!(job_id = %id, %kind, contact_message_id, "Notification queued"),
            Err(_) => tracing::error!(
                job_id = %id,
                %kind,
                contact_message_id,
                "Notification worker is not running; notification dropped"
            ),
        }

        id
    }

    /// Queues the admin alert and the submitter's auto-reply for a new message.
    pub fn enqueue_contact_notifications(&self, message: &ContactMessage, config: &AppConfig) -> [Uuid; 2] {
        [
            self.enqueue(
                NotificationKind::AdminAlert,
                message.id,
                templates::admin_notification(message, config),
            ),
            self.enqueue(
                NotificationKind::AutoReply,
                message.id,
                templates::auto_reply(message, config),
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        RetryPolicy {
            max_attempts: config.notification_max_attempts.max(1),
            base_delay: Duration::from_millis(config.notification_retry_base_ms),
        }
    }

    /// Delay before retrying after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

/// Tries to deliver a job up to `max_attempts` times. Returns the number of
/// attempts used, or the last error once attempts run out.
pub async fn deliver_with_retry(
    mailer: &dyn Mailer,
    job: &NotificationJob,
    policy: RetryPolicy,
) -> Result<u32, MailError> {
    let mut attempt = 1;

    loop {
        match mailer.send(&job.email).await {
            Ok(()) => return Ok(attempt),
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    job_id = %job.id,
                    kind = %job.kind,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Notification delivery failed: {}. Retrying in {:?}",
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn deliver(mailer: Arc<dyn Mailer>, job: NotificationJob, policy: RetryPolicy) {
    match deliver_with_retry(mailer.as_ref(), &job, policy).await {
        Ok(attempts) => tracing::info!(
            job_id = %job.id,
            kind = %job.kind,
            contact_message_id = job.contact_message_id,
            attempts,
            "Notification delivered"
        ),
        Err(e) => tracing::error!(
            job_id = %job.id,
            kind = %job.kind,
            contact_message_id = job.contact_message_id,
            "Notification abandoned after {} attempts: {}",
            policy.max_attempts,
            e
        ),
    }
}

/// Handle to the running delivery worker.
pub struct NotificationWorker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl NotificationWorker {
    /// Stops accepting new work, then waits for in-flight deliveries.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::error!("Notification worker panicked: {}", e);
        }
    }
}

pub fn spawn_notification_worker(
    receiver: mpsc::UnboundedReceiver<NotificationJob>,
    mailer: Arc<dyn Mailer>,
    policy: RetryPolicy,
    grace: Duration,
) -> NotificationWorker {
    let (shutdown, shutdown_rx) = oneshot::channel();
    let handle = tokio::spawn(run_notification_worker(receiver, mailer, policy, grace, shutdown_rx));
    NotificationWorker { shutdown, handle }
}

async fn run_notification_worker(
    mut receiver: mpsc::UnboundedReceiver<NotificationJob>,
    mailer: Arc<dyn Mailer>,
    policy: RetryPolicy,
    grace: Duration,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut tasks = JoinSet::new();
    tracing::info!("Notification worker started");

    loop {
        tokio::select! {
            job = receiver.recv() => match job {
                Some(job) => {
                    tasks.spawn(deliver(mailer.clone(), job, policy));
                }
                None => break,
            },
            _ = &mut shutdown => break,
        }

        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                tracing::error!("Notification task failed: {}", e);
            }
        }
    }

    // Jobs queued before shutdown still get a delivery attempt.
    receiver.close();
    while let Ok(job) = receiver.try_recv() {
        tasks.spawn(deliver(mailer.clone(), job, policy));
    }

    let pending = tasks.len();
    if pending > 0 {
        tracing::info!("Draining {} in-flight notifications", pending);
    }

    let drained = timeout(grace, async {
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!("Notification task failed: {}", e);
            }
        }
    })
    .await;

    if drained.is_err() {
        tracing::warn!(
            "Shutdown grace period elapsed; abandoning {} notifications",
            tasks.len()
        );
        tasks.abort_all();
    }

    tracing::info!("Notification worker stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::mailer::MockMailer;

    fn email(to: &str) -> Email {
        Email {
            from: "noreply@portfolio.com".into(),
            to: to.into(),
            reply_to: None,
            subject: "Subject".into(),
            text: "Body".into(),
        }
    }

    fn job(to: &str) -> NotificationJob {
        NotificationJob {
            id: Uuid::new_v4(),
            kind: NotificationKind::AutoReply,
            contact_message_id: 1,
            email: email(to),
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy { max_attempts, base_delay: Duration::from_millis(1) }
    }

    #[test]
    fn delays_grow_exponentially_and_cap() {
        let policy = RetryPolicy { max_attempts: 10, base_delay: Duration::from_millis(500) };
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_after(4), Duration::from_millis(4000));
        assert_eq!(policy.delay_after(30), MAX_RETRY_DELAY);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(3).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(MailError::Transport("connection reset".into()))
            } else {
                Ok(())
            }
        });

        let attempts = deliver_with_retry(&mailer, &job("a@b.co"), policy(5)).await.unwrap();
        assert_eq!(attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn delivery_gives_up_after_max_attempts() {
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(3)
            .returning(|_| Err(MailError::Rejected(503)));

        let result = deliver_with_retry(&mailer, &job("a@b.co"), policy(3)).await;
        assert!(matches!(result, Err(MailError::Rejected(503))));
    }

    #[tokio::test]
    async fn worker_delivers_queued_jobs_before_stopping() {
        let delivered = Arc::new(AtomicU32::new(0));
        let counter = delivered.clone();

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|email: &Email| email.to == "first@x.io" || email.to == "second@x.io")
            .returning(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            });

        let (outbox, receiver) = NotificationOutbox::new();
        let worker = spawn_notification_worker(receiver, Arc::new(mailer), policy(1), Duration::from_secs(5));

        outbox.enqueue(NotificationKind::AdminAlert, 1, email("first@x.io"));
        outbox.enqueue(NotificationKind::AutoReply, 1, email("second@x.io"));

        worker.shutdown().await;
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn enqueue_after_worker_stops_does_not_fail() {
        let (outbox, receiver) = NotificationOutbox::new();
        drop(receiver);

        let id = outbox.enqueue(NotificationKind::AdminAlert, 1, email("x@y.io"));
        assert!(!id.is_nil());
    }
}
