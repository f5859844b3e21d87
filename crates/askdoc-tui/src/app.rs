use askdoc_core::{Outcome, QuestionSubmissionController, SubmitDecision};
use tokio::sync::oneshot;

/// Result of the startup `/healthz` check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Unknown,
    Reachable,
    Unreachable,
}

pub struct App {
    pub should_quit: bool,
    pub controller: QuestionSubmissionController,
    pub endpoint: String,
    pub service_status: ServiceStatus,
    health_rx: Option<oneshot::Receiver<ServiceStatus>>,

    // Transcript viewport
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat area, set on draw
    pub chat_width: u16,  // inner width of the chat area, set on draw

    pub animation_frame: u8,
}

impl App {
    pub fn new(controller: QuestionSubmissionController, endpoint: impl Into<String>) -> Self {
        Self {
            should_quit: false,
            controller,
            endpoint: endpoint.into(),
            service_status: ServiceStatus::Unknown,
            health_rx: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.controller.submission_state().is_pending()
    }

    /// Submit the input buffer. Blank input and submits while busy are ignored.
    pub fn submit(&mut self) -> Option<SubmitDecision> {
        if self.controller.input().is_blank() || self.is_busy() {
            return None;
        }

        let decision = self.controller.submit_input();
        if decision == SubmitDecision::Accepted {
            self.animation_frame = 0;
            self.scroll_chat_to_bottom();
        }
        Some(decision)
    }

    /// Show `Unknown` until the background health check reports on `rx`
    pub fn watch_health(&mut self, rx: oneshot::Receiver<ServiceStatus>) {
        self.service_status = ServiceStatus::Unknown;
        self.health_rx = Some(rx);
    }

    /// Pick up the health check result once it is in
    pub fn check_health(&mut self) {
        let Some(rx) = self.health_rx.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(status) => {
                self.service_status = status;
                self.health_rx = None;
            }
            Err(oneshot::error::TryRecvError::Empty) => {}
            Err(oneshot::error::TryRecvError::Closed) => {
                self.service_status = ServiceStatus::Unreachable;
                self.health_rx = None;
            }
        }
    }

    /// Apply the outstanding answer if it has arrived
    pub async fn collect_answer(&mut self) -> Option<Outcome> {
        let outcome = self.controller.poll().await?;
        self.scroll_chat_to_bottom();
        Some(outcome)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.chat_scroll = (self.chat_scroll + lines).min(max);
    }

    pub fn half_page(&self) -> u16 {
        (self.visible_height() / 2).max(1)
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_scroll();
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    fn max_scroll(&self) -> u16 {
        self.transcript_line_count().saturating_sub(self.visible_height())
    }

    /// Rendered line count of the transcript at the current chat width
    pub fn transcript_line_count(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;
        for msg in self.controller.store().transcript() {
            total_lines = total_lines.saturating_add(1); // "You:" / "Bot:"
            for line in msg.text.lines() {
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count.div_ceil(wrap_width).max(1));
            }
            total_lines = total_lines.saturating_add(1); // blank separator
        }

        if self.is_busy() {
            total_lines = total_lines.saturating_add(2); // "Bot:" + "Processing..."
        }

        u16::try_from(total_lines).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use askdoc_core::{AskError, AskRequest, AskService, SubmissionState};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Answers every question with `answer: "ok: <question>"`
    pub(crate) struct EchoService {
        pub(crate) calls: Mutex<usize>,
    }

    #[async_trait]
    impl AskService for EchoService {
        async fn ask(&self, request: &AskRequest) -> Result<Value, AskError> {
            *self.calls.lock().unwrap() += 1;
            Ok(json!({"answer": format!("ok: {}", request.text)}))
        }
    }

    pub(crate) fn test_app() -> (App, Arc<EchoService>) {
        let service = Arc::new(EchoService { calls: Mutex::new(0) });
        let controller = QuestionSubmissionController::new(Arc::clone(&service) as Arc<dyn AskService>);
        (App::new(controller, "http://localhost:8000"), service)
    }

    #[tokio::test]
    async fn test_blank_input_is_not_submitted() {
        let (mut app, service) = test_app();
        app.controller.input_mut().set("   ");

        assert_eq!(app.submit(), None);
        app.controller.settle().await;

        assert_eq!(*service.calls.lock().unwrap(), 0);
        assert!(app.controller.store().transcript().is_empty());
    }

    #[tokio::test]
    async fn test_submit_while_busy_is_ignored() {
        let (mut app, _service) = test_app();
        app.controller.input_mut().set("first");

        assert_eq!(app.submit(), Some(SubmitDecision::Accepted));
        assert!(app.is_busy());
        assert_eq!(app.submit(), None);

        app.controller.settle().await;
        assert_eq!(app.controller.store().transcript().len(), 2);
        assert_eq!(app.controller.submission_state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_huge_answer_line_count_saturates() {
        let (mut app, _service) = test_app();
        app.chat_width = 80;

        app.controller.input_mut().set("x".repeat(3_000_000));
        app.submit();
        app.controller.settle().await;

        assert_eq!(app.transcript_line_count(), u16::MAX);
        app.scroll_chat_to_bottom();
        assert!(app.chat_scroll > 0);
    }

    #[test]
    fn test_health_status_arrives_later() {
        let (mut app, _service) = test_app();
        let (tx, rx) = oneshot::channel();
        app.watch_health(rx);

        app.check_health();
        assert_eq!(app.service_status, ServiceStatus::Unknown);

        tx.send(ServiceStatus::Reachable).unwrap();
        app.check_health();
        assert_eq!(app.service_status, ServiceStatus::Reachable);
    }

    #[test]
    fn test_dropped_health_check_is_unreachable() {
        let (mut app, _service) = test_app();
        let (tx, rx) = oneshot::channel::<ServiceStatus>();
        app.watch_health(rx);
        drop(tx);

        app.check_health();
        assert_eq!(app.service_status, ServiceStatus::Unreachable);
    }

    #[tokio::test]
    async fn test_scroll_is_clamped_to_transcript() {
        let (mut app, _service) = test_app();
        app.chat_width = 10;
        app.chat_height = 3;

        app.controller.input_mut().set("a question that wraps");
        app.submit();
        app.controller.settle().await;

        // user: 1 + 3 wrapped + 1, answer "ok: a question that wraps": 1 + 3 + 1
        assert_eq!(app.transcript_line_count(), 10);

        app.scroll_down(100);
        assert_eq!(app.chat_scroll, 7);
        app.scroll_up(100);
        assert_eq!(app.chat_scroll, 0);
    }
}
