use crate::domain::driftavbrott::Driftavbrott;
use crate::source::{SourceError, WindowSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub enum MockBehavior {
    Window(Option<Driftavbrott>),
    Unavailable,
}

/// Scriptable source for tests and local demos; counts its fetches.
pub struct MockWindowSource {
    behavior: Mutex<MockBehavior>,
    calls: AtomicUsize,
}

impl MockWindowSource {
    pub fn returning(window: Option<Driftavbrott>) -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Window(window)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            behavior: Mutex::new(MockBehavior::Unavailable),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock().await = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl WindowSource for MockWindowSource {
    async fn fetch_ongoing(
        &self,
        _kanaler: &[String],
        _system: &str,
        _marginal: u32,
    ) -> Result<Option<Driftavbrott>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior.lock().await.clone() {
            MockBehavior::Window(window) => Ok(window),
            MockBehavior::Unavailable => Err(SourceError::Transport("mock unavailable".to_string())),
        }
    }
}
