//! Process-wide handle to the loaded generative model.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::info;

use super::client::{LlmClient, LlmConfig, LlmError, TextGenerator};

type Init = Box<dyn Fn() -> Result<Arc<dyn TextGenerator>, LlmError> + Send + Sync>;

/// Owned handle to a generator, created at most once.
///
/// A lazy handle runs its initializer on the first successful [`get`](Self::get)
/// and shares the same generator afterwards. A failed initialization leaves
/// the handle empty so a later call can try again.
pub struct ModelHandle {
    cell: OnceLock<Arc<dyn TextGenerator>>,
    init: Option<Init>,
    init_lock: Mutex<()>,
}

impl ModelHandle {
    /// Wrap an already-constructed generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(generator);
        Self {
            cell,
            init: None,
            init_lock: Mutex::new(()),
        }
    }

    /// Defer construction until first use.
    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn TextGenerator>, LlmError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            init: Some(Box::new(init)),
            init_lock: Mutex::new(()),
        }
    }

    /// Lazily build an HTTP client for the configured provider.
    pub fn from_config(config: LlmConfig) -> Self {
        Self::lazy(move || {
            info!("Loading model {} from {}", config.model, config.endpoint);
            let client = LlmClient::new(config.clone())?;
            Ok(Arc::new(client) as Arc<dyn TextGenerator>)
        })
    }

    /// Whether the generator has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Get the generator, constructing it on first use.
    pub fn get(&self) -> Result<Arc<dyn TextGenerator>, LlmError> {
        if let Some(generator) = self.cell.get() {
            return Ok(generator.clone());
        }

        // Serialize first use so the initializer runs once.
        let _guard = self
            .init_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(generator) = self.cell.get() {
            return Ok(generator.clone());
        }

        let init = self
            .init
            .as_ref()
            .ok_or_else(|| LlmError::Setup("model handle has no initializer".to_string()))?;
        let generator = init()?;
        Ok(self.cell.get_or_init(|| generator).clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        fn model_name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, LlmError> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_eager_handle_is_initialized() {
        let handle = ModelHandle::new(Arc::new(Echo));
        assert!(handle.is_initialized());
        assert_eq!(handle.get().unwrap().model_name(), "echo");
    }

    #[test]
    fn test_lazy_initializes_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = Arc::new(ModelHandle::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Echo) as Arc<dyn TextGenerator>)
        }));
        assert!(!handle.is_initialized());

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let handle = handle.clone();
                std::thread::spawn(move || handle.get().map(|g| g.model_name().to_string()))
            })
            .collect();
        for t in threads {
            assert_eq!(t.join().unwrap().unwrap(), "echo");
        }

        let first = handle.get().unwrap();
        let second = handle.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_init_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handle = ModelHandle::lazy(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(LlmError::Setup("no tls backend".to_string()))
            } else {
                Ok(Arc::new(Echo) as Arc<dyn TextGenerator>)
            }
        });

        assert!(handle.get().is_err());
        assert!(!handle.is_initialized());
        assert!(handle.get().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
