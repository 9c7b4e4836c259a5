//! Typed action channels
//!
//! An `Action<T>` is an `Observable<T>` with a diagnostic re-entrancy guard.
//! Stores register their mutation callbacks on the actions they own; action
//! creators call `invoke()` with a typed payload.
//!
//! The guard is per channel. Invoking an action while that same action is
//! still delivering a previous payload logs a warning and then proceeds: the
//! flag is diagnostic only, it never blocks or queues.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{trace, warn};

use crate::observable::{Observable, SubscriptionId};

/// Typed broadcast channel representing "an intent or event occurred"
pub struct Action<T> {
    name: &'static str,
    observable: Observable<T>,
    executing: AtomicBool,
}

/// Clears the executing flag when dropped, including during unwinding
struct ExecutingGuard<'a> {
    flag: &'a AtomicBool,
    previous: bool,
}

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        // A nested invoke must not clear the flag of the outer one
        if !self.previous {
            self.flag.store(false, Ordering::SeqCst);
        }
    }
}

impl<T> Action<T> {
    /// Create a channel; `name` only appears in diagnostics
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            observable: Observable::new(),
            executing: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Deliver `payload` to every listener, in subscription order
    pub fn invoke(&self, payload: T) {
        let previous = self.executing.swap(true, Ordering::SeqCst);
        if previous {
            warn!(
                action = self.name,
                "Action invoked while a previous invocation is still executing"
            );
        }
        let _guard = ExecutingGuard {
            flag: &self.executing,
            previous,
        };

        trace!(action = self.name, listeners = self.observable.len(), "invoke");
        self.observable.notify(&payload, &());
    }

    /// Register a listener for this action
    pub fn add_listener<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.observable.subscribe(move |payload: &T, _: &()| listener(payload))
    }

    pub fn remove_listener(&self, id: SubscriptionId) -> bool {
        self.observable.unsubscribe(id)
    }

    /// Whether an `invoke` on this channel is currently delivering
    pub fn is_executing(&self) -> bool {
        self.executing.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.observable.len()
    }
}

impl<T> fmt::Debug for Action<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("listener_count", &self.listener_count())
            .field("executing", &self.is_executing())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    struct LogWriter(Arc<Mutex<Vec<u8>>>);

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogWriter;

        fn make_writer(&'a self) -> Self::Writer {
            LogWriter(Arc::clone(&self.0))
        }
    }

    impl io::Write for LogWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn warnings(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .filter(|line| line.contains("WARN"))
                .map(str::to_string)
                .collect()
        }
    }

    /// Run `f` with a subscriber that records WARN and above into a buffer
    fn capture_warnings<F: FnOnce()>(f: F) -> LogBuffer {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        buffer
    }

    #[test]
    fn test_invoke_reaches_listeners() {
        let action = Action::<String>::new("rename");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        action.add_listener(move |name: &String| sink.lock().push(name.clone()));

        action.invoke("first".to_string());
        action.invoke("second".to_string());

        assert_eq!(*seen.lock(), vec!["first".to_string(), "second".to_string()]);
        assert!(!action.is_executing());
    }

    #[test]
    fn test_executing_flag_set_during_delivery() {
        let action = Arc::new(Action::<u8>::new("flagged"));
        let observed = Arc::new(Mutex::new(None));

        let weak = Arc::downgrade(&action);
        let sink = Arc::clone(&observed);
        action.add_listener(move |_| {
            *sink.lock() = weak.upgrade().map(|a| a.is_executing());
        });

        action.invoke(1);
        assert_eq!(*observed.lock(), Some(true));
        assert!(!action.is_executing());
    }

    #[test]
    fn test_nested_invoke_proceeds() {
        let action = Arc::new(Action::<u8>::new("nested"));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&action);
        let sink = Arc::clone(&seen);
        action.add_listener(move |value: &u8| {
            sink.lock().push(*value);
            if *value == 0 {
                if let Some(action) = weak.upgrade() {
                    // Warns, but is delivered
                    action.invoke(1);
                    assert!(action.is_executing());
                }
            }
        });

        action.invoke(0);
        assert_eq!(*seen.lock(), vec![0, 1]);
        assert!(!action.is_executing());
    }

    #[test]
    fn test_nested_invoke_logs_warning() {
        let action = Arc::new(Action::<u8>::new("refresh"));
        let weak = Arc::downgrade(&action);
        action.add_listener(move |value: &u8| {
            if *value == 0 {
                if let Some(action) = weak.upgrade() {
                    action.invoke(1);
                }
            }
        });

        let logs = capture_warnings(|| action.invoke(0));
        let warnings = logs.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("still executing"));
        assert!(warnings[0].contains("refresh"));

        // A plain invoke is silent
        let logs = capture_warnings(|| action.invoke(2));
        assert!(logs.warnings().is_empty());
    }

    #[test]
    fn test_flag_is_per_channel() {
        let outer = Arc::new(Action::<()>::new("outer"));
        let inner = Arc::new(Action::<()>::new("inner"));
        let inner_was_executing = Arc::new(Mutex::new(None));

        let inner_ref = Arc::clone(&inner);
        let sink = Arc::clone(&inner_was_executing);
        outer.add_listener(move |_| {
            *sink.lock() = Some(inner_ref.is_executing());
            inner_ref.invoke(());
        });

        outer.invoke(());
        assert_eq!(*inner_was_executing.lock(), Some(false));
    }

    #[test]
    fn test_flag_cleared_after_listener_panic() {
        let action = Action::<u8>::new("panics");
        action.add_listener(|_| panic!("listener failure"));

        let result = catch_unwind(AssertUnwindSafe(|| action.invoke(1)));
        assert!(result.is_err());
        assert!(!action.is_executing());
    }

    #[test]
    fn test_remove_listener() {
        let action = Action::<u8>::new("remove");
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = action.add_listener(move |_| *sink.lock() += 1);

        action.invoke(1);
        assert!(action.remove_listener(id));
        action.invoke(2);

        assert_eq!(*count.lock(), 1);
        assert_eq!(action.listener_count(), 0);
    }
}
