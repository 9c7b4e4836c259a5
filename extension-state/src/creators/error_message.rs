use std::sync::Arc;

use tracing::debug;

use crate::stores::ErrorMessageStore;

/// Shows and dismisses the error banner
pub struct ErrorMessageActionCreator {
    store: Arc<ErrorMessageStore>,
}

impl ErrorMessageActionCreator {
    pub fn new(store: Arc<ErrorMessageStore>) -> Self {
        Self { store }
    }

    pub fn show_error_message(&self, message: impl Into<String>) {
        let message = message.into();
        debug!(%message, "Showing error message");
        self.store.actions().set(message);
    }

    pub fn dismiss_error_message(&self) {
        self.store.actions().clear();
    }

    pub fn clean(&self) {
        self.store.actions().clean();
    }
}
