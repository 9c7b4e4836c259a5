//! A settings panel wired to the settings store
//!
//! Run with `WIT_LOG_MODE=development` to see the store traffic.

use std::sync::Arc;

use extension_state::prelude::*;
use extension_state::init_logging_from_env;

#[derive(Clone, Debug, Default)]
struct PanelState {
    show_closed: Option<bool>,
    loading: bool,
    error: Option<String>,
}

struct SettingsPanel {
    settings: Arc<SettingsStore>,
    errors: Arc<ErrorMessageStore>,
}

impl FluxComponent for SettingsPanel {
    type State = PanelState;

    fn stores(&self) -> Vec<Arc<dyn ChangeNotifier>> {
        vec![
            Arc::clone(&self.settings) as Arc<dyn ChangeNotifier>,
            Arc::clone(&self.errors) as Arc<dyn ChangeNotifier>,
        ]
    }

    fn initial_state(&self) -> PanelState {
        PanelState {
            loading: true,
            ..Default::default()
        }
    }

    fn state_from_stores(&self, state: &mut PanelState) {
        state.show_closed = self.settings.get_setting("showClosed").ok().flatten();
        state.loading = !self.settings.is_loaded(Some("showClosed"));
        state.error = self.errors.value();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging_from_env().map_err(|e| StateError::Config(e.to_string()))?;

    let documents: Arc<dyn DocumentService> = Arc::new(InMemoryDocumentService::new());
    let context = ExtensionContext::builder()
        .with_document_service(Arc::clone(&documents))
        .build()?;
    let other_user = ExtensionContext::builder()
        .with_document_service(documents)
        .build()?;

    let panel = Arc::new(SettingsPanel {
        settings: context.settings_store(),
        errors: context.error_message_store(),
    });
    let binding = ComponentBinding::mount_with_render(panel, |state: &PanelState| {
        println!("render: {:?}", state);
    });

    let settings = context.settings_actions()?;
    settings.initialize_setting("showClosed").await?;
    settings.update_setting("showClosed", &true).await?;

    // Someone else saves in between; our next write carries a stale etag
    let theirs = other_user.settings_actions()?;
    theirs.initialize_setting("showClosed").await?;
    theirs.update_setting("showClosed", &false).await?;
    if let Err(err) = settings.update_setting("showClosed", &false).await {
        context.report_error(&err);
    }

    let state = binding.unmount();
    println!("final: {:?}", state);
    Ok(())
}
