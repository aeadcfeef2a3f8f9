use std::sync::Arc;

use super::backend::Backend;
use super::clock::Clock;
use super::i18n::Translator;
use super::metrics::MetricsRegistry;
use super::notifier::{NoticeBuilder, Navigator, Notifier};
use super::persistence::PersistedSession;

/// Collaborators shared by the session store, auth actions and user operations.
#[derive(Clone)]
pub struct ConsoleContext {
    pub backend: Arc<dyn Backend>,
    pub persisted: Arc<PersistedSession>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub translator: Translator,
    pub clock: Arc<dyn Clock>,
    pub metrics: Arc<MetricsRegistry>,
}

impl ConsoleContext {
    pub fn notices(&self) -> NoticeBuilder<'_> {
        NoticeBuilder::new(&self.translator, self.notifier.as_ref())
    }
}
