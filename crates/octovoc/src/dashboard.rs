//! The dashboard a student or guest picks a module from.

use crate::{api::ContentApi, context::SessionContext, error::SessionResult};
use octovoc_api::response::ModuleSummary;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub modules: Vec<ModuleSummary>,
    /// Set until the privacy notice has been accepted.
    pub show_privacy_notice: bool,
}

impl Dashboard {
    /// Lists the modules for the context. Guests only see the level they picked.
    pub async fn load<C: ContentApi>(api: &C, context: &SessionContext) -> SessionResult<Self> {
        let level = context.module_level();
        tracing::info!("loading modules for level {level:?}");
        let modules = api.modules(level).await?;
        Ok(Self {
            modules,
            show_privacy_notice: !context.gdpr_accepted,
        })
    }

    /// Modules that can be practised without an account.
    pub fn free_modules(&self) -> impl Iterator<Item = &ModuleSummary> {
        self.modules.iter().filter(|module| module.is_free)
    }
}
