use crate::core::context::{AppContext, MOLLUSKS};
use crate::core::{Mollusk, Resource};
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;

pub const READY: &str = "ready!";

/// State bound to the mollusk page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    pub mollusks: Vec<Mollusk>,
    pub new_mollusk: Mollusk,
    pub app_state: String,
}

/// Lists mollusks on start and creates new ones on demand.
pub struct MolluskController {
    ctx: AppContext,
    mollusks: Arc<dyn Resource>,
    refresh_target: String,
    state: ViewState,
}

impl MolluskController {
    /// Resolves `Mollusks`, loads the list once and marks the page ready.
    pub async fn init(ctx: AppContext) -> Result<Self> {
        Self::init_with_refresh_target(ctx, MOLLUSKS).await
    }

    pub async fn init_with_refresh_target(
        ctx: AppContext,
        refresh_target: impl Into<String>,
    ) -> Result<Self> {
        let mollusks = ctx.resolve(MOLLUSKS)?;
        let mut controller = Self {
            ctx,
            mollusks,
            refresh_target: refresh_target.into(),
            state: ViewState::default(),
        };

        match controller.mollusks.query().await {
            Ok(list) => controller.state.mollusks = list,
            Err(e) => tracing::warn!("Initial mollusk query failed: {}", e),
        }

        controller.state.app_state = READY.to_string();
        tracing::info!("HelloCtrl {}", READY);
        Ok(controller)
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// Saves `new_mollusk` and reloads the list. Always returns `false`
    /// so the caller does not navigate away.
    pub async fn add_mollusk(&mut self) -> bool {
        let new_mollusk = self.state.new_mollusk.clone();

        match self.mollusks.save(&new_mollusk).await {
            Ok(saved) => tracing::debug!("Saved mollusk {:?}", saved.id),
            Err(e) => tracing::warn!("Saving mollusk failed: {}", e),
        }

        let target = self.refresh_target.clone();
        match self.refresh_from(&target).await {
            Ok(list) => self.state.mollusks = list,
            Err(e) => tracing::warn!("Refreshing mollusks from {} failed: {}", target, e),
        }

        false
    }

    /// Queries the resource registered as `name`, without touching the view state.
    pub async fn refresh_from(&self, name: &str) -> Result<Vec<Mollusk>> {
        let resource = self.ctx.resolve(name)?;
        resource.query().await
    }
}
