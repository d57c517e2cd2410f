//! Theme synchronization engine
//!
//! One resolve-and-apply pipeline, fed by five triggers:
//!
//! - attach: the first full pass when the content script starts
//! - OS color-scheme change: only relevant while the mode is `auto`
//! - store change notification: mode changes re-run everything, asset path
//!   changes re-run the logo step only
//! - apply-now command: full re-read from the store, then acknowledge
//! - DOM mutation: re-apply from the cached inputs, no store round trip
//!
//! Every adapter extracts the input it observed, updates the shared context,
//! and calls the same apply steps. Passes may interleave at await points; each
//! step reads the current context when it runs, so the page converges on the
//! latest inputs once the last pass finishes. A store read that completes
//! after a newer mode was observed does not overwrite it.

use crate::apply::ThemeApplier;
use crate::assets::{ExtensionRuntime, LogoAssets};
use crate::config::EngineConfig;
use crate::context::{SharedThemeContext, create_shared_context};
use crate::dom::ThemeDocument;
use crate::message::{ApplyAck, ThemeMessage};
use crate::mode::{ThemeMode, resolve_is_dark};
use crate::store::{PreferenceArea, PreferenceStore, StoreChange};

/// Live OS dark-preference signal
pub trait ColorSchemeSignal {
    fn prefers_dark(&self) -> bool;
}

/// What caused a pipeline pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Attach,
    ColorScheme,
    StoreChange,
    Command,
    Mutation,
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Attach => "attach",
            Trigger::ColorScheme => "color-scheme",
            Trigger::StoreChange => "store-change",
            Trigger::Command => "command",
            Trigger::Mutation => "mutation",
        }
    }
}

/// The content-script engine for one page
pub struct ThemeEngine<D, S, R, C> {
    config: EngineConfig,
    document: D,
    store: PreferenceStore<S>,
    runtime: R,
    signal: C,
    context: SharedThemeContext,
}

impl<D, S, R, C> ThemeEngine<D, S, R, C>
where
    D: ThemeDocument,
    S: PreferenceArea,
    R: ExtensionRuntime,
    C: ColorSchemeSignal,
{
    pub fn new(
        config: EngineConfig,
        document: D,
        store: PreferenceStore<S>,
        runtime: R,
        signal: C,
    ) -> Self {
        Self {
            config,
            document,
            store,
            runtime,
            signal,
            context: create_shared_context(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> &SharedThemeContext {
        &self.context
    }

    /// Initial pass when the content script starts
    pub async fn attach(&self) {
        tracing::debug!("Attaching theme engine");
        self.run_full_pass(Trigger::Attach).await;
    }

    /// Re-read the store and re-apply everything
    pub async fn apply_from_store(&self) {
        self.run_full_pass(Trigger::Command).await;
    }

    /// The OS color scheme changed
    pub async fn on_color_scheme_change(&self) {
        let mode = self.context.lock().mode;
        if !mode.follows_os() {
            tracing::trace!(mode = mode.as_str(), "Ignoring color scheme change");
            return;
        }
        self.apply_theme(Trigger::ColorScheme);
        self.refresh_logos(Trigger::ColorScheme).await;
    }

    /// A storage area reported changed keys
    pub async fn on_store_change(&self, change: &StoreChange) {
        if !change.area.is_preference_area() {
            tracing::trace!(area = change.area.name(), "Ignoring storage change");
            return;
        }

        let keys = &self.config.storage;
        if change.touches(&keys.mode) {
            let mode = ThemeMode::from_value(change.new_value(&keys.mode));
            {
                let mut context = self.context.lock();
                let ticket = context.next_mode_ticket();
                context.observe_mode(ticket, mode);
            }
            tracing::debug!(mode = mode.as_str(), "Stored mode changed");
            self.apply_theme(Trigger::StoreChange);
            self.refresh_logos(Trigger::StoreChange).await;
        } else if change.touches(&keys.dark_logo_path) || change.touches(&keys.light_logo_path) {
            self.refresh_logos(Trigger::StoreChange).await;
        }
    }

    /// Handle a cross-context command
    pub async fn on_message(&self, message: &ThemeMessage) -> ApplyAck {
        match message {
            ThemeMessage::ApplyNow => {
                self.apply_from_store().await;
                ApplyAck::ok()
            }
        }
    }

    /// The page's DOM changed; re-apply from cached inputs
    pub fn on_mutation(&self) {
        let is_dark = self.is_dark();
        let assets = self.context.lock().assets.clone();
        let applier = self.applier();
        applier.apply_theme(&self.document, is_dark);
        applier.apply_logos(&self.document, is_dark, &assets);
        self.finish_pass(Trigger::Mutation, is_dark);
    }

    /// Decision for the cached mode. The OS signal is only consulted for `auto`.
    pub fn is_dark(&self) -> bool {
        let mode = self.context.lock().mode;
        let os_prefers_dark = mode.follows_os() && self.signal.prefers_dark();
        resolve_is_dark(mode, os_prefers_dark)
    }

    async fn run_full_pass(&self, trigger: Trigger) {
        let ticket = self.context.lock().next_mode_ticket();
        let mode = self.store.load_mode(&self.config.storage).await;
        if !self.context.lock().observe_mode(ticket, mode) {
            tracing::debug!(mode = mode.as_str(), "Dropping stale stored mode");
        }
        self.apply_theme(trigger);
        self.refresh_logos(trigger).await;
    }

    fn apply_theme(&self, trigger: Trigger) {
        let is_dark = self.is_dark();
        tracing::debug!(trigger = trigger.name(), is_dark, "Applying theme");
        self.applier().apply_theme(&self.document, is_dark);
    }

    async fn refresh_logos(&self, trigger: Trigger) {
        let assets = self.resolve_assets().await;
        self.context.lock().assets = assets.clone();

        // Re-derived after the await: the mode may have changed meanwhile
        let is_dark = self.is_dark();
        let touched = self.applier().apply_logos(&self.document, is_dark, &assets);
        tracing::debug!(trigger = trigger.name(), touched, "Applied logos");
        self.finish_pass(trigger, is_dark);
    }

    async fn resolve_assets(&self) -> LogoAssets {
        self.store
            .load_logo_paths(&self.config.storage)
            .await
            .resolve(&self.runtime)
    }

    fn finish_pass(&self, trigger: Trigger, is_dark: bool) {
        let pass = self.context.lock().record_pass();
        tracing::trace!(trigger = trigger.name(), is_dark, pass, "Pass complete");
    }

    fn applier(&self) -> ThemeApplier<'_> {
        ThemeApplier::new(&self.config.theme)
    }
}
