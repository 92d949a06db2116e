// service/preferences.rs
use uuid::Uuid;

use crate::{
    db::preferencedb::PreferenceExt,
    models::preferencemodel::Theme,
    service::error::ServiceError,
};

/// A caller's display theme. Built from the persisted value and re-applied on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSettings {
    user_id: Uuid,
    theme: Theme,
    classes: Vec<&'static str>,
}

impl ThemeSettings {
    fn with_theme(user_id: Uuid, theme: Theme) -> Self {
        let mut settings = Self {
            user_id,
            theme,
            classes: Vec::new(),
        };
        settings.apply();
        settings
    }

    /// Unknown or unreadable stored values fall back to the default theme.
    pub async fn load(store: &dyn PreferenceExt, user_id: Uuid) -> Self {
        let theme = match store.get_theme(user_id).await {
            Ok(Some(raw)) => Theme::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown stored theme {:?} for {}", raw, user_id);
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::error!("Failed to load theme for {}: {}", user_id, e);
                Theme::default()
            }
        };

        Self::with_theme(user_id, theme)
    }

    pub async fn set(&mut self, store: &dyn PreferenceExt, theme: Theme) -> Result<(), ServiceError> {
        store.save_theme(self.user_id, theme).await?;
        self.theme = theme;
        self.apply();
        Ok(())
    }

    pub fn apply(&mut self) {
        self.classes = vec![self.theme.to_str()];
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn classes(&self) -> &[&'static str] {
        &self.classes
    }
}
