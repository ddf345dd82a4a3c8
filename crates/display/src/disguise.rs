//! The disguise strategy: masks identity fields when the viewing context has
//! an active disguise policy, and defers on everything else.

use std::sync::Arc;

use visage_common::{DisguisePolicy, DisplayOptions, UserRecord, ViewContext};

use crate::{
    PLUGIN_DISGUISE,
    error::Result,
    render::UrlBuilder,
    strategy::{DisplayStrategy, Resolution},
};

pub struct DisguiseStrategy {
    urls: Arc<UrlBuilder>,
    /// Stand-in user substituted when profile links are forbidden.
    anonymous_id: i64,
}

impl DisguiseStrategy {
    pub fn new(urls: Arc<UrlBuilder>, anonymous_id: i64) -> Self {
        Self { urls, anonymous_id }
    }
}

impl DisplayStrategy for DisguiseStrategy {
    fn name(&self) -> &str {
        PLUGIN_DISGUISE
    }

    fn full_name(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let Some(context) = context else {
            return Ok(Resolution::Defer);
        };
        // The disguise configuration page must keep showing real names.
        if context.disguise_config_page {
            return Ok(Resolution::Defer);
        }
        match context.disguise.policy() {
            Some(policy) => Ok(Resolution::Value(policy.display_name(user, options))),
            None => Ok(Resolution::Defer),
        }
    }

    fn profile_url(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let Some(context) = context else {
            return Ok(Resolution::Defer);
        };
        if let Some(policy) = context.disguise.policy()
            && !policy.allow_profile_links(user, options)
        {
            let url = self
                .urls
                .build("/user/view", &[("id", self.anonymous_id.to_string())]);
            return Ok(Resolution::Value(url));
        }
        Ok(Resolution::Defer)
    }

    fn user_id(
        &self,
        _user: &UserRecord,
        context: Option<&ViewContext>,
        _options: &DisplayOptions,
    ) -> Result<Resolution> {
        let Some(context) = context else {
            return Ok(Resolution::Defer);
        };
        if context.disguise.is_active() {
            return Ok(Resolution::Value(self.anonymous_id.to_string()));
        }
        Ok(Resolution::Defer)
    }
}

/// A fixed-name policy: every user renders under the same mask and profile
/// links are forbidden. The simplest useful [`DisguisePolicy`], also handy in
/// tests.
pub struct StaticMask {
    mask: String,
}

impl StaticMask {
    pub fn new(mask: impl Into<String>) -> Self {
        Self { mask: mask.into() }
    }
}

impl DisguisePolicy for StaticMask {
    fn display_name(&self, _user: &UserRecord, _options: &DisplayOptions) -> String {
        self.mask.clone()
    }

    fn allow_profile_links(&self, _user: &UserRecord, _options: &DisplayOptions) -> bool {
        false
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, visage_common::DisguiseState};

    fn strategy() -> DisguiseStrategy {
        DisguiseStrategy::new(Arc::new(UrlBuilder::new("http://visage.test").unwrap()), 1)
    }

    fn masked_context() -> ViewContext {
        ViewContext::course(42).with_disguise(DisguiseState::Own(Arc::new(StaticMask::new(
            "Participant",
        ))))
    }

    fn jane() -> UserRecord {
        UserRecord::named(7, "Jane", "Kirk")
    }

    #[test]
    fn masks_full_name_under_active_disguise() {
        let resolution = strategy()
            .full_name(&jane(), Some(&masked_context()), &DisplayOptions::new())
            .unwrap();
        assert_eq!(resolution, Resolution::value("Participant"));
    }

    #[test]
    fn defers_without_context_or_policy() {
        let strategy = strategy();
        let options = DisplayOptions::new();
        assert!(strategy.full_name(&jane(), None, &options).unwrap().is_defer());
        assert!(
            strategy
                .full_name(&jane(), Some(&ViewContext::site()), &options)
                .unwrap()
                .is_defer()
        );
    }

    #[test]
    fn defers_on_the_disguise_configuration_page() {
        let context = masked_context().on_disguise_config_page();
        let resolution = strategy()
            .full_name(&jane(), Some(&context), &DisplayOptions::new())
            .unwrap();
        assert!(resolution.is_defer());
    }

    #[test]
    fn substitutes_anonymous_profile_url_when_links_forbidden() {
        let resolution = strategy()
            .profile_url(&jane(), Some(&masked_context()), &DisplayOptions::new())
            .unwrap();
        assert_eq!(
            resolution,
            Resolution::value("http://visage.test/user/view?id=1")
        );
    }

    #[test]
    fn masks_user_id_and_defers_on_unhandled_fields() {
        let strategy = strategy();
        let context = masked_context();
        let options = DisplayOptions::new();

        assert_eq!(
            strategy.user_id(&jane(), Some(&context), &options).unwrap(),
            Resolution::value("1")
        );
        // Fields the disguise has no opinion on pass through.
        assert!(
            strategy
                .user_email(&jane(), Some(&context), &options)
                .unwrap()
                .is_defer()
        );
        assert!(
            strategy
                .ip_address(&jane(), Some(&context), &options)
                .unwrap()
                .is_defer()
        );
    }

    #[test]
    fn inherited_disguise_masks_like_own() {
        let context = ViewContext::site()
            .with_disguise(DisguiseState::Inherited(Arc::new(StaticMask::new("Anon"))));
        let resolution = strategy()
            .full_name(&jane(), Some(&context), &DisplayOptions::new())
            .unwrap();
        assert_eq!(resolution, Resolution::value("Anon"));
    }
}
