//! First-match resolution over the ordered, enabled plugin list.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, warn};

use {
    visage_common::{DisplayField, DisplayOptions, UserRecord, ViewContext},
    visage_registry::PluginRegistry,
};

use crate::{
    error::Result,
    format::NameFormatter,
    strategy::{DisplayStrategy, Resolution},
};

/// Walks the enabled plugins in registry order and returns the first decisive
/// answer for a field.
///
/// Earlier ranks are more authoritative: masking plugins sit in front of the
/// basic plugin so they can intercept a field or wave it through. A strategy
/// error is contained here and treated as a deferral; resolution itself never
/// fails on a plugin's behalf.
pub struct ResolutionChain {
    registry: Arc<PluginRegistry>,
    strategies: HashMap<String, Arc<dyn DisplayStrategy>>,
    /// Answers fields no enabled plugin claimed; usually the basic strategy.
    fallback: Option<Arc<dyn DisplayStrategy>>,
    /// Produces the built-in default full name when the chain is exhausted.
    formatter: Arc<NameFormatter>,
}

impl ResolutionChain {
    pub fn new(registry: Arc<PluginRegistry>, formatter: Arc<NameFormatter>) -> Self {
        Self {
            registry,
            strategies: HashMap::new(),
            fallback: None,
            formatter,
        }
    }

    /// Bind a strategy under its own name. The registry decides whether and
    /// when it runs.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn DisplayStrategy>) -> Self {
        self.strategies.insert(strategy.name().to_string(), strategy);
        self
    }

    /// Strategy of last resort once the chain is exhausted.
    #[must_use]
    pub fn with_fallback(mut self, strategy: Arc<dyn DisplayStrategy>) -> Self {
        self.fallback = Some(strategy);
        self
    }

    /// Resolve one display field for a user in a viewing context.
    pub async fn resolve(
        &self,
        field: DisplayField,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<String> {
        for entry in self.registry.list_enabled_in_order().await? {
            let Some(strategy) = self.strategies.get(&entry.name) else {
                debug!(plugin = %entry.name, "enabled plugin has no bound strategy, skipping");
                continue;
            };
            match strategy.resolve_field(field, user, context, options) {
                Ok(Resolution::Value(value)) => {
                    debug!(plugin = %entry.name, %field, "field resolved");
                    return Ok(value);
                },
                Ok(Resolution::Defer) => {},
                Err(error) => {
                    warn!(plugin = %entry.name, %field, %error, "display strategy failed, deferring");
                },
            }
        }
        Ok(self.default_value(field, user, context, options))
    }

    /// Built-in defaults when every plugin deferred: the formatter for the
    /// full name, the fallback strategy for everything else.
    fn default_value(
        &self,
        field: DisplayField,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> String {
        if field == DisplayField::FullName {
            return self.formatter.format_full_name(user, false);
        }
        if let Some(fallback) = &self.fallback
            && let Ok(Resolution::Value(value)) =
                fallback.resolve_field(field, user, context, options)
        {
            return value;
        }
        String::new()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            basic::BasicStrategy,
            disguise::{DisguiseStrategy, StaticMask},
            error::Error,
            render::{AvatarUrlRenderer, UrlBuilder},
        },
        visage_common::DisguiseState,
        visage_registry::{MemoryPluginStore, PluginRegistry},
    };

    struct CannedStrategy {
        strategy_name: &'static str,
        answer: Resolution,
    }

    impl DisplayStrategy for CannedStrategy {
        fn name(&self) -> &str {
            self.strategy_name
        }

        fn full_name(
            &self,
            _user: &UserRecord,
            _context: Option<&ViewContext>,
            _options: &DisplayOptions,
        ) -> Result<Resolution> {
            Ok(self.answer.clone())
        }
    }

    struct FailingStrategy;

    impl DisplayStrategy for FailingStrategy {
        fn name(&self) -> &str {
            "failing"
        }

        fn full_name(
            &self,
            _user: &UserRecord,
            _context: Option<&ViewContext>,
            _options: &DisplayOptions,
        ) -> Result<Resolution> {
            Err(Error::ContextUnavailable)
        }
    }

    async fn registry_with(plugins: &[&str]) -> Arc<PluginRegistry> {
        let registry = PluginRegistry::new(Arc::new(MemoryPluginStore::new()));
        for plugin in plugins {
            registry.register_if_absent(plugin).await.unwrap();
        }
        Arc::new(registry)
    }

    fn jane() -> UserRecord {
        UserRecord::named(7, "Jane", "Kirk")
    }

    #[tokio::test]
    async fn first_decisive_answer_wins() {
        let registry = registry_with(&["a", "b"]).await;
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "a",
                answer: Resolution::Defer,
            }))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "b",
                answer: Resolution::value("Bob"),
            }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "Bob");
    }

    #[tokio::test]
    async fn disabled_plugin_is_not_consulted() {
        let registry = registry_with(&["a", "b"]).await;
        registry.disable("a").await.unwrap();
        let chain = ResolutionChain::new(
            Arc::clone(&registry),
            Arc::new(NameFormatter::unconfigured()),
        )
        .with_strategy(Arc::new(CannedStrategy {
            strategy_name: "a",
            answer: Resolution::value("From A"),
        }))
        .with_strategy(Arc::new(CannedStrategy {
            strategy_name: "b",
            answer: Resolution::value("From B"),
        }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "From B");
    }

    #[tokio::test]
    async fn reordering_changes_the_winner() {
        let registry = registry_with(&["a", "b"]).await;
        let chain = ResolutionChain::new(
            Arc::clone(&registry),
            Arc::new(NameFormatter::unconfigured()),
        )
        .with_strategy(Arc::new(CannedStrategy {
            strategy_name: "a",
            answer: Resolution::value("From A"),
        }))
        .with_strategy(Arc::new(CannedStrategy {
            strategy_name: "b",
            answer: Resolution::value("From B"),
        }));

        let user = jane();
        let options = DisplayOptions::new();
        let before = chain
            .resolve(DisplayField::FullName, &user, None, &options)
            .await
            .unwrap();
        assert_eq!(before, "From A");

        registry.move_up("b").await.unwrap();
        let after = chain
            .resolve(DisplayField::FullName, &user, None, &options)
            .await
            .unwrap();
        assert_eq!(after, "From B");
    }

    #[tokio::test]
    async fn strategy_failure_is_contained_as_deferral() {
        let registry = registry_with(&["failing", "b"]).await;
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(FailingStrategy))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "b",
                answer: Resolution::value("Bob"),
            }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "Bob");
    }

    #[tokio::test]
    async fn decisive_empty_value_stops_the_chain() {
        let registry = registry_with(&["a", "b"]).await;
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "a",
                answer: Resolution::value(""),
            }))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "b",
                answer: Resolution::value("never reached"),
            }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "");
    }

    #[tokio::test]
    async fn exhausted_chain_formats_the_default_full_name() {
        let registry = registry_with(&["a"]).await;
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "a",
                answer: Resolution::Defer,
            }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "Jane Kirk");
    }

    #[tokio::test]
    async fn exhausted_chain_uses_the_fallback_for_other_fields() {
        let registry = registry_with(&[]).await;
        let urls = UrlBuilder::new("http://visage.test").unwrap();
        let basic = BasicStrategy::new(
            Arc::new(NameFormatter::unconfigured()),
            Arc::new(urls.clone()),
            Arc::new(AvatarUrlRenderer::new(urls)),
        );
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_fallback(Arc::new(basic));

        let user = UserRecord {
            email: Some("jane@example.test".into()),
            ..jane()
        };
        let email = chain
            .resolve(DisplayField::UserEmail, &user, None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(email, "jane@example.test");

        // Without a fallback the non-name fields default to empty.
        let registry = registry_with(&[]).await;
        let bare = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()));
        let ip = bare
            .resolve(DisplayField::IpAddress, &user, None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(ip, "");
    }

    #[tokio::test]
    async fn disguise_before_basic_intercepts_profile_url() {
        let registry = registry_with(&["disguise", "basic"]).await;
        let urls = Arc::new(UrlBuilder::new("http://visage.test").unwrap());
        let basic = BasicStrategy::new(
            Arc::new(NameFormatter::unconfigured()),
            Arc::clone(&urls),
            Arc::new(AvatarUrlRenderer::new(UrlBuilder::new("http://visage.test").unwrap())),
        );
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(DisguiseStrategy::new(Arc::clone(&urls), 1)))
            .with_strategy(Arc::new(basic));

        let context = ViewContext::course(42)
            .with_disguise(DisguiseState::Own(Arc::new(StaticMask::new("Participant"))));
        let user = jane();
        let options = DisplayOptions::new();

        let url = chain
            .resolve(DisplayField::ProfileUrl, &user, Some(&context), &options)
            .await
            .unwrap();
        assert_eq!(url, "http://visage.test/user/view?id=1");

        let name = chain
            .resolve(DisplayField::FullName, &user, Some(&context), &options)
            .await
            .unwrap();
        assert_eq!(name, "Participant");

        // Fields the disguise waves through reach the basic plugin.
        let ip_user = UserRecord {
            lastip: Some("198.51.100.7".into()),
            ..jane()
        };
        let ip = chain
            .resolve(DisplayField::IpAddress, &ip_user, Some(&context), &options)
            .await
            .unwrap();
        assert_eq!(ip, "198.51.100.7");
    }

    #[tokio::test]
    async fn enabled_plugin_without_strategy_is_skipped() {
        let registry = registry_with(&["ghost", "b"]).await;
        let chain = ResolutionChain::new(registry, Arc::new(NameFormatter::unconfigured()))
            .with_strategy(Arc::new(CannedStrategy {
                strategy_name: "b",
                answer: Resolution::value("Bob"),
            }));

        let name = chain
            .resolve(DisplayField::FullName, &jane(), None, &DisplayOptions::new())
            .await
            .unwrap();
        assert_eq!(name, "Bob");
    }
}
