//! The basic strategy: answers every field with the user's real data.
//!
//! Typically ranked last so masking plugins in front of it can intercept.

use std::sync::Arc;

use visage_common::{ContextScope, DisplayOptions, UserRecord, ViewContext};

use crate::{
    PLUGIN_BASIC,
    error::Result,
    format::NameFormatter,
    render::{PictureRenderer, UrlBuilder},
    strategy::{DisplayStrategy, Resolution},
};

/// Option key: use the alternate (complete) full-name format.
pub const OPT_USE_ALTERNATE_FORMAT: &str = "use_alternate_format";

pub struct BasicStrategy {
    formatter: Arc<NameFormatter>,
    urls: Arc<UrlBuilder>,
    pictures: Arc<dyn PictureRenderer>,
}

impl BasicStrategy {
    pub fn new(
        formatter: Arc<NameFormatter>,
        urls: Arc<UrlBuilder>,
        pictures: Arc<dyn PictureRenderer>,
    ) -> Self {
        Self {
            formatter,
            urls,
            pictures,
        }
    }
}

impl DisplayStrategy for BasicStrategy {
    fn name(&self) -> &str {
        PLUGIN_BASIC
    }

    fn full_name(
        &self,
        user: &UserRecord,
        _context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let use_alternate = options.flag(OPT_USE_ALTERNATE_FORMAT);
        Ok(Resolution::Value(
            self.formatter.format_full_name(user, use_alternate),
        ))
    }

    fn profile_url(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        _options: &DisplayOptions,
    ) -> Result<Resolution> {
        // No id, no linkable profile.
        let Some(id) = user.id else {
            return Ok(Resolution::Defer);
        };
        let mut params = vec![("id", id.to_string())];
        if let Some(ViewContext {
            scope: ContextScope::Course { id: course_id },
            ..
        }) = context
        {
            params.push(("courseid", course_id.to_string()));
        }
        Ok(Resolution::Value(self.urls.build("/user/view", &params)))
    }

    fn profile_picture(
        &self,
        user: &UserRecord,
        _context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        Ok(Resolution::Value(self.pictures.render(user, options)))
    }

    fn user_id(
        &self,
        user: &UserRecord,
        _context: Option<&ViewContext>,
        _options: &DisplayOptions,
    ) -> Result<Resolution> {
        let id = user.id.map(|id| id.to_string()).unwrap_or_default();
        Ok(Resolution::Value(id))
    }

    fn user_email(
        &self,
        user: &UserRecord,
        _context: Option<&ViewContext>,
        _options: &DisplayOptions,
    ) -> Result<Resolution> {
        Ok(Resolution::Value(user.email.clone().unwrap_or_default()))
    }

    fn ip_address(
        &self,
        user: &UserRecord,
        _context: Option<&ViewContext>,
        _options: &DisplayOptions,
    ) -> Result<Resolution> {
        Ok(Resolution::Value(user.lastip.clone().unwrap_or_default()))
    }
}
