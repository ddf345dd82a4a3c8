//! The contract every display plugin implements.

use visage_common::{DisplayField, DisplayOptions, UserRecord, ViewContext};

use crate::error::Result;

/// A strategy's answer for one field.
///
/// Deferral is explicit rather than an overloaded empty string: `Value("")`
/// is a decisive answer (e.g. a user with a genuinely blank email) and stops
/// the chain, while `Defer` always passes the question along. An `Err` from a
/// strategy is an internal failure; the chain logs it and treats it as a
/// deferral.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Value(String),
    Defer,
}

impl Resolution {
    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    pub fn is_defer(&self) -> bool {
        matches!(self, Self::Defer)
    }
}

/// One display plugin: asked per field, in registry order, until one answers.
///
/// Every method defaults to deferral so a plugin only implements the fields
/// it wants to intercept.
pub trait DisplayStrategy: Send + Sync {
    /// Name under which the plugin is tracked in the registry.
    fn name(&self) -> &str;

    fn full_name(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    fn profile_url(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    fn profile_picture(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    fn user_id(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    fn user_email(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    fn ip_address(
        &self,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        let _ = (user, context, options);
        Ok(Resolution::Defer)
    }

    /// Dispatch by field enum; this is what the chain calls.
    fn resolve_field(
        &self,
        field: DisplayField,
        user: &UserRecord,
        context: Option<&ViewContext>,
        options: &DisplayOptions,
    ) -> Result<Resolution> {
        match field {
            DisplayField::FullName => self.full_name(user, context, options),
            DisplayField::ProfileUrl => self.profile_url(user, context, options),
            DisplayField::ProfilePicture => self.profile_picture(user, context, options),
            DisplayField::UserId => self.user_id(user, context, options),
            DisplayField::UserEmail => self.user_email(user, context, options),
            DisplayField::IpAddress => self.ip_address(user, context, options),
        }
    }
}
