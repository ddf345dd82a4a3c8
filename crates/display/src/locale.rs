//! Locale string collaborator.

use visage_common::UserRecord;

/// Resolves the fallback full-name template for a user's locale.
///
/// The returned string is an ordinary display-name template: name-field
/// tokens in it are expanded by the formatter like any configured template.
pub trait LocaleStrings: Send + Sync {
    fn fullname_template(&self, user: &UserRecord) -> String;
}

/// Western name order, the shipped default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultLocale;

impl LocaleStrings for DefaultLocale {
    fn fullname_template(&self, _user: &UserRecord) -> String {
        "firstname lastname".into()
    }
}

/// Eastern name order (family name first), e.g. for ja/zh/ko locales.
#[derive(Debug, Default, Clone, Copy)]
pub struct FamilyNameFirstLocale;

impl LocaleStrings for FamilyNameFirstLocale {
    fn fullname_template(&self, _user: &UserRecord) -> String {
        "lastname firstname".into()
    }
}
