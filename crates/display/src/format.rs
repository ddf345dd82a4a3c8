//! Display-name template expansion.
//!
//! Templates reference name fields by literal token, e.g.
//! `"lastname, firstname"` or `"firstname 「alternatename」 lastname"`.
//! Tokens whose field is missing or empty leave no trace: the `EMPTY` marker
//! they expand to is stripped together with any punctuation hugging it.

use std::sync::Arc;

use {once_cell::sync::Lazy, regex::Regex};

use {
    visage_common::{NameField, UserRecord},
    visage_config::NameFormatConfig,
};

use crate::locale::{DefaultLocale, LocaleStrings};

/// Substituted for a referenced-but-missing field during expansion.
const EMPTY_MARKER: &str = "EMPTY";

/// All recognized tokens, longest first so `firstname` never matches inside
/// `firstnamephonetic`. One pass over the template, never over substituted
/// text, so a field value that happens to spell another token is left alone.
#[allow(clippy::expect_used)]
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    let mut tokens: Vec<&str> = NameField::ALL.iter().map(NameField::token).collect();
    tokens.sort_by_key(|t| std::cmp::Reverse(t.len()));
    Regex::new(&tokens.join("|")).expect("static token alternation")
});

/// The Japanese corner brackets are common enough in name templates to handle
/// explicitly; `[:punct:]` does not cover them.
#[allow(clippy::expect_used)]
static EMPTY_CLEANUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[[:punct:]「」]*EMPTY[[:punct:]「」]*").expect("static cleanup pattern"));

#[allow(clippy::expect_used)]
static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("static whitespace pattern"));

/// Expands display-name templates against a user record.
///
/// Pure function of its inputs plus the configuration captured at
/// construction; no ambient state.
pub struct NameFormatter {
    config: NameFormatConfig,
    locale: Arc<dyn LocaleStrings>,
}

impl NameFormatter {
    pub fn new(config: NameFormatConfig, locale: Arc<dyn LocaleStrings>) -> Self {
        Self { config, locale }
    }

    /// No overrides, no configured templates, default locale.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::new(NameFormatConfig::default(), Arc::new(DefaultLocale))
    }

    /// Format the user's full name.
    ///
    /// `use_alternate` selects the alternate (complete) template and skips
    /// the forced-name overrides; both template slots fall back to the locale
    /// template when unset.
    pub fn format_full_name(&self, user: &UserRecord, use_alternate: bool) -> String {
        if user.firstname.is_none() && user.lastname.is_none() {
            return String::new();
        }

        let template = self.select_template(user, use_alternate);

        let expanded = TOKEN_RE.replace_all(&template, |caps: &regex::Captures<'_>| {
            let token = &caps[0];
            let Some(field) = NameField::from_token(token) else {
                return token.to_string();
            };
            match self.field_value(user, field, use_alternate) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => EMPTY_MARKER.to_string(),
            }
        });

        let cleaned = EMPTY_CLEANUP_RE.replace_all(&expanded, " ");
        let collapsed = MULTI_SPACE_RE.replace_all(&cleaned, " ");
        let display = collapsed.trim();
        if display.is_empty() {
            // Nothing the template asked for was filled in; fall back to the
            // bare firstname.
            return user.firstname.clone().unwrap_or_default();
        }
        display.to_string()
    }

    fn select_template(&self, user: &UserRecord, use_alternate: bool) -> String {
        let configured = if use_alternate {
            &self.config.alternate_fullname_template
        } else {
            &self.config.fullname_template
        };
        configured
            .clone()
            .unwrap_or_else(|| self.locale.fullname_template(user))
    }

    /// Forced overrides apply on the default-format path only.
    fn field_value<'a>(
        &'a self,
        user: &'a UserRecord,
        field: NameField,
        use_alternate: bool,
    ) -> Option<&'a str> {
        if !use_alternate {
            match field {
                NameField::Firstname if self.config.force_firstname.is_some() => {
                    return self.config.force_firstname.as_deref();
                },
                NameField::Lastname if self.config.force_lastname.is_some() => {
                    return self.config.force_lastname.as_deref();
                },
                _ => {},
            }
        }
        user.name_field(field)
    }
}
