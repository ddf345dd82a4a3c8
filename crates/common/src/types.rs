//! Core domain types for identity display.
//!
//! A [`UserRecord`] is the caller-owned bag of user attributes, a
//! [`ViewContext`] describes where the user is being looked at (site-wide or
//! inside a course, possibly under an active disguise policy), and
//! [`DisplayOptions`] carries per-call formatting knobs.

use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

// ── NameField ───────────────────────────────────────────────────────────────

/// The name attributes a display-name template may reference by literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameField {
    Firstname,
    Lastname,
    Middlename,
    Alternatename,
    Firstnamephonetic,
    Lastnamephonetic,
}

impl NameField {
    /// All variants, for iteration.
    pub const ALL: &'static [NameField] = &[
        Self::Firstname,
        Self::Lastname,
        Self::Middlename,
        Self::Alternatename,
        Self::Firstnamephonetic,
        Self::Lastnamephonetic,
    ];

    /// Inverse of [`NameField::token`].
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.token() == token)
    }

    /// The literal token this field uses inside a template string.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Firstname => "firstname",
            Self::Lastname => "lastname",
            Self::Middlename => "middlename",
            Self::Alternatename => "alternatename",
            Self::Firstnamephonetic => "firstnamephonetic",
            Self::Lastnamephonetic => "lastnamephonetic",
        }
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ── DisplayField ────────────────────────────────────────────────────────────

/// The fixed set of display fields a strategy can be asked to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayField {
    FullName,
    ProfileUrl,
    ProfilePicture,
    UserId,
    UserEmail,
    IpAddress,
}

impl DisplayField {
    /// All variants, for iteration.
    pub const ALL: &'static [DisplayField] = &[
        Self::FullName,
        Self::ProfileUrl,
        Self::ProfilePicture,
        Self::UserId,
        Self::UserEmail,
        Self::IpAddress,
    ];
}

impl fmt::Display for DisplayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FullName => "full_name",
            Self::ProfileUrl => "profile_url",
            Self::ProfilePicture => "profile_picture",
            Self::UserId => "user_id",
            Self::UserEmail => "user_email",
            Self::IpAddress => "ip_address",
        };
        f.write_str(s)
    }
}

// ── UserRecord ──────────────────────────────────────────────────────────────

/// A user as handed to the display pipeline.
///
/// Every attribute is optional: callers pass whatever their query selected,
/// and absence is a first-class state. Use [`UserRecord::name_field`] instead
/// of poking at individual fields when handling template tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub middlename: Option<String>,
    pub alternatename: Option<String>,
    pub firstnamephonetic: Option<String>,
    pub lastnamephonetic: Option<String>,
    pub email: Option<String>,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub institution: Option<String>,
    pub department: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub firstaccess: Option<i64>,
    pub lastaccess: Option<i64>,
    pub lastlogin: Option<i64>,
    pub currentlogin: Option<i64>,
    pub lastip: Option<String>,
}

impl UserRecord {
    /// Minimal record with just an id and first/last name, mostly for tests
    /// and the anonymous stand-in user.
    #[must_use]
    pub fn named(id: i64, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            firstname: Some(firstname.into()),
            lastname: Some(lastname.into()),
            ..Self::default()
        }
    }

    /// Explicit optional-field accessor for the template name fields.
    pub fn name_field(&self, field: NameField) -> Option<&str> {
        let value = match field {
            NameField::Firstname => &self.firstname,
            NameField::Lastname => &self.lastname,
            NameField::Middlename => &self.middlename,
            NameField::Alternatename => &self.alternatename,
            NameField::Firstnamephonetic => &self.firstnamephonetic,
            NameField::Lastnamephonetic => &self.lastnamephonetic,
        };
        value.as_deref()
    }
}

// ── DisplayOptions ──────────────────────────────────────────────────────────

/// Per-call formatting options: a string-keyed map of JSON values.
///
/// Strategies pick out the keys they understand and ignore the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayOptions(HashMap<String, serde_json::Value>);

impl DisplayOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// A boolean option; absent or non-boolean reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.0.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn str_opt(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(|v| v.as_i64())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ── Disguise ────────────────────────────────────────────────────────────────

/// A context-level policy that overrides or masks a user's displayed identity.
///
/// Implemented outside the core (e.g. by an anonymous-marking module) and
/// attached to the [`ViewContext`] the caller builds.
pub trait DisguisePolicy: Send + Sync {
    /// The masked display name for this user.
    fn display_name(&self, user: &UserRecord, options: &DisplayOptions) -> String;

    /// Whether links to the user's real profile may be shown.
    fn allow_profile_links(&self, user: &UserRecord, options: &DisplayOptions) -> bool;
}

/// Where the active disguise policy, if any, comes from.
#[derive(Clone, Default)]
pub enum DisguiseState {
    /// No disguise in effect.
    #[default]
    None,
    /// Policy inherited from an enclosing context.
    Inherited(Arc<dyn DisguisePolicy>),
    /// Policy declared by this context itself.
    Own(Arc<dyn DisguisePolicy>),
}

impl DisguiseState {
    /// The active policy regardless of provenance.
    pub fn policy(&self) -> Option<&Arc<dyn DisguisePolicy>> {
        match self {
            Self::None => None,
            Self::Inherited(policy) | Self::Own(policy) => Some(policy),
        }
    }

    pub fn is_active(&self) -> bool {
        self.policy().is_some()
    }
}

impl fmt::Debug for DisguiseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Inherited(_) => f.write_str("Inherited(..)"),
            Self::Own(_) => f.write_str("Own(..)"),
        }
    }
}

// ── ViewContext ─────────────────────────────────────────────────────────────

/// The scope a user is being viewed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextScope {
    #[default]
    Site,
    Course {
        id: i64,
    },
}

/// The viewing scope plus any active disguise policy. Caller-owned and
/// read-only to the display core.
#[derive(Debug, Clone, Default)]
pub struct ViewContext {
    pub scope: ContextScope,
    pub disguise: DisguiseState,
    /// True when the current page is the disguise configuration UI itself,
    /// where real identities must stay visible.
    pub disguise_config_page: bool,
}

impl ViewContext {
    #[must_use]
    pub fn site() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn course(id: i64) -> Self {
        Self {
            scope: ContextScope::Course { id },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_disguise(mut self, disguise: DisguiseState) -> Self {
        self.disguise = disguise;
        self
    }

    #[must_use]
    pub fn on_disguise_config_page(mut self) -> Self {
        self.disguise_config_page = true;
        self
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_field_accessor_mirrors_struct_fields() {
        let user = UserRecord {
            firstname: Some("Jane".into()),
            middlename: Some(String::new()),
            ..UserRecord::default()
        };
        assert_eq!(user.name_field(NameField::Firstname), Some("Jane"));
        assert_eq!(user.name_field(NameField::Middlename), Some(""));
        assert_eq!(user.name_field(NameField::Lastname), None);
    }

    #[test]
    fn all_name_tokens_are_distinct() {
        let mut tokens: Vec<_> = NameField::ALL.iter().map(NameField::token).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), NameField::ALL.len());
    }

    #[test]
    fn display_options_typed_getters() {
        let opts = DisplayOptions::new()
            .set("alternate", true)
            .set("size", 64)
            .set("style", "round");
        assert!(opts.flag("alternate"));
        assert!(!opts.flag("missing"));
        assert_eq!(opts.int("size"), Some(64));
        assert_eq!(opts.str_opt("style"), Some("round"));
    }

    #[test]
    fn display_field_serde_names() {
        let json = serde_json::to_string(&DisplayField::FullName).unwrap();
        assert_eq!(json, "\"full_name\"");
        let field: DisplayField = serde_json::from_str("\"profile_url\"").unwrap();
        assert_eq!(field, DisplayField::ProfileUrl);
    }

    struct MaskEveryone;

    impl DisguisePolicy for MaskEveryone {
        fn display_name(&self, _user: &UserRecord, _options: &DisplayOptions) -> String {
            "Anonymous".into()
        }

        fn allow_profile_links(&self, _user: &UserRecord, _options: &DisplayOptions) -> bool {
            false
        }
    }

    #[test]
    fn disguise_state_policy_lookup() {
        assert!(DisguiseState::None.policy().is_none());
        let own = DisguiseState::Own(Arc::new(MaskEveryone));
        assert!(own.is_active());
        let inherited = DisguiseState::Inherited(Arc::new(MaskEveryone));
        assert!(inherited.policy().is_some());
    }
}
