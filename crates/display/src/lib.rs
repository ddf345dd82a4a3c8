//! Identity display: name formatting, display strategies, and the resolution
//! chain that walks them.
//!
//! A caller asks the [`chain::ResolutionChain`] for one [`DisplayField`] of a
//! user in a [`ViewContext`]; the chain consults the enabled plugins in
//! registry order and the first decisive answer wins.
//!
//! [`DisplayField`]: visage_common::DisplayField
//! [`ViewContext`]: visage_common::ViewContext

pub mod basic;
pub mod chain;
pub mod disguise;
pub mod error;
pub mod format;
pub mod locale;
pub mod render;
pub mod strategy;

pub use {
    basic::BasicStrategy,
    chain::ResolutionChain,
    disguise::{DisguiseStrategy, StaticMask},
    error::{Error, Result},
    format::NameFormatter,
    locale::{DefaultLocale, LocaleStrings},
    render::{AvatarUrlRenderer, PictureRenderer, UrlBuilder},
    strategy::{DisplayStrategy, Resolution},
};

/// Plugin name the chain binds [`BasicStrategy`] under.
pub const PLUGIN_BASIC: &str = "basic";
/// Plugin name the chain binds [`DisguiseStrategy`] under.
pub const PLUGIN_DISGUISE: &str = "disguise";
