//! Localized short text (one translation per supported locale).
//!
//! The set of locales is closed: every [`LocalizedText`] carries exactly one
//! value for each [`Locale`]. Values are not validated at construction time;
//! callers run [`LocalizedText::validate`] (or the individual predicates) when
//! they need to enforce rules.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Supported locales.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    It,
    En,
    De,
    Fr,
    Es,
}

impl Locale {
    /// Every supported locale, in serialization order.
    pub const ALL: [Locale; 5] = [Locale::It, Locale::En, Locale::De, Locale::Fr, Locale::Es];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::It => "it",
            Locale::En => "en",
            Locale::De => "de",
            Locale::Fr => "fr",
            Locale::Es => "es",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Locale::ALL
            .into_iter()
            .find(|locale| locale.as_str() == code)
            .ok_or_else(|| DomainError::validation(format!("unsupported locale: {s:?}")))
    }
}

/// A short text translated into every [`Locale`].
///
/// Serializes as `{"it": .., "en": .., "de": .., "fr": .., "es": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalizedText {
    it: String,
    en: String,
    de: String,
    fr: String,
    es: String,
}

impl LocalizedText {
    pub fn new(
        it: impl Into<String>,
        en: impl Into<String>,
        de: impl Into<String>,
        fr: impl Into<String>,
        es: impl Into<String>,
    ) -> Self {
        Self {
            it: it.into(),
            en: en.into(),
            de: de.into(),
            fr: fr.into(),
            es: es.into(),
        }
    }

    /// Same text for every locale (useful for proper nouns).
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text.clone(), text.clone(), text.clone(), text)
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::It => &self.it,
            Locale::En => &self.en,
            Locale::De => &self.de,
            Locale::Fr => &self.fr,
            Locale::Es => &self.es,
        }
    }

    /// Iterate over `(locale, text)` pairs in [`Locale::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Locale, &str)> + '_ {
        Locale::ALL.into_iter().map(move |locale| (locale, self.get(locale)))
    }

    /// True when every translation is at most `max_len` characters long.
    ///
    /// Length is counted in Unicode scalar values, not bytes.
    pub fn all_within_length(&self, max_len: usize) -> bool {
        self.iter().all(|(_, text)| text.chars().count() <= max_len)
    }

    /// True when at least one translation is the empty string.
    pub fn any_empty(&self) -> bool {
        self.iter().any(|(_, text)| text.is_empty())
    }

    /// Enforce "every locale filled in, none longer than `max_len`".
    ///
    /// `field` names the input the text came from and ends up in the error.
    pub fn validate(&self, field: &str, max_len: usize) -> DomainResult<()> {
        if let Some((locale, _)) = self.iter().find(|(_, text)| text.is_empty()) {
            return Err(DomainError::required(format!("{field}.{locale}")));
        }

        if let Some((locale, _)) = self
            .iter()
            .find(|(_, text)| text.chars().count() > max_len)
        {
            return Err(DomainError::invalid_argument(
                format!("{field}.{locale}"),
                format!("must be at most {max_len} characters"),
            ));
        }

        Ok(())
    }
}

impl ValueObject for LocalizedText {}
