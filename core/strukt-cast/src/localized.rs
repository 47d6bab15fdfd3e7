//! Locale-suffixed attribute lookup.
//!
//! Localized attributes are stored under suffixed keys (`title_nb_NO`,
//! `title_nb`, `title`). A read of `title` tries the active locale, its
//! language, the fallback locale and its language, then the bare key.

use serde_json::{Map, Value};
use strukt_model::{coerce, Record};
use strukt_types::{Locale, LocaleConfig};

/// Keys read without fallback-locale candidates by default.
pub const DEFAULT_RESERVED_KEYS: &[&str] = &["name"];

/// Returns the candidate keys for `key`, most specific first.
///
/// Reserved keys skip the fallback-locale candidates.
pub fn candidate_keys(key: &str, locale: &LocaleConfig, reserved: bool) -> Vec<String> {
    let mut keys = Vec::with_capacity(5);
    let mut push = |candidate: String| {
        if !keys.contains(&candidate) {
            keys.push(candidate);
        }
    };

    push(format!("{key}_{}", locale.locale));
    push(format!("{key}_{}", locale.locale.language()));
    if locale.has_distinct_fallback() && !reserved {
        push(format!("{key}_{}", locale.fallback_locale));
        push(format!("{key}_{}", locale.fallback_locale.language()));
    }
    push(key.to_string());
    keys
}

fn lookup<'a>(
    attributes: &'a Map<String, Value>,
    key: &str,
    locale: &LocaleConfig,
    reserved: bool,
) -> LocalizedValue<'a> {
    let found = candidate_keys(key, locale, reserved)
        .iter()
        .filter_map(|candidate| attributes.get(candidate))
        .find(|value| !coerce::is_blank(value))
        .or_else(|| attributes.get(key));

    match found {
        None => LocalizedValue::Missing,
        Some(raw @ Value::Array(items)) => LocalizedValue::List {
            raw,
            items: items
                .iter()
                .map(|item| match item {
                    Value::Object(object) => LocalizedItem::View(LocalizedView {
                        attributes: object,
                        locale: locale.clone(),
                    }),
                    other => LocalizedItem::Raw(other),
                })
                .collect(),
        },
        Some(raw) => LocalizedValue::Raw(raw),
    }
}

/// Resolves localized attribute reads for one locale configuration.
#[derive(Debug, Clone)]
pub struct LocalizedAttributeResolver {
    locale: LocaleConfig,
    reserved_keys: Vec<String>,
}

impl LocalizedAttributeResolver {
    /// A resolver with the default reserved keys.
    pub fn new(locale: LocaleConfig) -> Self {
        Self {
            locale,
            reserved_keys: DEFAULT_RESERVED_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Replaces the reserved key set.
    #[must_use]
    pub fn with_reserved_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a resolver reading in `locale` regardless of the ambient one.
    #[must_use]
    pub fn forced(&self, locale: Locale) -> Self {
        Self {
            locale: self.locale.with_locale(locale),
            reserved_keys: self.reserved_keys.clone(),
        }
    }

    pub fn locale(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        self.reserved_keys.iter().any(|k| k == key)
    }

    /// The keys tried, in order, when reading `key`.
    pub fn candidate_keys(&self, key: &str) -> Vec<String> {
        candidate_keys(key, &self.locale, self.is_reserved(key))
    }

    /// Reads `key` from an attribute map.
    ///
    /// The first candidate holding a non-blank value wins; with none, the
    /// bare key's value is returned even if blank.
    pub fn resolve<'a>(&self, attributes: &'a Map<String, Value>, key: &str) -> LocalizedValue<'a> {
        lookup(attributes, key, &self.locale, self.is_reserved(key))
    }

    /// Reads `key` from a record's raw attributes.
    pub fn resolve_record<'a>(&self, record: &'a Record, key: &str) -> LocalizedValue<'a> {
        self.resolve(record.attributes(), key)
    }
}

/// The outcome of a localized read.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalizedValue<'a> {
    /// No candidate key exists.
    Missing,
    /// A non-list value.
    Raw(&'a Value),
    /// A list; object elements are wrapped in [`LocalizedView`]s.
    List {
        raw: &'a Value,
        items: Vec<LocalizedItem<'a>>,
    },
}

impl<'a> LocalizedValue<'a> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The underlying raw value, lists included.
    pub fn raw(&self) -> Option<&'a Value> {
        match self {
            Self::Missing => None,
            Self::Raw(raw) | Self::List { raw, .. } => Some(*raw),
        }
    }

    pub fn items(&self) -> &[LocalizedItem<'a>] {
        match self {
            Self::List { items, .. } => items,
            _ => &[],
        }
    }

    /// An owned copy of the raw value (`null` when missing).
    pub fn to_value(&self) -> Value {
        self.raw().cloned().unwrap_or(Value::Null)
    }
}

/// One element of a localized list.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalizedItem<'a> {
    View(LocalizedView<'a>),
    Raw(&'a Value),
}

impl<'a> LocalizedItem<'a> {
    pub fn as_view(&self) -> Option<&LocalizedView<'a>> {
        match self {
            Self::View(view) => Some(view),
            Self::Raw(_) => None,
        }
    }
}

/// A borrowed object inside a localized list whose reads are localized too.
///
/// Views never treat keys as reserved, so `name` inside a view falls back
/// through the fallback locale like any other key.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedView<'a> {
    attributes: &'a Map<String, Value>,
    locale: LocaleConfig,
}

impl<'a> LocalizedView<'a> {
    /// Reads `key` through the locale chain.
    pub fn get(&self, key: &str) -> LocalizedValue<'a> {
        lookup(self.attributes, key, &self.locale, false)
    }

    /// Reads `key` without localization.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.attributes.get(key)
    }

    pub fn attributes(&self) -> &'a Map<String, Value> {
        self.attributes
    }
}
