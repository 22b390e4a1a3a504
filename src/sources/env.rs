use std::{env, sync::Arc};

use tracing::debug;

use crate::{
    Item, Store,
    providers::{InMemoryProvider, ProviderKind},
};

/// Normalizes variable names and prefixes before they are compared.
pub type KeyTransform = fn(&str) -> String;

const PREFIX_SEPARATOR: char = '_';

/// The default key transform: ASCII lower-case, `_` replaced by `-`.
///
/// `APP_DATABASE_URL` becomes `app-database-url`, so environment overrides
/// line up with kebab-case keys written in files.
pub fn transform_key(key: &str) -> String {
    key.to_ascii_lowercase().replace('_', "-")
}

/// A transform that keeps names unchanged.
pub fn identity_key(key: &str) -> String {
    key.to_string()
}

/// Turns environment variables matching `prefix` into items.
///
/// A non-empty prefix gets a trailing `_` if it lacks one. The prefix and
/// every variable name pass through `transform`; names whose transformed form
/// starts with the transformed prefix become items keyed by the remainder.
/// An empty prefix matches every variable.
pub fn env_items<I, K, V>(
    prefix: &str,
    vars: I,
    transform: KeyTransform,
    priority: i64,
) -> Vec<Item>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let prefix = transform(&with_separator(prefix));

    vars.into_iter()
        .filter_map(|(name, value)| {
            let key = transform(name.as_ref());
            key.strip_prefix(prefix.as_str())
                .map(|rest| Item::new(rest, value, priority))
        })
        .collect()
}

fn with_separator(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with(PREFIX_SEPARATOR) {
        prefix.to_string()
    } else {
        format!("{prefix}{PREFIX_SEPARATOR}")
    }
}

fn env_label(prefix: &str) -> String {
    let label = with_separator(prefix).to_uppercase();
    if label.is_empty() {
        "all".to_string()
    } else {
        label
    }
}

impl Store {
    /// Imports environment variables starting with `prefix`, using
    /// [`transform_key`].
    ///
    /// Registered as `env:<PREFIX_>`, or `env:all` for an empty prefix. The
    /// environment is read once; later changes are not picked up.
    pub fn add_env(&self, prefix: &str) {
        self.add_env_with(prefix, transform_key);
    }

    /// Like [`Store::add_env`] with a caller-supplied key transform.
    pub fn add_env_with(&self, prefix: &str, transform: KeyTransform) {
        let name = format!("env:{}", env_label(prefix));

        // Variables that are not valid UTF-8 cannot become items.
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        let items = env_items(prefix, vars, transform, self.options().env_priority);
        debug!(provider = %name, items = items.len(), "imported environment");

        let backing = InMemoryProvider::new();
        backing.add(items);
        self.register_with_kind(name, ProviderKind::Env, Arc::new(backing));
    }
}
