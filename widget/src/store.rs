// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use crate::error::{StoreError, UnknownKey};
use rust_embed::RustEmbed;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Translations shipped with the widget, one `<locale>.ron` file per locale.
#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

type Table = HashMap<String, HashMap<String, String>>;

/// Localized text for every key, per locale.
///
/// Every key has text for the fallback locale. A store is never mutated once
/// loaded; swap in a new one to reload translations.
#[derive(Debug)]
pub struct Store {
    fallback: String,
    table: Table,
}

impl Store {
    /// Parses a resource mapping each key to its per-locale text.
    ///
    /// ```ron
    /// {
    ///     "btn.check": { "en": "Check for updates", "fr": "Vérifier les mises à jour" },
    /// }
    /// ```
    pub fn load(resource: &str, fallback: &str) -> Result<Self, StoreError> {
        let table: Table = parse("translation table", resource)?;
        Self::validate(table, fallback)
    }

    /// Builds a store from one resource per locale, each mapping keys to text.
    pub fn from_locales<'a, I>(fallback: &str, resources: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut table = Table::new();
        let mut has_fallback = false;

        for (locale, resource) in resources {
            let strings: HashMap<String, String> = parse(locale, resource)?;
            has_fallback |= locale == fallback;

            for (key, text) in strings {
                table
                    .entry(key)
                    .or_default()
                    .insert(locale.to_owned(), text);
            }
        }

        if !has_fallback {
            return Err(StoreError::MissingFallbackResource(fallback.to_owned()));
        }

        Self::validate(table, fallback)
    }

    /// Builds a store from the translations embedded in the library.
    pub fn bundled(fallback: &str) -> Result<Self, StoreError> {
        let mut resources = Vec::new();

        for file in Localizations::iter() {
            let locale = match file.strip_suffix(".ron") {
                Some(locale) => locale.to_owned(),
                None => continue,
            };

            if let Some(content) = Localizations::get(&file) {
                match String::from_utf8(content.data.into_owned()) {
                    Ok(text) => resources.push((locale, text)),
                    Err(why) => warn!("skipping translation {}: {}", file, why),
                }
            }
        }

        Self::from_locales(
            fallback,
            resources.iter().map(|(l, r)| (l.as_str(), r.as_str())),
        )
    }

    /// Builds a store from every `<locale>.ron` file in `dir`.
    pub fn from_dir(dir: &Path, fallback: &str) -> Result<Self, StoreError> {
        let io_error = |why| StoreError::Io {
            path: dir.to_owned(),
            why,
        };

        let mut resources = Vec::new();

        for entry in std::fs::read_dir(dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();

            if path.extension().map_or(true, |ext| ext != "ron") {
                continue;
            }

            let locale = match path.file_stem().and_then(|stem| stem.to_str()) {
                Some(locale) => locale.to_owned(),
                None => continue,
            };

            let text = std::fs::read_to_string(&path).map_err(|why| StoreError::Io {
                path: path.clone(),
                why,
            })?;

            resources.push((locale, text));
        }

        info!("loaded {} translations from {:?}", resources.len(), dir);

        Self::from_locales(
            fallback,
            resources.iter().map(|(l, r)| (l.as_str(), r.as_str())),
        )
    }

    fn validate(table: Table, fallback: &str) -> Result<Self, StoreError> {
        // Report the first offending key in a stable order.
        let missing = table
            .iter()
            .filter(|(_, texts)| !texts.contains_key(fallback))
            .map(|(key, _)| key)
            .min();

        if let Some(key) = missing {
            return Err(StoreError::MissingFallback {
                key: key.clone(),
                fallback: fallback.to_owned(),
            });
        }

        Ok(Self {
            fallback: fallback.to_owned(),
            table,
        })
    }

    /// Text for `key` in `locale`.
    ///
    /// Falls back to the locale's language without its region, and then to
    /// the fallback locale. Only a key unknown to the store is an error.
    pub fn resolve(&self, key: &str, locale: &str) -> Result<&str, UnknownKey> {
        let texts = self
            .table
            .get(key)
            .ok_or_else(|| UnknownKey(key.to_owned()))?;

        let language = locale.split(&['-', '_'][..]).next().unwrap_or(locale);

        [locale, language, self.fallback.as_str()]
            .iter()
            .find_map(|candidate| texts.get(*candidate))
            .map(String::as_str)
            .ok_or_else(|| UnknownKey(key.to_owned()))
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Every locale with at least one translation, sorted.
    pub fn locales(&self) -> BTreeSet<&str> {
        self.table
            .values()
            .flat_map(|texts| texts.keys().map(String::as_str))
            .collect()
    }

    /// Renders the store back into the table format accepted by [`Store::load`].
    pub fn to_resource(&self) -> Result<String, ron::Error> {
        let sorted: BTreeMap<&String, BTreeMap<&String, &String>> = self
            .table
            .iter()
            .map(|(key, texts)| (key, texts.iter().collect()))
            .collect();

        ron::ser::to_string_pretty(&sorted, ron::ser::PrettyConfig::default())
    }
}

fn parse<T: serde::de::DeserializeOwned>(source_name: &str, resource: &str) -> Result<T, StoreError> {
    ron::from_str(resource).map_err(|why| StoreError::ResourceParse {
        source_name: source_name.to_owned(),
        why,
    })
}
