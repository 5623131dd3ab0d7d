// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

//! Toolkit-agnostic core of the system updater settings widget.
//!
//! The host toolkit provides a [`HostContainer`]; this crate builds the
//! updater's widget subtree, inserts it into the container, and re-applies
//! localized text whenever the locale changes.

#[macro_use]
extern crate tracing;

pub mod attach;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod locale;
pub mod localizer;
pub mod node;
pub mod store;
pub mod tree;

pub use self::attach::{attach, AttachState, AttachmentHandle};
pub use self::error::{AttachError, ReparentError, StoreError, UnknownKey};
pub use self::host::HostContainer;
pub use self::localizer::{LocalizeReport, Localizer};
pub use self::node::{NodeId, WidgetId, WidgetKind, WidgetNode};
pub use self::store::Store;
pub use self::tree::{NodeRef, WidgetTree};

/// Creates a localizer from the process configuration.
///
/// Translations come from the configured directory when one is set, and from
/// the bundled resources otherwise. The locale state is initialized to the
/// configured startup locale.
pub fn localizer() -> Result<Localizer, StoreError> {
    let config = config::config();

    let store = match config.translations.as_deref() {
        Some(path) => Store::from_dir(path, &config.fallback_locale)?,
        None => Store::bundled(&config.fallback_locale)?,
    };

    locale::set_current(&config.startup_locale());

    Ok(Localizer::new(store))
}
