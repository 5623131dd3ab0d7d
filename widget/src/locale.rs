// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

//! The current locale of the widget.
//!
//! All widget operations run on the toolkit's UI thread, so the state lives
//! in a thread-local rather than behind a lock.

use i18n_embed::DesktopLanguageRequester;
use std::cell::RefCell;

thread_local! {
    static CURRENT: RefCell<Option<String>> = RefCell::new(None);
}

/// The locale set by the most recent localization, or the configured
/// startup locale if there was none.
pub fn current() -> String {
    CURRENT
        .with(|current| current.borrow().clone())
        .unwrap_or_else(|| crate::config::config().startup_locale())
}

pub fn set_current(locale: &str) {
    CURRENT.with(|current| *current.borrow_mut() = Some(locale.to_owned()));
}

/// The most preferred language of the desktop session, if it names one.
pub fn requested() -> Option<String> {
    DesktopLanguageRequester::requested_languages()
        .first()
        .map(ToString::to_string)
}
