// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use crate::attach::AttachmentHandle;
use crate::error::UnknownKey;
use crate::node::NodeId;
use crate::store::Store;
use crate::tree::{Walk, WidgetTree};
use std::rc::Rc;

/// Summary of one localization pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalizeReport {
    pub locale: String,
    /// Nodes walked, bound to a key or not.
    pub visited: usize,
    /// Nodes whose displayed text changed.
    pub applied: usize,
}

/// Applies translations from a [`Store`] to widget subtrees.
pub struct Localizer {
    store: Rc<Store>,
}

impl Localizer {
    pub fn new(store: Store) -> Self {
        Self {
            store: Rc::new(store),
        }
    }

    pub fn store(&self) -> Rc<Store> {
        self.store.clone()
    }

    /// Replaces every translation at once. Subtrees pick up the new text on
    /// their next localization.
    pub fn reload(&mut self, store: Store) {
        info!("reloaded translations ({} keys)", store.keys().count());
        self.store = Rc::new(store);
    }

    /// Makes `locale` current and applies it to the handle's subtree.
    ///
    /// Text is only pushed to the host for nodes whose text changed, so
    /// repeating a localization is a no-op. Keys missing from the store do
    /// not stop the pass; the first one is returned once every other node
    /// has been updated.
    pub fn localize(
        &self,
        handle: &mut AttachmentHandle,
        locale: &str,
    ) -> Result<LocalizeReport, UnknownKey> {
        crate::locale::set_current(locale);
        let root = handle.root();
        self.localize_tree(handle.tree_mut(), root, locale)
    }

    /// Localizes using the desktop session's preferred language.
    pub fn localize_desktop(
        &self,
        handle: &mut AttachmentHandle,
    ) -> Result<LocalizeReport, UnknownKey> {
        let locale = crate::locale::requested().unwrap_or_else(|| self.store.fallback().to_owned());
        self.localize(handle, &locale)
    }

    /// Applies `locale` to the subtree at `root` without changing the current
    /// locale.
    ///
    /// Text reaches the host only when `root` is the root of a tree attached
    /// to a live container; otherwise the nodes are updated in place.
    pub fn localize_tree(
        &self,
        tree: &mut WidgetTree,
        root: NodeId,
        locale: &str,
    ) -> Result<LocalizeReport, UnknownKey> {
        let container = tree
            .mount
            .as_ref()
            .filter(|mount| mount.root == root)
            .and_then(|mount| mount.live_container());

        let mut report = LocalizeReport {
            locale: locale.to_owned(),
            visited: 0,
            applied: 0,
        };

        let mut first_error = None;
        let mut walk = Walk::new(tree, root);

        while let Some(id) = walk.next(tree) {
            report.visited += 1;

            let node = match tree.get_mut(id) {
                Some(node) => node,
                None => continue,
            };

            let key = match node.text_key.as_deref() {
                Some(key) => key,
                None => continue,
            };

            let text = match self.store.resolve(key, locale) {
                Ok(text) => text,
                Err(why) => {
                    warn!("{:?}: {}", node.id, why);
                    first_error.get_or_insert(why);
                    continue;
                }
            };

            if node.text.as_deref() == Some(text) {
                continue;
            }

            debug!("{:?}: {} -> {:?}", node.id, key, text);
            node.text = Some(text.to_owned());
            report.applied += 1;

            if let Some(container) = container.as_ref() {
                container.set_text(node.id, text);
            }
        }

        match first_error {
            Some(why) => Err(why),
            None => Ok(report),
        }
    }
}
