// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

//! Capabilities the core consumes from the host toolkit.

#[cfg(feature = "gtk")]
pub mod gtk3;

use crate::node::WidgetId;
use crate::tree::NodeRef;

/// A parent UI element owned by the host toolkit.
///
/// The core holds containers weakly and never extends their lifetime. Every
/// method is called on the UI thread.
pub trait HostContainer {
    /// False once the host has destroyed the container.
    fn is_live(&self) -> bool;

    /// Realizes `root` and its descendants and adds them as a child of this
    /// container. Each node already carries its localized text.
    fn insert_child(&self, root: NodeRef<'_>);

    /// Removes the subtree previously inserted with `root` as its root.
    fn remove_child(&self, root: WidgetId);

    /// Changes the displayed text of a widget realized by this container.
    fn set_text(&self, node: WidgetId, text: &str);
}
