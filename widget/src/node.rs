// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use std::sync::atomic::{AtomicU64, Ordering};

slotmap::new_key_type! {
    /// Index of a node within its tree's arena.
    pub struct NodeId;
}

/// Process-unique identity of a widget, as seen by the host toolkit.
///
/// Arena keys are only unique within one tree, so hosts which realize
/// several subtrees key their widgets by this instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u64);

impl WidgetId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        WidgetId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum WidgetKind {
    /// Framed box around the whole updater widget.
    Frame = 0,
    /// A list of option rows.
    Container = 1,
    /// A single option row.
    Row = 2,
    Label = 3,
    Button = 4,
    Switch = 5,
    ComboBox = 6,
    Image = 7,
}

#[derive(Debug)]
pub struct WidgetNode {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    pub(crate) text_key: Option<String>,
    pub(crate) text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl WidgetNode {
    pub fn new(kind: WidgetKind, text_key: Option<&str>) -> Self {
        Self {
            id: WidgetId::next(),
            kind,
            text_key: text_key.map(String::from),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// The translation key this node displays, if any.
    pub fn text_key(&self) -> Option<&str> {
        self.text_key.as_deref()
    }

    /// The text most recently applied by the localizer.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
