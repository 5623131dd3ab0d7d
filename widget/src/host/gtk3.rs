// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

//! Realizes updater subtrees as GTK 3 widgets.

use super::HostContainer;
use crate::node::{WidgetId, WidgetKind};
use crate::tree::NodeRef;
use cascade::cascade;
use gtk::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

enum Realized {
    Widget(gtk::Widget),
    /// An entry of a combo box, addressed by position.
    Entry(gtk::ComboBoxText, i32),
}

/// A [`HostContainer`] backed by a `gtk::Container`.
pub struct GtkHost {
    container: glib::WeakRef<gtk::Container>,
    widgets: RefCell<HashMap<WidgetId, Realized>>,
    subtrees: RefCell<HashMap<WidgetId, Vec<WidgetId>>>,
}

impl GtkHost {
    pub fn new(container: &gtk::Container) -> Rc<Self> {
        Rc::new(Self {
            container: container.downgrade(),
            widgets: RefCell::default(),
            subtrees: RefCell::default(),
        })
    }

    fn realize(&self, node: NodeRef<'_>, realized: &mut Vec<WidgetId>) -> gtk::Widget {
        let text = node.text().unwrap_or_default();

        let widget: gtk::Widget = match node.kind() {
            WidgetKind::Frame => cascade! {
                gtk::Frame::new(None);
                ..set_margin_bottom(12);
            }
            .upcast(),
            WidgetKind::Container => cascade! {
                gtk::ListBox::new();
                ..set_selection_mode(gtk::SelectionMode::None);
            }
            .upcast(),
            WidgetKind::Row => cascade! {
                gtk::Box::new(gtk::Orientation::Horizontal, 24);
                ..set_margin_start(20);
                ..set_margin_end(20);
                ..set_margin_top(8);
                ..set_margin_bottom(8);
            }
            .upcast(),
            WidgetKind::Label => gtk::Label::builder()
                .label(text)
                .xalign(0.0)
                .hexpand(true)
                .build()
                .upcast(),
            WidgetKind::Button => gtk::Button::with_label(text).upcast(),
            WidgetKind::Switch => gtk::Switch::builder()
                .valign(gtk::Align::Center)
                .build()
                .upcast(),
            WidgetKind::Image => {
                gtk::Image::from_icon_name(Some("go-next-symbolic"), gtk::IconSize::Button).upcast()
            }
            WidgetKind::ComboBox => {
                let combo = cascade! {
                    gtk::ComboBoxText::new();
                    ..set_valign(gtk::Align::Center);
                };

                for (position, entry) in node.children().enumerate() {
                    combo.append_text(entry.text().unwrap_or_default());
                    self.widgets
                        .borrow_mut()
                        .insert(entry.id(), Realized::Entry(combo.clone(), position as i32));
                    realized.push(entry.id());
                }

                combo.set_active(Some(0));
                self.remember(node, combo.clone().upcast(), realized);
                return combo.upcast();
            }
        };

        if let Some(container) = widget.downcast_ref::<gtk::Container>() {
            for child in node.children() {
                container.add(&self.realize(child, realized));
            }
        }

        self.remember(node, widget.clone(), realized);
        widget
    }

    fn remember(&self, node: NodeRef<'_>, widget: gtk::Widget, realized: &mut Vec<WidgetId>) {
        self.widgets
            .borrow_mut()
            .insert(node.id(), Realized::Widget(widget));
        realized.push(node.id());
    }
}

impl HostContainer for GtkHost {
    fn is_live(&self) -> bool {
        self.container
            .upgrade()
            .map_or(false, |container| !container.in_destruction())
    }

    fn insert_child(&self, root: NodeRef<'_>) {
        let container = match self.container.upgrade() {
            Some(container) => container,
            None => return,
        };

        let mut realized = Vec::new();
        let widget = self.realize(root, &mut realized);
        container.add(&widget);
        widget.show_all();

        self.subtrees.borrow_mut().insert(root.id(), realized);
    }

    fn remove_child(&self, root: WidgetId) {
        let realized = match self.subtrees.borrow_mut().remove(&root) {
            Some(realized) => realized,
            None => return,
        };

        let mut widgets = self.widgets.borrow_mut();
        let root_widget = widgets.remove(&root);

        for id in realized {
            widgets.remove(&id);
        }

        if let (Some(container), Some(Realized::Widget(widget))) =
            (self.container.upgrade(), root_widget)
        {
            container.remove(&widget);
        }
    }

    fn set_text(&self, node: WidgetId, text: &str) {
        match self.widgets.borrow().get(&node) {
            Some(Realized::Widget(widget)) => {
                if let Some(label) = widget.downcast_ref::<gtk::Label>() {
                    label.set_text(text);
                } else if let Some(button) = widget.downcast_ref::<gtk::Button>() {
                    button.set_label(text);
                } else if let Some(frame) = widget.downcast_ref::<gtk::Frame>() {
                    frame.set_label(Some(text));
                }
            }

            Some(Realized::Entry(combo, position)) => {
                let active = combo.active();
                combo.remove(*position);
                combo.insert_text(*position, text);
                combo.set_active(active);
            }

            None => (),
        }
    }
}
