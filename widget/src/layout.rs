// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

//! The widget subtree of the system updater settings.

use crate::error::ReparentError;
use crate::node::{NodeId, WidgetKind};
use crate::tree::WidgetTree;

pub const AUTOMATIC_UPDATES: &str = "label.automatic-updates";
pub const AUTOMATICALLY_INSTALL: &str = "label.automatically-install";
pub const SCHEDULE_OFF: &str = "label.schedule-off";
pub const UPDATE_NOTIFICATIONS: &str = "label.update-notifications";
pub const SCHEDULE_DAILY: &str = "option.schedule-daily";
pub const SCHEDULE_WEEKLY: &str = "option.schedule-weekly";
pub const SCHEDULE_MONTHLY: &str = "option.schedule-monthly";
pub const CHECK_FOR_UPDATES: &str = "btn.check";

/// Every translation key referenced by the layout, in traversal order.
pub const KEYS: [&str; 8] = [
    AUTOMATIC_UPDATES,
    AUTOMATICALLY_INSTALL,
    SCHEDULE_OFF,
    UPDATE_NOTIFICATIONS,
    SCHEDULE_DAILY,
    SCHEDULE_WEEKLY,
    SCHEDULE_MONTHLY,
    CHECK_FOR_UPDATES,
];

/// Builds the updater subtree, returning the tree and its root.
///
/// ```text
/// Frame
/// └── Container
///     ├── Row: Label(automatic updates), Switch
///     ├── Row: Label(automatically install), Row: Label(schedule), Image
///     ├── Row: Label(update notifications), ComboBox: Label(daily|weekly|monthly)
///     └── Row: Button(check for updates)
/// ```
pub fn build() -> Result<(WidgetTree, NodeId), ReparentError> {
    use WidgetKind::*;

    let mut tree = WidgetTree::new();
    let root = tree.create(Frame, None);
    let list = tree.append(root, Container, None)?;

    let row = tree.append(list, Row, None)?;
    tree.append(row, Label, Some(AUTOMATIC_UPDATES))?;
    tree.append(row, Switch, None)?;

    let row = tree.append(list, Row, None)?;
    tree.append(row, Label, Some(AUTOMATICALLY_INSTALL))?;
    let description = tree.append(row, Row, None)?;
    tree.append(description, Label, Some(SCHEDULE_OFF))?;
    tree.append(description, Image, None)?;

    let row = tree.append(list, Row, None)?;
    tree.append(row, Label, Some(UPDATE_NOTIFICATIONS))?;
    let schedule = tree.append(row, ComboBox, None)?;
    for option in [SCHEDULE_DAILY, SCHEDULE_WEEKLY, SCHEDULE_MONTHLY] {
        tree.append(schedule, Label, Some(option))?;
    }

    let row = tree.append(list, Row, None)?;
    tree.append(row, Button, Some(CHECK_FOR_UPDATES))?;

    Ok((tree, root))
}
