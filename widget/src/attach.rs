// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use crate::error::{AttachError, ReparentError};
use crate::host::HostContainer;
use crate::localizer::Localizer;
use crate::node::{NodeId, WidgetId};
use crate::tree::{Mount, WidgetTree};
use std::rc::Rc;

/// Lifecycle of an attachment: `Unattached -> Attached -> Detached`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttachState {
    Unattached,
    Attached,
    Detached,
}

/// Owns one updater subtree and its relation to a host container.
///
/// The container is held weakly; the host may destroy it at any time.
/// `Detached` is terminal: detaching again does nothing, while attaching
/// again fails with [`AttachError::AlreadyDetached`]. Dropping the handle
/// detaches it.
pub struct AttachmentHandle {
    tree: WidgetTree,
    root: NodeId,
    state: AttachState,
}

/// Builds the updater subtree and inserts it into `container`.
///
/// Each call yields an independent subtree, even for the same container.
pub fn attach<C: HostContainer + 'static>(
    container: &Rc<C>,
    localizer: &Localizer,
) -> Result<AttachmentHandle, AttachError> {
    if !container.is_live() {
        return Err(AttachError::InvalidContainer);
    }

    let mut handle = AttachmentHandle::new(localizer)?;
    handle.attach(container)?;
    Ok(handle)
}

impl AttachmentHandle {
    /// Builds the updater subtree, localized to the current locale, without
    /// inserting it anywhere.
    pub fn new(localizer: &Localizer) -> Result<Self, AttachError> {
        let (mut tree, root) = crate::layout::build()?;

        if let Err(why) = localizer.localize_tree(&mut tree, root, &crate::locale::current()) {
            warn!("updater widget is missing translations: {}", why);
        }

        Ok(Self {
            tree,
            root,
            state: AttachState::Unattached,
        })
    }

    /// Inserts the subtree into `container`.
    pub fn attach<C: HostContainer + 'static>(&mut self, container: &Rc<C>) -> Result<(), AttachError> {
        let container: Rc<dyn HostContainer> = container.clone();
        self.attach_dyn(&container)
    }

    pub fn attach_dyn(&mut self, container: &Rc<dyn HostContainer>) -> Result<(), AttachError> {
        match self.state {
            AttachState::Detached => return Err(AttachError::AlreadyDetached),
            AttachState::Attached => return Err(AttachError::AlreadyAttached),
            AttachState::Unattached => (),
        }

        if !container.is_live() {
            return Err(AttachError::InvalidContainer);
        }

        let root = self
            .tree
            .node(self.root)
            .ok_or(ReparentError::UnknownNode(self.root))?;

        container.insert_child(root);
        info!("attached updater widget {:?} ({} nodes)", root.id(), self.tree.len());

        self.tree.mount = Some(Mount {
            root: self.root,
            container: Rc::downgrade(container),
        });

        self.state = AttachState::Attached;
        Ok(())
    }

    /// Removes the subtree from its container, if that container is still
    /// live, and releases every node.
    pub fn detach(&mut self) {
        if self.state == AttachState::Detached {
            return;
        }

        if let Some(mount) = self.tree.mount.take() {
            match (mount.live_container(), self.widget_id()) {
                (Some(container), Some(id)) => {
                    container.remove_child(id);
                    info!("detached updater widget {:?}", id);
                }
                _ => warn!("host container was destroyed before the updater widget was detached"),
            }
        }

        self.tree.clear();
        self.state = AttachState::Detached;
    }

    pub fn state(&self) -> AttachState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state == AttachState::Attached
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Host-visible identity of the root widget. `None` once detached.
    pub fn widget_id(&self) -> Option<WidgetId> {
        self.tree.get(self.root).map(|node| node.id())
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The container this handle is attached to, while the host keeps it live.
    pub fn container(&self) -> Option<Rc<dyn HostContainer>> {
        self.tree.mount.as_ref().and_then(Mount::live_container)
    }
}

impl Drop for AttachmentHandle {
    fn drop(&mut self) {
        self.detach();
    }
}
