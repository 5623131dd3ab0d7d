// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use crate::error::ReparentError;
use crate::host::HostContainer;
use crate::node::{NodeId, WidgetKind, WidgetNode};
use slotmap::SlotMap;
use std::rc::{Rc, Weak};

/// Records that a tree's root was inserted into a host container.
pub(crate) struct Mount {
    pub(crate) root: NodeId,
    pub(crate) container: Weak<dyn HostContainer>,
}

impl Mount {
    /// The container, if the host has neither dropped nor destroyed it.
    pub(crate) fn live_container(&self) -> Option<Rc<dyn HostContainer>> {
        self.container.upgrade().filter(|container| container.is_live())
    }
}

/// An arena owning every node of a widget subtree.
///
/// Parent and child links are arena keys, so the tree has a single owner and
/// no reference cycles. Dropping the tree releases every node.
///
/// While the root is inserted into a live host container, no node of the
/// mounted subtree can be moved or removed. Nodes added to it afterwards are
/// not replayed to the host; only text changes are.
#[derive(Default)]
pub struct WidgetTree {
    nodes: SlotMap<NodeId, WidgetNode>,
    pub(crate) mount: Option<Mount>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node with no parent.
    pub fn create(&mut self, kind: WidgetKind, text_key: Option<&str>) -> NodeId {
        self.insert(WidgetNode::new(kind, text_key))
    }

    /// Moves an existing node value into the arena, detached.
    pub fn insert(&mut self, mut node: WidgetNode) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.nodes.insert(node)
    }

    /// Creates a node and appends it to `parent`.
    pub fn append(
        &mut self,
        parent: NodeId,
        kind: WidgetKind,
        text_key: Option<&str>,
    ) -> Result<NodeId, ReparentError> {
        if !self.nodes.contains_key(parent) {
            return Err(ReparentError::UnknownNode(parent));
        }

        let child = self.create(kind, text_key);
        self.link(parent, child);
        Ok(child)
    }

    /// Appends `child` to the children of `parent`, moving it away from its
    /// previous parent if it had one.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ReparentError> {
        for id in [parent, child] {
            if !self.nodes.contains_key(id) {
                return Err(ReparentError::UnknownNode(id));
            }
        }

        if self.is_mounted(child) {
            return Err(ReparentError::AttachedToHost);
        }

        if child == parent || self.ancestors(parent).any(|id| id == child) {
            return Err(ReparentError::Cycle);
        }

        self.unlink(child);
        self.link(parent, child);
        Ok(())
    }

    /// Unlinks `node` from its parent and releases it along with every
    /// descendant. Returns the number of nodes released.
    pub fn remove(&mut self, node: NodeId) -> Result<usize, ReparentError> {
        if !self.nodes.contains_key(node) {
            return Err(ReparentError::UnknownNode(node));
        }

        if self.is_mounted(node) {
            return Err(ReparentError::AttachedToHost);
        }

        self.unlink(node);

        let released: Vec<NodeId> = self.visit(node).map(|node| node.key()).collect();
        for id in &released {
            self.nodes.remove(*id);
        }

        Ok(released.len())
    }

    pub fn get(&self, id: NodeId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.nodes.get(id).map(|node| NodeRef {
            tree: self,
            key: id,
            node,
        })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map_or(&[][..], |node| node.children.as_slice())
    }

    /// Depth-first, pre-order traversal of the subtree rooted at `root`.
    ///
    /// Every call starts a fresh traversal; an unknown root yields nothing.
    pub fn visit(&self, root: NodeId) -> Visit<'_> {
        Visit {
            tree: self,
            walk: Walk::new(self, root),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |id| self.parent(*id))
    }

    /// True if `id` was realized in a live host container, either as the
    /// mounted root or one of its descendants.
    fn is_mounted(&self, id: NodeId) -> bool {
        let mount = match self.mount.as_ref() {
            Some(mount) => mount,
            None => return false,
        };

        let realized = id == mount.root || self.ancestors(id).any(|id| id == mount.root);
        realized && mount.live_container().is_some()
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    fn unlink(&mut self, child: NodeId) {
        let parent = match self.nodes.get_mut(child).and_then(|node| node.parent.take()) {
            Some(parent) => parent,
            None => return,
        };

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
    }
}

/// A read-only view of a node, able to reach its children.
#[derive(Copy, Clone)]
pub struct NodeRef<'a> {
    tree: &'a WidgetTree,
    key: NodeId,
    node: &'a WidgetNode,
}

impl<'a> std::ops::Deref for NodeRef<'a> {
    type Target = WidgetNode;

    fn deref(&self) -> &Self::Target {
        self.node
    }
}

impl<'a> NodeRef<'a> {
    /// The arena key of this node.
    pub fn key(&self) -> NodeId {
        self.key
    }

    pub fn text_key(&self) -> Option<&'a str> {
        let node: &'a WidgetNode = self.node;
        node.text_key()
    }

    pub fn text(&self) -> Option<&'a str> {
        let node: &'a WidgetNode = self.node;
        node.text()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let tree: &'a WidgetTree = self.tree;
        self.node.parent.and_then(|id| tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let (tree, node): (&'a WidgetTree, &'a WidgetNode) = (self.tree, self.node);
        node.children.iter().filter_map(move |id| tree.node(*id))
    }
}

/// A pre-order cursor which does not borrow the tree between steps.
///
/// This lets a caller mutate the node it was just handed before asking for
/// the next one, which the localizer relies on.
pub(crate) struct Walk {
    stack: Vec<NodeId>,
}

impl Walk {
    pub(crate) fn new(tree: &WidgetTree, root: NodeId) -> Self {
        let mut stack = Vec::new();
        if tree.nodes.contains_key(root) {
            stack.push(root);
        }

        Walk { stack }
    }

    pub(crate) fn next(&mut self, tree: &WidgetTree) -> Option<NodeId> {
        loop {
            let id = self.stack.pop()?;
            if let Some(node) = tree.nodes.get(id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(id);
            }
        }
    }
}

pub struct Visit<'a> {
    tree: &'a WidgetTree,
    walk: Walk,
}

impl<'a> Iterator for Visit<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next(self.tree)?;
        self.tree.node(id)
    }
}
