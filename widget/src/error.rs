// Copyright 2021-2022 System76 <info@system76.com>
// SPDX-License-Identifier: MPL-2.0

use crate::node::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading translations. These are fatal to initialization.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed translation resource {source_name}: {why}")]
    ResourceParse {
        source_name: String,
        #[source]
        why: ron::error::SpannedError,
    },

    #[error("translation key `{key}` has no text for the fallback locale `{fallback}`")]
    MissingFallback { key: String, fallback: String },

    #[error("the fallback locale `{0}` has no translation resource")]
    MissingFallbackResource(String),

    #[error("failed to read translations from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        why: std::io::Error,
    },
}

/// A key that is absent from every locale, the fallback included.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown translation key `{0}`")]
pub struct UnknownKey(pub String);

/// Failures while moving a node within a widget tree.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReparentError {
    #[error("node is the root of a subtree attached to a live host container")]
    AttachedToHost,

    #[error("node cannot become a descendant of itself")]
    Cycle,

    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),
}

/// Failures while attaching the updater subtree to a host container.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("host container is destroyed or null")]
    InvalidContainer,

    #[error("attachment handle was already detached")]
    AlreadyDetached,

    #[error("attachment handle is already attached")]
    AlreadyAttached,

    #[error("failed to build the updater layout")]
    Layout(#[from] ReparentError),
}
