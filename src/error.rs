//! Error types for the canvas engine.
//!
//! None of these are fatal: the interaction layer turns every one of them into a
//! silent no-op, but they are kept precise so hosts and tests can tell the cases apart.

use crate::graph::PortId;
use thiserror::Error;

/// Reasons why two ports could not be connected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// One of the ports does not exist (never created, or its node was removed).
    #[error("port {0:?} not found")]
    PortNotFound(PortId),

    /// Both ports are inputs or both are outputs.
    #[error("must connect an output port to an input port")]
    SameDirection,

    /// The unordered port pair is already connected.
    #[error("ports {0:?} and {1:?} are already connected")]
    Duplicate(PortId, PortId),
}

/// Failure reported by an [`ImageProvider`](crate::image::ImageProvider).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The identifier does not name anything the provider can reach.
    #[error("image not found: {0}")]
    NotFound(String),

    /// The provider found the asset but could not turn it into something displayable.
    #[error("cannot decode {identifier}: {reason}")]
    Decode { identifier: String, reason: String },
}

/// Errors raised while loading a [`CanvasConfig`](crate::config::CanvasConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] json5::Error),

    /// The parsed values violate a constraint the engine relies on.
    #[error("invalid config: {0}")]
    Invalid(String),
}
