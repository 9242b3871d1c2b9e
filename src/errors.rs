//! # Error Taxonomy
//!
//! The core exposes a narrow, `thiserror`-derived [`SimError`] covering the failure kinds it can
//! actually produce (validation, allocation, over-dense initial placement); everything downstream
//! of the core (colormap
//! loading, the encoder pipe) gets its own typed error and is folded into [`RunError`] at the CLI
//! boundary, following the reference codebase's preference for `Result<_, String>` /
//! `Box<dyn std::error::Error>` at I/O edges but with a proper enum for the part of the error
//! space that callers actually need to match on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid behavior parameter `{field}`: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("failed to allocate {what} ({width}x{height} cells)")]
    Allocation {
        what: &'static str,
        width: usize,
        height: usize,
    },

    #[error("{nagents} agents requested but the grid's interior only holds {capacity} at the per-cell cap")]
    Capacity { nagents: usize, capacity: usize },
}

#[derive(Debug, Error)]
pub enum ColormapError {
    #[error("could not read colormap file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("colormap {path} has a bad header: expected `RGB_r,RGB_g,RGB_b`, found `{found}`")]
    BadHeader { path: String, found: String },

    #[error("colormap {path} row {row} is malformed: {detail}")]
    MalformedRow {
        path: String,
        row: usize,
        detail: String,
    },

    #[error("colormap {path} row {row} has channel value {value} out of range [0, 255]")]
    ChannelOutOfRange {
        path: String,
        row: usize,
        value: i64,
    },
}

#[derive(Debug, Error)]
pub enum EncoderError {
    #[error("failed to spawn encoder process `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("short write to encoder stdin: wrote {wrote} of {expected} bytes")]
    ShortWrite { wrote: usize, expected: usize },

    #[error("encoder process exited with status {status}")]
    NonZeroExit { status: i32 },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Simulation(#[from] SimError),

    #[error(transparent)]
    Colormap(#[from] ColormapError),

    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
