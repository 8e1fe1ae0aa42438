//! Error code related to data collection.

use std::borrow::Cow;

use thiserror::Error;

use crate::{collection::disks::PartitionStat, utils::cancellation_token::Interruption};

/// A type alias for handling collection-related errors.
pub type CollectionResult<T> = std::result::Result<T, CollectionError>;

/// The errors that can happen with data collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The caller's token reported done before all input was consumed.
    #[error(transparent)]
    Interrupted(#[from] Interruption),
    /// An error around reading or applying configuration.
    #[error("Configuration error, {0}")]
    Config(Cow<'static, str>),
}

impl CollectionError {
    /// A configuration error.
    pub fn config<C: Into<Cow<'static, str>>>(reason: C) -> Self {
        Self::Config(reason.into())
    }
}

impl From<toml_edit::de::Error> for CollectionError {
    fn from(err: toml_edit::de::Error) -> Self {
        CollectionError::Config(err.to_string().into())
    }
}

/// A mount table parse that stopped early because its token reported done.
///
/// `partial` holds every row that had been retained before the stop, in input
/// order. Treat it as possibly incomplete.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("mount table parse interrupted after {} rows: {reason}", .partial.len())]
pub struct Interrupted {
    pub reason: Interruption,
    pub partial: Vec<PartitionStat>,
}
