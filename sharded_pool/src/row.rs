use crate::{Row, RouteError};

/// A placeholder row returned by
/// [`ShardedPool::query_row()`](crate::ShardedPool) when the target shard
/// cannot be resolved.
///
/// Scanning a [`FailedRow`] yields the resolution error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedRow {
    err: RouteError,
}

impl FailedRow {
    pub(crate) fn new(err: RouteError) -> Self {
        Self { err }
    }

    /// The resolution error this row reports when scanned.
    pub fn error(&self) -> &RouteError {
        &self.err
    }

    /// Consume this row, returning the resolution error.
    pub fn into_error(self) -> RouteError {
        self.err
    }
}

/// The row type returned by [`ShardedPool::query_row()`](crate::ShardedPool).
#[derive(Debug)]
pub enum ShardRow<R> {
    /// The row returned by the resolved shard.
    Routed(R),

    /// The shard could not be resolved.
    Failed(FailedRow),
}

impl<R> ShardRow<R> {
    /// Return the row produced by the resolved shard, or the error that
    /// prevented resolving one.
    pub fn into_result(self) -> Result<R, RouteError> {
        match self {
            Self::Routed(row) => Ok(row),
            Self::Failed(failed) => Err(failed.into_error()),
        }
    }
}

impl<R> Row for ShardRow<R>
where
    R: Row,
    R::Error: From<RouteError>,
{
    type Dest = R::Dest;
    type Error = R::Error;

    fn scan(self, dest: &mut Self::Dest) -> Result<(), Self::Error> {
        match self {
            Self::Routed(row) => row.scan(dest),
            Self::Failed(failed) => Err(failed.into_error().into()),
        }
    }
}
