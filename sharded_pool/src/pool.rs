use std::fmt::Debug;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sharder::ShardContext;

/// A callback executed by [`Pool::transactional()`] within a transaction scope.
///
/// The callback is handed the same [`ShardContext`] passed to
/// [`Pool::transactional()`].
pub type TxFn<E> =
    Box<dyn for<'a> FnOnce(&'a ShardContext) -> BoxFuture<'a, Result<(), E>> + Send>;

/// Box `f` as a [`TxFn`].
///
/// ```
/// # use sharded_pool::{tx_fn, TxFn};
/// let f: TxFn<std::io::Error> = tx_fn(|ctx| {
///     Box::pin(async move {
///         let _ = ctx.sharding_key();
///         Ok(())
///     })
/// });
/// ```
pub fn tx_fn<E, F>(f: F) -> TxFn<E>
where
    F: for<'a> FnOnce(&'a ShardContext) -> BoxFuture<'a, Result<(), E>> + Send + 'static,
{
    Box::new(f)
}

/// A single row returned by [`Pool::query_row()`].
///
/// Rows carry no error channel of their own until they are scanned.
pub trait Row: Send {
    /// The destination the row's columns are scanned into.
    type Dest: ?Sized;

    /// The error returned when the row cannot be scanned.
    type Error;

    /// Scan the columns of this row into `dest`, returning any error produced
    /// while querying or decoding the row.
    fn scan(self, dest: &mut Self::Dest) -> Result<(), Self::Error>;
}

/// The capability set of a database connection pool bound to one shard.
///
/// Connection lifecycle, concurrency limits and transaction commit/rollback
/// policy are entirely owned by the implementation.
#[async_trait]
pub trait Pool: Debug + Send + Sync {
    /// Options accepted by [`Pool::begin_tx()`].
    type TxOptions: Send;

    /// An open transaction.
    type Tx: Send;

    /// A set of rows returned by [`Pool::query()`].
    type Rows: Send;

    /// A single row returned by [`Pool::query_row()`].
    type Row: Row<Error = Self::Error>;

    /// The result of [`Pool::exec()`].
    type CommandTag: Send;

    /// A statement argument.
    type Param: ?Sized + Sync;

    /// The error type of all fallible operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Begin a transaction configured with `opts`.
    async fn begin_tx(
        &self,
        ctx: &ShardContext,
        opts: Self::TxOptions,
    ) -> Result<Self::Tx, Self::Error>;

    /// Begin a transaction with the default options.
    async fn begin(&self, ctx: &ShardContext) -> Result<Self::Tx, Self::Error>;

    /// Execute `statement` and return the resulting rows.
    async fn query(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::Rows, Self::Error>;

    /// Execute `statement`, returning at most one row.
    ///
    /// Errors are deferred until the returned row is scanned.
    async fn query_row(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Self::Row;

    /// Execute `statement`, returning the command result.
    async fn exec(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::CommandTag, Self::Error>;

    /// Run `f` within a transaction scope managed by the pool.
    async fn transactional(
        &self,
        ctx: &ShardContext,
        f: TxFn<Self::Error>,
    ) -> Result<(), Self::Error>;
}
