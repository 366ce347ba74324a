use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use observability_deps::tracing::*;
use sharder::{Picker, ShardContext, ShardIndex};

use crate::{FailedRow, Pool, RouteError, ShardRow, TxFn};

/// A [`Pool`] routing each call to one of a fixed, ordered set of shard pools.
///
/// The target shard of a call is resolved from its [`ShardContext`]:
///
///   1. An explicit [`ShardIndex`] in the context is used as-is.
///   2. Otherwise a sharding key in the context is mapped to an index by the
///      configured [`Picker`].
///   3. Otherwise the call fails with [`RouteError::UnresolvedShard`].
///
/// The resolved index is bounds checked against the configured shards, failing
/// with [`RouteError::ShardIndexOutOfRange`] if no shard exists at that index.
///
/// Calls are forwarded to the selected pool with their arguments unchanged, and
/// the pool's result is returned unchanged. Resolution errors are returned
/// immediately, converted into the pool's error type, with the exception of
/// [`Pool::query_row()`] which returns a [`ShardRow::Failed`] that yields the
/// error when scanned.
///
/// A [`ShardedPool`] is constructed by a [`Builder`](crate::Builder) and is
/// immutable thereafter.
pub struct ShardedPool<P> {
    shards: Vec<Arc<P>>,
    picker: Arc<dyn Picker>,
}

impl<P> Debug for ShardedPool<P>
where
    P: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShardedPool")
            .field("shards", &self.shards)
            .finish_non_exhaustive()
    }
}

impl<P> ShardedPool<P> {
    pub(crate) fn new(shards: Vec<Arc<P>>, picker: Arc<dyn Picker>) -> Self {
        Self { shards, picker }
    }

    /// The number of configured shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// All configured shards, in index order.
    pub fn shards(&self) -> &[Arc<P>] {
        &self.shards
    }

    /// The shard at `index`, if configured.
    pub fn shard(&self, index: ShardIndex) -> Option<&Arc<P>> {
        self.shards.get(index.as_usize())
    }

    /// Resolve the index of the shard a call with `ctx` is routed to, without
    /// dispatching anything.
    pub fn resolve(&self, ctx: &ShardContext) -> Result<ShardIndex, RouteError> {
        self.resolve_shard(ctx).map(|(index, _)| index)
    }

    fn resolve_shard(&self, ctx: &ShardContext) -> Result<(ShardIndex, &Arc<P>), RouteError> {
        let index = match (ctx.shard_index(), ctx.sharding_key()) {
            (Some(index), _) => index,
            (None, Some(key)) => self.picker.pick(ctx, key),
            (None, None) => return Err(RouteError::UnresolvedShard),
        };

        // Pickers may return any index in the full u8 domain, irrespective of
        // the number of configured shards.
        self.shard(index)
            .map(|shard| (index, shard))
            .ok_or(RouteError::ShardIndexOutOfRange {
                index,
                shard_count: self.shards.len(),
            })
    }

    fn get_shard(&self, ctx: &ShardContext, op: &'static str) -> Result<&P, RouteError> {
        match self.resolve_shard(ctx) {
            Ok((index, shard)) => {
                trace!(shard_index = %index, op, "routing call to shard");
                Ok(shard.as_ref())
            }
            Err(e) => {
                warn!(error = %e, op, "failed to resolve shard for call");
                Err(e)
            }
        }
    }
}

#[async_trait]
impl<P> Pool for ShardedPool<P>
where
    P: Pool,
    P::Error: From<RouteError>,
{
    type TxOptions = P::TxOptions;
    type Tx = P::Tx;
    type Rows = P::Rows;
    type Row = ShardRow<P::Row>;
    type CommandTag = P::CommandTag;
    type Param = P::Param;
    type Error = P::Error;

    async fn begin_tx(
        &self,
        ctx: &ShardContext,
        opts: Self::TxOptions,
    ) -> Result<Self::Tx, Self::Error> {
        let shard = self.get_shard(ctx, "begin_tx")?;
        shard.begin_tx(ctx, opts).await
    }

    async fn begin(&self, ctx: &ShardContext) -> Result<Self::Tx, Self::Error> {
        let shard = self.get_shard(ctx, "begin")?;
        shard.begin(ctx).await
    }

    async fn query(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::Rows, Self::Error> {
        let shard = self.get_shard(ctx, "query")?;
        shard.query(ctx, statement, args).await
    }

    async fn query_row(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Self::Row {
        match self.get_shard(ctx, "query_row") {
            Ok(shard) => ShardRow::Routed(shard.query_row(ctx, statement, args).await),
            Err(e) => ShardRow::Failed(FailedRow::new(e)),
        }
    }

    async fn exec(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::CommandTag, Self::Error> {
        let shard = self.get_shard(ctx, "exec")?;
        shard.exec(ctx, statement, args).await
    }

    async fn transactional(
        &self,
        ctx: &ShardContext,
        f: TxFn<Self::Error>,
    ) -> Result<(), Self::Error> {
        let shard = self.get_shard(ctx, "transactional")?;
        shard.transactional(ctx, f).await
    }
}
