use std::borrow::Cow;

use async_trait::async_trait;
use iox_time::{SystemProvider, Time, TimeProvider};
use metric::{Attributes, DurationHistogram, Metric};
use sharder::{ShardContext, ShardIndex};

use crate::{Pool, TxFn};

/// The name of the call latency histogram recorded by
/// [`InstrumentationDecorator`].
pub const CALL_DURATION_METRIC: &str = "sharded_pool_call_duration";

#[derive(Debug)]
struct CallMetrics {
    success: DurationHistogram,
    error: DurationHistogram,
}

impl CallMetrics {
    fn new(metric: &Metric<DurationHistogram>, shard: ShardIndex, op: &'static str) -> Self {
        let attributes = |result: &'static str| {
            Attributes::from([
                ("shard", Cow::Owned(shard.to_string())),
                ("op", Cow::Borrowed(op)),
                ("result", Cow::Borrowed(result)),
            ])
        };

        Self {
            success: metric.recorder(attributes("success")),
            error: metric.recorder(attributes("error")),
        }
    }
}

/// An instrumentation decorator recording call latencies for [`Pool`]
/// implementations.
///
/// Latencies are recorded in the [`CALL_DURATION_METRIC`] histogram, broken
/// down by shard, operation and result (success/error). Wrapping each shard
/// pool in an [`InstrumentationDecorator`] before assigning it to a
/// [`Builder`](crate::Builder) produces per-shard latency series.
///
/// All calls are forwarded to the inner [`Pool`], and their results returned,
/// unchanged. Rows returned by [`Pool::query_row()`] are not scanned, so those
/// calls are always recorded as successful.
#[derive(Debug)]
pub struct InstrumentationDecorator<P, T = SystemProvider> {
    inner: P,
    time_provider: T,

    begin_tx_duration: CallMetrics,
    begin_duration: CallMetrics,
    query_duration: CallMetrics,
    query_row_duration: CallMetrics,
    exec_duration: CallMetrics,
    transactional_duration: CallMetrics,
}

impl<P> InstrumentationDecorator<P> {
    /// Wrap a new [`InstrumentationDecorator`] over `inner` exposing metrics
    /// labelled with `shard=shard`.
    pub fn new(shard: impl Into<ShardIndex>, registry: &metric::Registry, inner: P) -> Self {
        let shard = shard.into();
        let metric: Metric<DurationHistogram> = registry.register_metric(
            CALL_DURATION_METRIC,
            "sharded pool call duration, by shard and operation",
        );

        Self {
            inner,
            time_provider: SystemProvider::new(),
            begin_tx_duration: CallMetrics::new(&metric, shard, "begin_tx"),
            begin_duration: CallMetrics::new(&metric, shard, "begin"),
            query_duration: CallMetrics::new(&metric, shard, "query"),
            query_row_duration: CallMetrics::new(&metric, shard, "query_row"),
            exec_duration: CallMetrics::new(&metric, shard, "exec"),
            transactional_duration: CallMetrics::new(&metric, shard, "transactional"),
        }
    }
}

impl<P, T> InstrumentationDecorator<P, T> {
    /// Measure call latencies with `time_provider`.
    pub fn with_time_provider<U>(self, time_provider: U) -> InstrumentationDecorator<P, U> {
        InstrumentationDecorator {
            inner: self.inner,
            time_provider,
            begin_tx_duration: self.begin_tx_duration,
            begin_duration: self.begin_duration,
            query_duration: self.query_duration,
            query_row_duration: self.query_row_duration,
            exec_duration: self.exec_duration,
            transactional_duration: self.transactional_duration,
        }
    }

    /// The decorated pool.
    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P, T> InstrumentationDecorator<P, T>
where
    T: TimeProvider,
{
    fn observe<R, E>(&self, metrics: &CallMetrics, started: Time, res: &Result<R, E>) {
        // Avoid exploding if time goes backwards - simply drop the measurement
        // if it happens.
        if let Some(delta) = self.time_provider.now().checked_duration_since(started) {
            match res {
                Ok(_) => metrics.success.record(delta),
                Err(_) => metrics.error.record(delta),
            }
        }
    }
}

#[async_trait]
impl<P, T> Pool for InstrumentationDecorator<P, T>
where
    P: Pool,
    T: TimeProvider,
{
    type TxOptions = P::TxOptions;
    type Tx = P::Tx;
    type Rows = P::Rows;
    type Row = P::Row;
    type CommandTag = P::CommandTag;
    type Param = P::Param;
    type Error = P::Error;

    async fn begin_tx(
        &self,
        ctx: &ShardContext,
        opts: Self::TxOptions,
    ) -> Result<Self::Tx, Self::Error> {
        let t = self.time_provider.now();
        let res = self.inner.begin_tx(ctx, opts).await;
        self.observe(&self.begin_tx_duration, t, &res);
        res
    }

    async fn begin(&self, ctx: &ShardContext) -> Result<Self::Tx, Self::Error> {
        let t = self.time_provider.now();
        let res = self.inner.begin(ctx).await;
        self.observe(&self.begin_duration, t, &res);
        res
    }

    async fn query(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::Rows, Self::Error> {
        let t = self.time_provider.now();
        let res = self.inner.query(ctx, statement, args).await;
        self.observe(&self.query_duration, t, &res);
        res
    }

    async fn query_row(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Self::Row {
        let t = self.time_provider.now();
        let row = self.inner.query_row(ctx, statement, args).await;
        self.observe(&self.query_row_duration, t, &Ok::<_, ()>(()));
        row
    }

    async fn exec(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::CommandTag, Self::Error> {
        let t = self.time_provider.now();
        let res = self.inner.exec(ctx, statement, args).await;
        self.observe(&self.exec_duration, t, &res);
        res
    }

    async fn transactional(
        &self,
        ctx: &ShardContext,
        f: TxFn<Self::Error>,
    ) -> Result<(), Self::Error> {
        let t = self.time_provider.now();
        let res = self.inner.transactional(ctx, f).await;
        self.observe(&self.transactional_duration, t, &res);
        res
    }
}
