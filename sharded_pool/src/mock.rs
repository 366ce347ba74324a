use async_trait::async_trait;
use parking_lot::Mutex;
use sharder::{Picker, ShardContext, ShardIndex};
use thiserror::Error;

use crate::{Pool, RouteError, Row, TxFn};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum MockPoolError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("pool {0} failed")]
    Pool(String),

    #[error("transaction callback failed: {0}")]
    Callback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockTxOptions {
    pub(crate) read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockTx {
    pub(crate) pool: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockRows {
    pub(crate) pool: String,
    pub(crate) statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockCommandTag {
    pub(crate) pool: String,
    pub(crate) rows_affected: u64,
}

#[derive(Debug)]
pub(crate) struct MockRow(Result<i64, MockPoolError>);

impl MockRow {
    pub(crate) fn new(v: Result<i64, MockPoolError>) -> Self {
        Self(v)
    }
}

impl Row for MockRow {
    type Dest = i64;
    type Error = MockPoolError;

    fn scan(self, dest: &mut Self::Dest) -> Result<(), Self::Error> {
        *dest = self.0?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MockPoolCall {
    BeginTx {
        ctx: ShardContext,
        opts: MockTxOptions,
    },
    Begin {
        ctx: ShardContext,
    },
    Query {
        ctx: ShardContext,
        statement: String,
        args: Vec<i64>,
    },
    QueryRow {
        ctx: ShardContext,
        statement: String,
        args: Vec<i64>,
    },
    Exec {
        ctx: ShardContext,
        statement: String,
        args: Vec<i64>,
    },
    Transactional {
        ctx: ShardContext,
    },
}

/// A [`Pool`] recording every call made to it.
///
/// Successful results identify the pool that produced them by name.
#[derive(Debug)]
pub(crate) struct MockPool {
    name: String,
    fail: bool,
    row_value: i64,
    calls: Mutex<Vec<MockPoolCall>>,
}

impl MockPool {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail: false,
            row_value: 0,
            calls: Default::default(),
        }
    }

    /// Return [`MockPoolError::Pool`] from every call.
    pub(crate) fn with_failure(self) -> Self {
        Self { fail: true, ..self }
    }

    /// Scan `v` from rows returned by `query_row`.
    pub(crate) fn with_row_value(self, v: i64) -> Self {
        Self {
            row_value: v,
            ..self
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn calls(&self) -> Vec<MockPoolCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: MockPoolCall) {
        self.calls.lock().push(call);
    }

    fn outcome<T>(&self, f: impl FnOnce(String) -> T) -> Result<T, MockPoolError> {
        if self.fail {
            return Err(MockPoolError::Pool(self.name.clone()));
        }
        Ok(f(self.name.clone()))
    }
}

fn collect_args(args: &[&i64]) -> Vec<i64> {
    args.iter().map(|v| **v).collect()
}

#[async_trait]
impl Pool for MockPool {
    type TxOptions = MockTxOptions;
    type Tx = MockTx;
    type Rows = MockRows;
    type Row = MockRow;
    type CommandTag = MockCommandTag;
    type Param = i64;
    type Error = MockPoolError;

    async fn begin_tx(
        &self,
        ctx: &ShardContext,
        opts: Self::TxOptions,
    ) -> Result<Self::Tx, Self::Error> {
        self.record(MockPoolCall::BeginTx {
            ctx: ctx.clone(),
            opts,
        });
        self.outcome(|pool| MockTx { pool })
    }

    async fn begin(&self, ctx: &ShardContext) -> Result<Self::Tx, Self::Error> {
        self.record(MockPoolCall::Begin { ctx: ctx.clone() });
        self.outcome(|pool| MockTx { pool })
    }

    async fn query(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::Rows, Self::Error> {
        self.record(MockPoolCall::Query {
            ctx: ctx.clone(),
            statement: statement.to_owned(),
            args: collect_args(args),
        });
        self.outcome(|pool| MockRows {
            pool,
            statement: statement.to_owned(),
        })
    }

    async fn query_row(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Self::Row {
        self.record(MockPoolCall::QueryRow {
            ctx: ctx.clone(),
            statement: statement.to_owned(),
            args: collect_args(args),
        });
        MockRow::new(self.outcome(|_| self.row_value))
    }

    async fn exec(
        &self,
        ctx: &ShardContext,
        statement: &str,
        args: &[&Self::Param],
    ) -> Result<Self::CommandTag, Self::Error> {
        self.record(MockPoolCall::Exec {
            ctx: ctx.clone(),
            statement: statement.to_owned(),
            args: collect_args(args),
        });
        self.outcome(|pool| MockCommandTag {
            pool,
            rows_affected: args.len() as u64,
        })
    }

    async fn transactional(
        &self,
        ctx: &ShardContext,
        f: TxFn<Self::Error>,
    ) -> Result<(), Self::Error> {
        self.record(MockPoolCall::Transactional { ctx: ctx.clone() });
        self.outcome(|_| ())?;
        f(ctx).await
    }
}

/// A [`Picker`] returning a fixed [`ShardIndex`] and recording every call.
#[derive(Debug)]
pub(crate) struct MockPicker {
    ret: ShardIndex,
    calls: Mutex<Vec<(ShardContext, String)>>,
}

impl MockPicker {
    pub(crate) fn new(ret: impl Into<ShardIndex>) -> Self {
        Self {
            ret: ret.into(),
            calls: Default::default(),
        }
    }

    pub(crate) fn calls(&self) -> Vec<(ShardContext, String)> {
        self.calls.lock().clone()
    }
}

impl Picker for MockPicker {
    fn pick(&self, ctx: &ShardContext, key: &str) -> ShardIndex {
        self.calls.lock().push((ctx.clone(), key.to_owned()));
        self.ret
    }
}
