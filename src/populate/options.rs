//! Options for a populate call
//!
//! `PopulateOptions` holds synchronous callbacks, `AsyncPopulateOptions`
//! holds callbacks that return futures. Any synchronous options convert into
//! the asynchronous form, so one async call site can serve both.

use futures::future::{self, BoxFuture};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Stand-in aggregate callback type for options built without `use`
pub type NoAggregate<A> = fn(&[Option<Value>]) -> anyhow::Result<A>;

/// Asynchronous aggregate callback
pub type AsyncAggregateFn<'a, A> =
    Box<dyn FnMut(Vec<Option<Value>>) -> BoxFuture<'a, anyhow::Result<A>> + Send + 'a>;

/// Asynchronous per-item callback
pub type AsyncEachFn<'a, A> =
    Box<dyn FnMut(Option<Value>, Arc<A>) -> BoxFuture<'a, anyhow::Result<Value>> + Send + 'a>;

/// Where the aggregate handed to `each` comes from
pub(crate) enum AggregateSource<F, A> {
    /// No `use` callback; `each` receives this value
    Fixed(A),
    /// Computed from every read value before the first `each`
    Callback(F),
}

impl<F, A> AggregateSource<F, A> {
    pub(crate) fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }
}

/// Options for [`populate`](super::populate)
///
/// `U` is the `use` callback and `F` the `each` callback. Neither needs to be
/// `Send`: the synchronous loop never leaves the calling thread.
pub struct PopulateOptions<A, U, F> {
    pub(crate) write_as: Option<String>,
    pub(crate) unique: bool,
    pub(crate) aggregate: AggregateSource<U, A>,
    pub(crate) each: F,
}

impl<F> PopulateOptions<(), NoAggregate<()>, F> {
    /// Options running `each` for every item, without an aggregate
    pub fn new(each: F) -> Self
    where
        F: FnMut(Option<&Value>, &()) -> anyhow::Result<Value>,
    {
        Self {
            write_as: None,
            unique: false,
            aggregate: AggregateSource::Fixed(()),
            each,
        }
    }
}

impl<A, U, F> PopulateOptions<A, U, F> {
    /// Options computing an aggregate with `use_fn` once, then running `each`
    pub fn with_aggregate(use_fn: U, each: F) -> Self
    where
        U: FnMut(&[Option<Value>]) -> anyhow::Result<A>,
        F: FnMut(Option<&Value>, &A) -> anyhow::Result<Value>,
    {
        Self {
            write_as: None,
            unique: false,
            aggregate: AggregateSource::Callback(use_fn),
            each,
        }
    }

    /// Write results to `path` instead of overwriting the read path
    pub fn write_as(mut self, path: impl Into<String>) -> Self {
        self.write_as = Some(path.into());
        self
    }

    /// Run `each` once per distinct read value
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

impl<A, U, F> fmt::Debug for PopulateOptions<A, U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulateOptions")
            .field("write_as", &self.write_as)
            .field("unique", &self.unique)
            .field("aggregate", &self.aggregate.is_callback())
            .finish_non_exhaustive()
    }
}

/// Options for [`populate_async`](super::populate_async)
pub struct AsyncPopulateOptions<'a, A = ()> {
    pub(crate) write_as: Option<String>,
    pub(crate) unique: bool,
    pub(crate) aggregate: AggregateSource<AsyncAggregateFn<'a, A>, A>,
    pub(crate) each: AsyncEachFn<'a, A>,
}

impl<'a> AsyncPopulateOptions<'a, ()> {
    /// Options awaiting `each` for every item, without an aggregate
    pub fn new<F, Fut>(mut each: F) -> Self
    where
        F: FnMut(Option<Value>, Arc<()>) -> Fut + Send + 'a,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'a,
    {
        Self {
            write_as: None,
            unique: false,
            aggregate: AggregateSource::Fixed(()),
            each: Box::new(
                move |value: Option<Value>, aggregate: Arc<()>| -> BoxFuture<'a, anyhow::Result<Value>> {
                    Box::pin(each(value, aggregate))
                },
            ),
        }
    }
}

impl<'a, A> AsyncPopulateOptions<'a, A>
where
    A: Send + Sync + 'a,
{
    /// Options awaiting `use_fn` once, then awaiting `each` per item
    pub fn with_aggregate<U, UFut, F, Fut>(mut use_fn: U, mut each: F) -> Self
    where
        U: FnMut(Vec<Option<Value>>) -> UFut + Send + 'a,
        UFut: Future<Output = anyhow::Result<A>> + Send + 'a,
        F: FnMut(Option<Value>, Arc<A>) -> Fut + Send + 'a,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'a,
    {
        Self {
            write_as: None,
            unique: false,
            aggregate: AggregateSource::Callback(Box::new(
                move |values: Vec<Option<Value>>| -> BoxFuture<'a, anyhow::Result<A>> {
                    Box::pin(use_fn(values))
                },
            )),
            each: Box::new(
                move |value: Option<Value>, aggregate: Arc<A>| -> BoxFuture<'a, anyhow::Result<Value>> {
                    Box::pin(each(value, aggregate))
                },
            ),
        }
    }
}

impl<A> AsyncPopulateOptions<'_, A> {
    /// Write results to `path` instead of overwriting the read path
    pub fn write_as(mut self, path: impl Into<String>) -> Self {
        self.write_as = Some(path.into());
        self
    }

    /// Await `each` once per distinct read value
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

impl<A> fmt::Debug for AsyncPopulateOptions<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncPopulateOptions")
            .field("write_as", &self.write_as)
            .field("unique", &self.unique)
            .field("aggregate", &self.aggregate.is_callback())
            .finish_non_exhaustive()
    }
}

impl<'a, A, U, F> From<PopulateOptions<A, U, F>> for AsyncPopulateOptions<'a, A>
where
    A: Send + Sync + 'a,
    U: FnMut(&[Option<Value>]) -> anyhow::Result<A> + Send + 'a,
    F: FnMut(Option<&Value>, &A) -> anyhow::Result<Value> + Send + 'a,
{
    fn from(options: PopulateOptions<A, U, F>) -> Self {
        let aggregate = match options.aggregate {
            AggregateSource::Fixed(value) => AggregateSource::Fixed(value),
            AggregateSource::Callback(mut use_fn) => AggregateSource::Callback(Box::new(
                move |values: Vec<Option<Value>>| -> BoxFuture<'a, anyhow::Result<A>> {
                    Box::pin(future::ready(use_fn(&values)))
                },
            ) as AsyncAggregateFn<'a, A>),
        };

        let mut each = options.each;
        Self {
            write_as: options.write_as,
            unique: options.unique,
            aggregate,
            each: Box::new(
                move |value: Option<Value>, aggregate: Arc<A>| -> BoxFuture<'a, anyhow::Result<Value>> {
                    Box::pin(future::ready(each(value.as_ref(), &*aggregate)))
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_sets_fields() {
        let options = PopulateOptions::new(|_, _| Ok(json!(1)))
            .write_as("target")
            .unique(true);

        assert_eq!(options.write_as.as_deref(), Some("target"));
        assert!(options.unique);
        assert!(!options.aggregate.is_callback());
    }

    #[test]
    fn test_with_aggregate_marks_callback() {
        let options = PopulateOptions::with_aggregate(|values| Ok(values.len()), |_, count| {
            Ok(json!(*count))
        });
        assert!(options.aggregate.is_callback());
        assert!(!options.unique);
        assert!(options.write_as.is_none());
    }

    #[test]
    fn test_debug_output() {
        let options = PopulateOptions::new(|_, _| Ok(Value::Null)).write_as("x");
        let debug = format!("{:?}", options);
        assert!(debug.contains("PopulateOptions"));
        assert!(debug.contains("write_as: Some(\"x\")"));
        assert!(debug.contains("unique: false"));
    }

    #[test]
    fn test_sync_options_convert_to_async() {
        let options = PopulateOptions::new(|_, _| Ok(json!("ok")))
            .write_as("out")
            .unique(true);
        let mut converted: AsyncPopulateOptions<'_, ()> = options.into();

        assert_eq!(converted.write_as.as_deref(), Some("out"));
        assert!(converted.unique);

        let result = tokio_test::block_on((converted.each)(None, Arc::new(())));
        assert_eq!(result.unwrap(), json!("ok"));
    }

    #[test]
    fn test_converted_aggregate_sees_values() {
        let options = PopulateOptions::with_aggregate(
            |values| Ok(values.iter().flatten().count()),
            |_, count| Ok(json!(*count)),
        );
        let converted: AsyncPopulateOptions<'_, usize> = options.into();

        let AggregateSource::Callback(mut use_fn) = converted.aggregate else {
            panic!("aggregate callback should survive conversion");
        };
        let count = tokio_test::block_on(use_fn(vec![Some(json!(1)), None, Some(json!(2))]));
        assert_eq!(count.unwrap(), 2);
    }
}
