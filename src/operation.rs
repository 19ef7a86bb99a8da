use crate::key::Key;
use crate::value::Value;

/// The effect of applying a `Modification`'s `update_fn` result, per
/// the table below.
pub enum UpdateFn<E> {
    /// Called at most once, with the current value at the operation's
    /// key (`None` if absent). `FnOnce` mirrors that the modify walk
    /// invokes it exactly once, at the unique candidate leaf the
    /// descent identifies.
    #[allow(clippy::type_complexity)]
    Boxed(Box<dyn FnOnce(Option<Value>) -> Result<Option<Value>, E>>),
}

impl<E> UpdateFn<E> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(Option<Value>) -> Result<Option<Value>, E> + 'static,
    {
        UpdateFn::Boxed(Box::new(f))
    }

    pub fn call(self, current: Option<Value>) -> Result<Option<Value>, E> {
        match self {
            UpdateFn::Boxed(f) => f(current),
        }
    }
}

/// The kind of a single batch entry: a read-only lookup, or a
/// modification driven by an `update_fn`.
pub enum OpKind<E> {
    Lookup,
    Modification(UpdateFn<E>),
}

/// A single batch entry: a key plus what to do with it.
pub struct Operation<E> {
    pub key: Key,
    pub kind: OpKind<E>,
}

impl<E> Operation<E> {
    pub fn lookup(key: Key) -> Self {
        Operation {
            key,
            kind: OpKind::Lookup,
        }
    }

    pub fn modification<F>(key: Key, update_fn: F) -> Self
    where
        F: FnOnce(Option<Value>) -> Result<Option<Value>, E> + 'static,
    {
        Operation {
            key,
            kind: OpKind::Modification(UpdateFn::new(update_fn)),
        }
    }

    /// Convenience matching the common case: unconditionally insert or
    /// replace `value`.
    pub fn upsert(key: Key, value: Value) -> Self {
        Operation::modification(key, move |_current| Ok(Some(value)))
    }

    /// Convenience matching the common case: unconditionally delete
    /// the key if present. A missing key is a no-op.
    pub fn delete(key: Key) -> Self {
        Operation::modification(key, |_current| Ok(None))
    }
}
