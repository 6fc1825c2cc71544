//! The embeddable mock registry and its fluent configuration handle.
//!
//! This module provides `MockRegistry`, which a host struct owns as a plain
//! field. Test code attaches responses by method name; the host's methods
//! consult the registry at call time and the registry works out which method
//! is asking by resolving the caller from the stack.

use std::any::Any;
use std::cell::{RefCell, RefMut};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::caller;
use crate::mocks::response::MockResponse;
use crate::value::MockValue;

/// Demangled-symbol marker for this type's frames; the caller resolver skips
/// them when walking up to the host method.
pub(crate) const TYPE_PATH: &str = concat!(module_path!(), "::MockRegistry");

/// Per-host registry of attached mock responses.
///
/// Embed one in the struct whose methods should be mockable and consult it
/// at the top of each such method:
///
/// ```ignore
/// use moccasin_core::{values, MockRegistry};
///
/// struct Client {
///     mocks: MockRegistry,
/// }
///
/// impl Client {
///     fn region(&self) -> String {
///         if self.mocks.mocked(true) {
///             return self.mocks.get_as(0).unwrap_or_default();
///         }
///         "eu-west-1".to_string()
///     }
/// }
///
/// let client = Client { mocks: MockRegistry::new() };
/// client.mocks.attach("region").returns(values![String::from("local")]);
/// assert_eq!(client.region(), "local");
/// ```
///
/// The registry is single-threaded by construction: its interior mutability
/// makes it neither `Send` nor `Sync`, so a host instance cannot be shared
/// across threads. Concurrent tests use one host instance each.
#[derive(Debug)]
pub struct MockRegistry {
    entries: RefCell<HashMap<String, MockResponse>>,
}

impl MockRegistry {
    /// Create an empty registry. Nothing is allocated until the first
    /// attach.
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Register a mock for `method_name`, replacing any existing entry, and
    /// return a handle for configuring its responses.
    ///
    /// The handle borrows the registry for the duration of the fluent chain;
    /// finish configuring within the same statement, before the mocked
    /// method runs.
    pub fn attach(&self, method_name: &str) -> MockHandle<'_> {
        debug!(method = method_name, "mock attached");
        let response = RefMut::map(self.entries.borrow_mut(), |entries| {
            match entries.entry(method_name.to_owned()) {
                Entry::Occupied(mut slot) => {
                    slot.insert(MockResponse::new());
                    slot.into_mut()
                }
                Entry::Vacant(slot) => slot.insert(MockResponse::new()),
            }
        });
        MockHandle { response }
    }

    /// Reopen the handle for an already attached mock, e.g. to queue further
    /// responses between calls. Returns `None` when nothing is attached
    /// under the name.
    pub fn adjust(&self, method_name: &str) -> Option<MockHandle<'_>> {
        let response =
            RefMut::filter_map(self.entries.borrow_mut(), |entries| {
                entries.get_mut(method_name)
            })
            .ok()?;
        Some(MockHandle { response })
    }

    /// Unregister any mock attached to `method_name`. No-op when absent.
    pub fn detach(&self, method_name: &str) {
        debug!(method = method_name, "mock detached");
        self.entries.borrow_mut().remove(method_name);
    }

    /// Unregister every mock on this registry.
    pub fn clear(&self) {
        debug!("all mocks detached");
        self.entries.borrow_mut().clear();
    }

    /// Whether an entry exists for `method_name`, whatever its queue state.
    pub fn attached(&self, method_name: &str) -> bool {
        self.entries.borrow().contains_key(method_name)
    }

    /// Determine whether a mock response is available for the calling
    /// method.
    ///
    /// Pass `consult = true` when the result decides whether the method
    /// short-circuits its real logic: that advances multi-response queues by
    /// one simulated call. Pass `false` to peek at the same answer without
    /// affecting state.
    ///
    /// Resolution failures are not errors; when the caller cannot be
    /// identified the method behaves as unmocked.
    pub fn mocked(&self, consult: bool) -> bool {
        match caller::resolve_caller_name() {
            Ok(name) => self.mocked_as(&name, consult),
            Err(error) => {
                trace!(%error, "caller resolution failed; treating as unmocked");
                false
            }
        }
    }

    /// Name-keyed variant of [`mocked`](Self::mocked), for callers that pass
    /// their own method name, e.g. in builds where symbol names are stripped
    /// or the method may be inlined.
    pub fn mocked_as(&self, method_name: &str, consult: bool) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(response) = entries.get_mut(method_name) else {
            trace!(method = method_name, "no mock registered");
            return false;
        };
        let available = if consult {
            response.consult()
        } else {
            response.has_pending()
        };
        trace!(method = method_name, consult, available, "mock consulted");
        available
    }

    /// Fetch the mocked return value at `index` for the calling method.
    ///
    /// Fetching never advances the queue: every index reads from the tuple
    /// the last consultation settled on, so a method fetches once per return
    /// slot. Absent entries, exhausted queues and out-of-range indexes all
    /// yield `None`.
    pub fn get(&self, index: usize) -> Option<MockValue> {
        match caller::resolve_caller_name() {
            Ok(name) => self.get_from(&name, index),
            Err(error) => {
                trace!(%error, "caller resolution failed; no mock value");
                None
            }
        }
    }

    /// Name-keyed variant of [`get`](Self::get).
    pub fn get_from(&self, method_name: &str, index: usize) -> Option<MockValue> {
        self.entries.borrow().get(method_name)?.slot(index)
    }

    /// Fetch and downcast the mocked return value at `index`.
    ///
    /// A type mismatch yields `None` like any other miss; the host supplies
    /// its own default.
    pub fn get_as<T: Any + Clone>(&self, index: usize) -> Option<T> {
        self.get(index).and_then(|value| value.get())
    }
}

impl Default for MockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent configuration handle for one attached mock.
///
/// Returned by [`MockRegistry::attach`]; each method consumes and returns
/// the handle so calls chain.
#[derive(Debug)]
pub struct MockHandle<'a> {
    response: RefMut<'a, MockResponse>,
}

impl MockHandle<'_> {
    /// Set the response to exactly one return tuple, dropping anything
    /// queued before it.
    pub fn returns(mut self, values: Vec<MockValue>) -> Self {
        self.response.set_returns(values);
        self
    }

    /// Queue one more return tuple after the existing ones; successive
    /// consultations work through the queue in order.
    pub fn add_return(mut self, values: Vec<MockValue>) -> Self {
        self.response.push_return(values);
        self
    }

    /// Serve the current first tuple `times` consultations in total by
    /// queueing copies of it at the tail. Equivalent to calling
    /// [`add_return`](Self::add_return) repeatedly with the same values.
    pub fn times(mut self, times: usize) -> Self {
        self.response.repeat(times);
        self
    }
}
