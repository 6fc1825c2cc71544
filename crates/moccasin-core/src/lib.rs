//! Embeddable method mocking with call-stack caller resolution.
//!
//! A host struct owns a [`MockRegistry`]; each method that should be
//! mockable asks the registry at call time whether a response was attached
//! for it. The registry identifies the asking method by walking the live
//! call stack, so methods never pass their own name.
//!
//! # Example
//!
//! ```ignore
//! use moccasin_core::{values, MockRegistry};
//!
//! struct Client {
//!     mocks: MockRegistry,
//! }
//!
//! impl Client {
//!     fn region(&self) -> String {
//!         if self.mocks.mocked(true) {
//!             return self.mocks.get_as(0).unwrap_or_default();
//!         }
//!         "eu-west-1".to_string()
//!     }
//! }
//!
//! let client = Client { mocks: MockRegistry::new() };
//! client.mocks.attach("region").returns(values![String::from("local")]);
//! assert_eq!(client.region(), "local");
//! ```
//!
//! Consultation (`mocked(true)`) advances multi-response queues by one
//! simulated call; fetching (`get`/`get_as`) only peeks at the tuple the
//! last consultation settled on. Every failure mode (unresolvable caller,
//! missing entry, exhausted queue, out-of-range slot, type mismatch)
//! degrades to the method's own default behavior rather than an error.
//!
//! Stack resolution needs symbol names in the running binary. Builds that
//! strip symbols or aggressively inline host methods should use the
//! name-keyed variants ([`MockRegistry::mocked_as`],
//! [`MockRegistry::get_from`]) instead.

mod caller;
pub mod mocks;
pub mod value;

pub use mocks::{MockHandle, MockRegistry, MockResponse};
pub use value::MockValue;
