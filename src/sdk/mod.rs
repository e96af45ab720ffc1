//! # Cloud SDK
//!
//! The capability layer between the engine and function code. A
//! [`SdkFactory`] builds one [`CloudSdk`] bundle per invocation; the bundle
//! is the function's entire interface to the outside world.

pub mod bundle;
pub mod errors;
pub mod events;
pub mod factory;
pub mod fetch;
pub mod shared;
pub mod tokens;

pub use bundle::{CloudSdk, NestedInvoke};
pub use errors::{SdkError, SdkResult};
pub use events::{EventBus, InProcessBus};
pub use factory::SdkFactory;
pub use fetch::{FetchRequest, FetchResponse, HttpFetch, ReqwestFetch};
pub use shared::SharedPreferences;
pub use tokens::{TokenClaims, TokenService};
