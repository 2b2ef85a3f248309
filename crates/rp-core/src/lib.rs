//! `rp-core` — foundational types for the `rust_rp` ride-pooling simulator.
//!
//! This crate is a dependency of every other `rp-*` crate.  It intentionally
//! has no `rp-*` dependencies and no mandatory external ones (only optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`ids`]      | `VehicleId`, `RequestId`                                |
//! | [`time`]     | `Time`, `TimeWindow`                                    |
//! | [`location`] | the `Location` capability trait                         |
//! | [`request`]  | `TransportationRequest`, `InternalRequest`              |
//! | [`stop`]     | `StopAction`, `Stop`, `Stoplist`                        |
//! | [`events`]   | `StopEvent`, `RequestEvent`, `Event`                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod events;
pub mod ids;
pub mod location;
pub mod request;
pub mod stop;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use events::{Event, RequestEvent, StopEvent};
pub use ids::{RequestId, VehicleId};
pub use location::Location;
pub use request::{InternalRequest, TransportationRequest};
pub use stop::{Stop, StopAction, StopRequest, Stoplist};
pub use time::{Time, TimeWindow};
