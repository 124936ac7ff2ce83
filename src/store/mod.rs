//! Observable client-side stores
//!
//! Each store owns its state in a `watch` channel; callers read snapshots or
//! subscribe for changes.

mod auth;
mod detail;
mod events;
mod observable;
mod organization;

pub use auth::{AuthState, AuthStore};
pub use detail::{DetailState, MatchStore, PlayerStore};
pub use events::{EventsState, EventsStore, SCHEDULE_LIMIT};
pub use observable::Observable;
pub use organization::{OrganizationState, OrganizationStore};
