//! Client side of the tracker: a typed HTTP client, the local list state with
//! its derived view, and the persisted CLI session.

pub mod api;
pub mod session;
pub mod state;
pub mod view;

pub use api::{ClientError, TodoClient};
pub use session::Session;
pub use state::{Draft, TodoListState};
pub use view::{derive_view, CategoryFilter, PriorityFilter, ViewFilter};
