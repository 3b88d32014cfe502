//! Editing session for a live proof-analysis backend.
//!
//! [`SessionController`] composes an editor surface, a [`StatusTracker`] and a
//! [`FeedbackSynchronizer`] into one session. Cursor moves turn into point
//! queries whose stale answers are dropped; diagnostics pushed by the backend
//! are filtered to the open document as they arrive. Around that sit the
//! load/save workflow, query-string persistence and the layout policy.

pub mod buffer;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod feedback;
pub mod fetch;
pub mod layout;
pub mod persistence;
pub mod status;

pub use buffer::{DocumentSurface, RopeBuffer};
pub use config::{DEFAULT_CONTENT, DocPreviewConfig, FetchConfig, SessionConfig};
pub use controller::{DocumentSession, SessionController, SessionView};
pub use error::{ConfigError, FetchError, Result, SessionError};
pub use export::ExportedFile;
pub use feedback::{FeedbackPanel, FeedbackSynchronizer, PanelColor, QueryHandle, QueryOutcome, RenderModel};
pub use fetch::{Fetcher, HttpFetcher};
pub use layout::{Geometry, InfoPanelExtent, Orientation};
pub use persistence::{CODE_PARAM, HistorySink, MemoryHistory, Persistence, QueryParams, StartupDocument, URL_PARAM};
pub use status::{StatusTracker, StatusView};
