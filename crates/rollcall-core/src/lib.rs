//! # Rollcall Core
//!
//! Core types shared by every layer of the Rollcall dashboard client.
//!
//! - [`errors`]: the client error taxonomy and per-field form errors
//! - [`envelope`]: the `{ data: ... }` response envelope adapter
//! - [`notify`]: transient user-facing notifications (toasts)
//! - [`storage`]: durable client-side storage for persisted state blobs
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::envelope::decode;
//! use rollcall_core::errors::ClientError;
//!
//! let departments: Vec<Department> = decode(body)?;
//! ```

pub mod envelope;
pub mod errors;
pub mod notify;
pub mod storage;

// Re-export commonly used types at crate root
pub use envelope::{decode, pluck, unwrap_envelope};
pub use errors::{ClientError, FieldErrors};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{LocalStateStorage, MemoryStateStorage, StateStorage, StorageError};
