//! Command surface for the patient core.
//!
//! Every command returns a serializable [`ApiResponse`] envelope so callers
//! can forward results as JSON without inspecting core error types.

pub mod api;
pub mod error;
pub mod response;
pub mod settings;
pub mod snapshot_file;

pub use api::{core_version, init_logging, ping, shared, PatientApi};
pub use error::{ApiError, ApiResult};
pub use response::{
    ActivityListData, ApiResponse, ExportDocument, PatientListData, ProcessData, QueueAddData,
    SnapshotFileData, WaitingListData,
};
pub use settings::{ApiSettings, DEFAULT_RECENT_ACTIVITY_COUNT};
