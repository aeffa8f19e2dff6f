pub mod component;
pub mod fields;
pub mod machine;
pub mod messages;
pub mod notify;
pub mod payload;
pub mod registry;
pub mod validation;

/// Backend path for employee status requests, relative to the API base.
pub const ENDPOINT: &str = "/employee-requests";

pub use component::{FormContext, ProbeReport, RequestForm, SubmitOutcome};
pub use fields::{Field, FormState, POSITIONS};
pub use machine::{FormEvent, FormMachine, SubmissionStatus, TransitionError};
pub use notify::{Notifier, Toast, ToastKind, ToastQueue};
pub use registry::FormRegistry;
