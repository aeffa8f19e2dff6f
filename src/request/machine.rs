use super::fields::{Field, FormState};
use super::validation::{self, Violation};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    NotSubmitted,
    Submitted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    FieldChanged(Field, String),
    SubmitRequested,
    /// Result of the request issued by the instance with this mount generation.
    SubmitSucceeded(u64),
    SubmitFailed(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The instance already submitted; there is no form left to act on.
    AlreadySubmitted,
    /// A submission is in flight.
    InFlight,
    /// A result arrived with no submission in flight.
    NotInFlight,
    /// The result belongs to an instance that has since been replaced.
    Remounted,
    Invalid(Vec<Violation>),
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionError::AlreadySubmitted => write!(f, "Request already submitted"),
            TransitionError::InFlight => write!(f, "A submission is already in progress"),
            TransitionError::NotInFlight => write!(f, "No submission in progress"),
            TransitionError::Remounted => write!(f, "Form was remounted"),
            TransitionError::Invalid(violations) => {
                let parts: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
                write!(f, "Invalid form: {}", parts.join("; "))
            }
        }
    }
}

/// One form-component instance: the entered values, whether it has
/// submitted, and whether a submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormMachine {
    pub form: FormState,
    pub status: SubmissionStatus,
    pub busy: bool,
    /// Identifies this mount. Results carrying another generation are refused.
    pub generation: u64,
}

impl FormMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mounted(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }

    /// Apply an event in place. On rejection the machine is left untouched.
    pub fn apply(&mut self, event: FormEvent) -> Result<(), TransitionError> {
        *self = transition(self, event)?;
        Ok(())
    }
}

/// Next state for `event`, or why the event is not allowed now.
pub fn transition(state: &FormMachine, event: FormEvent) -> Result<FormMachine, TransitionError> {
    match event {
        FormEvent::FieldChanged(field, value) => {
            if state.is_submitted() {
                return Err(TransitionError::AlreadySubmitted);
            }
            Ok(FormMachine {
                form: state.form.with(field, value),
                ..state.clone()
            })
        }
        FormEvent::SubmitRequested => {
            if state.is_submitted() {
                return Err(TransitionError::AlreadySubmitted);
            }
            if state.busy {
                return Err(TransitionError::InFlight);
            }
            let violations = validation::validate(&state.form);
            if !violations.is_empty() {
                return Err(TransitionError::Invalid(violations));
            }
            Ok(FormMachine {
                busy: true,
                ..state.clone()
            })
        }
        FormEvent::SubmitSucceeded(generation) => {
            if generation != state.generation {
                return Err(TransitionError::Remounted);
            }
            if !state.busy {
                return Err(TransitionError::NotInFlight);
            }
            Ok(FormMachine {
                busy: false,
                status: SubmissionStatus::Submitted,
                ..state.clone()
            })
        }
        FormEvent::SubmitFailed(generation) => {
            if generation != state.generation {
                return Err(TransitionError::Remounted);
            }
            if !state.busy {
                return Err(TransitionError::NotInFlight);
            }
            Ok(FormMachine {
                busy: false,
                ..state.clone()
            })
        }
    }
}
