use super::fields::{Field, FormState, POSITIONS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field.name(), self.message)
    }
}

/// Check the input constraints that gate submission. Skills is optional.
/// Values are checked trimmed, which is also how they are sent.
pub fn validate(form: &FormState) -> Vec<Violation> {
    let mut violations = Vec::new();

    let position = form.position.trim();
    if position.is_empty() {
        violations.push(violation(Field::Position, "Please select a position"));
    } else if !POSITIONS.contains(&position) {
        violations.push(violation(Field::Position, "Please select one of the offered positions"));
    }

    let experience = form.experience.trim();
    if experience.is_empty() {
        violations.push(violation(Field::Experience, "Please enter your years of experience"));
    } else {
        match experience.parse::<f64>() {
            Ok(years) if !years.is_finite() => {
                violations.push(violation(Field::Experience, "Experience must be a number"))
            }
            Ok(years) if years < 0.0 => {
                violations.push(violation(Field::Experience, "Experience must be 0 or more"))
            }
            // step=1 on the number input
            Ok(years) if years.fract() != 0.0 => violations.push(violation(
                Field::Experience,
                "Experience must be a whole number of years",
            )),
            Ok(_) => {}
            Err(_) => violations.push(violation(Field::Experience, "Experience must be a number")),
        }
    }

    if form.message.trim().is_empty() {
        violations.push(violation(
            Field::Message,
            "Please tell us why you want to become an employee",
        ));
    }

    violations
}

fn violation(field: Field, message: &str) -> Violation {
    Violation {
        field,
        message: message.to_string(),
    }
}
