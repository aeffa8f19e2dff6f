use serde::Deserialize;

/// Positions offered in the "Desired Position" select.
pub const POSITIONS: [&str; 5] = [
    "Laundry Attendant",
    "Dry Cleaning Specialist",
    "Customer Service",
    "Delivery Driver",
    "Manager",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Position,
    Experience,
    Skills,
    Message,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Position => "position",
            Field::Experience => "experience",
            Field::Skills => "skills",
            Field::Message => "message",
        }
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(Field::Position),
            "experience" => Ok(Field::Experience),
            "skills" => Ok(Field::Skills),
            "message" => Ok(Field::Message),
            other => Err(format!("Unknown form field: {other}")),
        }
    }
}

/// User-entered values, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormState {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub message: String,
}

impl FormState {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Position => &self.position,
            Field::Experience => &self.experience,
            Field::Skills => &self.skills,
            Field::Message => &self.message,
        }
    }

    /// Copy with one field replaced.
    pub fn with(&self, field: Field, value: String) -> Self {
        let mut next = self.clone();
        match field {
            Field::Position => next.position = value,
            Field::Experience => next.experience = value,
            Field::Skills => next.skills = value,
            Field::Message => next.message = value,
        }
        next
    }

    /// The four fields in form order, for replaying a full form post as field updates.
    pub fn entries(&self) -> [(Field, &str); 4] {
        [
            (Field::Position, &self.position),
            (Field::Experience, &self.experience),
            (Field::Skills, &self.skills),
            (Field::Message, &self.message),
        ]
    }
}
