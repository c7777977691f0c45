use serde::{Deserialize, Serialize};

/// Current content of one form control group, keyed by field name in the
/// model. The shape matches the field kind declared in the schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ControlValue {
    /// Text inputs, number inputs and selects.
    Scalar(String),
    /// Checkboxes.
    Flag(bool),
    /// The four inputs of a composite address, in order.
    Quad([String; 4]),
}

impl ControlValue {
    /// The scalar text, empty for other shapes.
    pub fn text(&self) -> &str {
        match self {
            ControlValue::Scalar(s) => s,
            _ => "",
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ControlValue::Flag(true))
    }
}

/// Content of the reserved tab 0 panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Panel {
    pub title: String,
    pub text: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Panel { title: title.into(), text: text.into() }
    }
}
