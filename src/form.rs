//! Line-item form: named input fields inside an explicit container
//!
//! The container is handed to whoever reads it, instead of being found
//! by walking surrounding structure, so form state stays testable.

/// Field names the relay reads from the container
pub const DESCRIPTION: &str = "description";
pub const QUANTITY: &str = "quantity";
pub const AMOUNT: &str = "amount";

/// A single named text input
#[derive(Debug, Clone)]
pub struct InputField {
    name: String,
    value: String,
}

impl InputField {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, "")
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

/// The grouping container for one line item's inputs
#[derive(Debug, Clone)]
pub struct LineItemForm {
    fields: Vec<InputField>,
}

impl LineItemForm {
    /// Standard three-field line-item form
    pub fn new() -> Self {
        Self {
            fields: vec![
                InputField::new(DESCRIPTION),
                InputField::new(QUANTITY),
                InputField::new(AMOUNT),
            ],
        }
    }

    /// Container with an arbitrary field set (some may be missing)
    pub fn with_fields(fields: Vec<InputField>) -> Self {
        Self { fields }
    }

    /// Current value of a field, or None when no such field exists
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value())
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut InputField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Reset every field's value, keeping the field set itself
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
    }
}

impl Default for LineItemForm {
    fn default() -> Self {
        Self::new()
    }
}
