//! Field definition and option metadata types

use serde::Deserialize;
use serde::Serialize;

/// The data type of a field (column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    /// Plain text.
    Text,
    /// The primary title field.
    Title,
    /// Numeric field.
    Number,
    /// ISO-8601 date string.
    Date,
    /// URL field.
    Link,
    /// Single-select option field.
    SingleSelect,
    /// Multi-select option field.
    MultiSelect,
    /// Assignee reference (option id into the people catalog).
    Assignee,
    /// Iteration/sprint reference (option id into the iteration catalog).
    Iteration,
}

impl FieldType {
    /// Returns true if cells of this type hold a single option id.
    pub fn is_select(&self) -> bool {
        matches!(
            self,
            FieldType::SingleSelect | FieldType::Assignee | FieldType::Iteration
        )
    }

    /// Returns true if cells of this type hold a list of option ids.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, FieldType::MultiSelect)
    }

    /// Returns true if cells resolve through the field's option catalog.
    pub fn uses_options(&self) -> bool {
        self.is_select() || self.is_multi_select()
    }

    /// Returns true if this is a numeric field type.
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Number)
    }
}

/// A selectable option for select-typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// The stable option id stored in cells.
    pub id: String,
    /// The human-readable label.
    pub label: String,
    /// Display color, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Longer description, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectOption {
    /// Creates a new option.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: None,
            description: None,
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Definition of a table column.
///
/// Field definitions are owned by the caller and treated as an immutable
/// catalog for the duration of one transformation pass; the engine borrows
/// them and never copies the catalog.
///
/// # Example
///
/// ```
/// use tablekit_lib::model::{FieldDefinition, FieldType, SelectOption};
///
/// let status = FieldDefinition::new("status", "Status", FieldType::SingleSelect)
///     .with_options(vec![
///         SelectOption::new("opt_todo", "Todo"),
///         SelectOption::new("opt_done", "Done"),
///     ]);
/// let notes = FieldDefinition::new("notes", "Notes", FieldType::Text).hidden();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The stable field id referenced by rows, filters, sorts, and views.
    pub id: String,

    /// The display name shown in the column header.
    pub name: String,

    /// The field's data type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field participates in unscoped search and default views.
    #[serde(default = "default_visible")]
    pub visible: bool,

    /// Options for select-typed fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,

    /// Preferred column width, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
}

fn default_visible() -> bool {
    true
}

impl FieldDefinition {
    /// Creates a new visible field definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            visible: true,
            options: Vec::new(),
            width: None,
        }
    }

    /// Marks the field as hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Sets the option catalog.
    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    /// Sets the preferred column width.
    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Looks up an option label by id.
    pub fn option_label(&self, id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.label.as_str())
    }
}

/// Finds a field definition by id in a catalog.
pub fn find_field<'a>(fields: &'a [FieldDefinition], id: &str) -> Option<&'a FieldDefinition> {
    fields.iter().find(|f| f.id == id)
}
