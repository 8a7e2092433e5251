//! Concrete field types.
//!
//! Each type owns a typed settings struct decoded from the builder wire
//! payload and implements the [`FormField`](crate::field::FormField)
//! contract.

mod checkboxes;
mod dropdown;
mod email;
mod hidden;
mod multi_line_text;
mod number;
mod phone;
mod single_line_text;

pub use checkboxes::{Checkboxes, CheckboxesSettings};
pub use dropdown::{Dropdown, DropdownSettings};
pub use email::{Email, EmailSettings};
pub use hidden::{Hidden, HiddenSettings};
pub use multi_line_text::{MultiLineText, MultiLineTextSettings};
pub use number::{NumberField, NumberSettings};
pub use phone::{Phone, PhoneSettings};
pub use single_line_text::{SingleLineText, SingleLineTextSettings};

use serde::{Deserialize, Serialize};

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
    pub is_default: bool,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            is_default: false,
        }
    }
}
