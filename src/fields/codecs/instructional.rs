//! InstructionalText: display-only, never stored

use crate::answers::FieldValue;
use crate::blueprint::{Component, ComponentType};
use crate::fields::codec::{Advisory, FieldCodec, FieldEdit, FieldError};

pub struct InstructionalTextCodec;

impl FieldCodec for InstructionalTextCodec {
    fn component_type(&self) -> ComponentType {
        ComponentType::InstructionalText
    }

    fn default_value(&self, _component: &Component) -> Option<FieldValue> {
        None
    }

    fn normalize(&self, _component: &Component, _stored: Option<&FieldValue>) -> Option<FieldValue> {
        None
    }

    fn merge(
        &self,
        _component: &Component,
        _current: FieldValue,
        edit: FieldEdit,
    ) -> Result<FieldValue, FieldError> {
        Err(FieldError::unsupported(self.component_type(), &edit))
    }

    fn validate(&self, _component: &Component, _value: &FieldValue) -> Vec<Advisory> {
        Vec::new()
    }
}
