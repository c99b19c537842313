//! Answer store and value shapes

pub mod store;
pub mod value;

pub use store::{AnswerStore, FieldPath, FormData};
pub use value::{
    new_row_id, FieldValue, KeyValueRow, ListItem, NumberRange, QuantityChoice, WeightedCriterion,
};
