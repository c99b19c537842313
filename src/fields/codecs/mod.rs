//! Built-in codecs, one per component type

pub mod criteria;
pub mod date;
pub mod instructional;
pub mod key_value_rows;
pub mod list;
pub mod questions;
pub mod range;
pub mod table;

pub use criteria::WeightedCriteriaCodec;
pub use date::{parse_iso_date, DatePickerCodec};
pub use instructional::InstructionalTextCodec;
pub use key_value_rows::DynamicKeyValueTableCodec;
pub use list::DynamicListCodec;
pub use questions::QuestionListCodec;
pub use range::NumberRangeCodec;
pub use table::KeyValueTableCodec;
