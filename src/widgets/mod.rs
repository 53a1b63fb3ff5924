pub mod scrollable_paragraph;
pub mod text_field;
