pub mod document_check;
pub mod geocode;
