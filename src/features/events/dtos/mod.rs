pub mod event_dto;
pub mod event_query;

pub use event_dto::*;
pub use event_query::*;
