pub mod response_builder;
pub mod time;

pub use response_builder::ResponseBuilder;
pub use time::{format_gmt, gmt_timestamp};
