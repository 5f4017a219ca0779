mod sequence_format;

pub use sequence_format::{order_number, ticket_number, ORDER_SEQUENCE, TICKET_SEQUENCE_PREFIX, USER_SEQUENCE};
