mod response;

pub use response::{Envelope, ResponseStatus};
