mod container;
mod injectable;

pub use container::{BindingBuilder, Container, ScopedBinding};
pub use injectable::Injectable;
