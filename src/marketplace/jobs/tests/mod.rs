pub(crate) mod common;

mod validation;
