use terr::{ErrorKind, subs, templated_error};

#[templated_error("Missing field {field}.", categories("validation"))]
pub struct MissingField;

fn main() {
    let err = MissingField::raise(subs! { field = "email" }).unwrap();
    assert_eq!(err.to_string(), "Missing field email.");
}
