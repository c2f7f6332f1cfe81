use terr::templated_error;

#[templated_error(template = "a", template = "b")]
struct Twice;

fn main() {}
