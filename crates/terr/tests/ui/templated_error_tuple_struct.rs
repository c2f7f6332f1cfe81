use terr::templated_error;

#[templated_error("Bad value")]
struct BadValue(String);

fn main() {}
