use terr::templated_error;

#[templated_error("Unclosed {field")]
struct Broken;

fn main() {}
