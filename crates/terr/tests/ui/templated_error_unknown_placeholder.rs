use terr::templated_error;

#[templated_error("Missing {field} in {table}")]
struct MissingColumn {
    field: String,
}

fn main() {}
