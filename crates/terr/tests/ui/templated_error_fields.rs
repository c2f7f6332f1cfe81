use terr::templated_error;

#[templated_error(template = "Program unexpectedly failed with input args: {args}.")]
pub struct ProgramFailed {
    pub args: Vec<String>,
}

fn main() {
    let err = ProgramFailed { args: vec!["myprogram".to_owned()] }.into_error().unwrap();
    assert_eq!(err.to_string(), "Program unexpectedly failed with input args: ['myprogram'].");
}
