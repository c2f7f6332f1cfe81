use std::net::IpAddr;
use std::path::PathBuf;
use terr::templated_error;

#[templated_error("Host {host} unreachable, cache at {cache}")]
pub struct Unreachable {
    #[templated(display)]
    pub host: IpAddr,
    #[templated(debug)]
    pub cache: PathBuf,
}

fn main() {
    let err = Unreachable { host: [127, 0, 0, 1].into(), cache: PathBuf::from("/tmp") }
        .into_error()
        .unwrap();
    assert_eq!(err.to_string(), "Host 127.0.0.1 unreachable, cache at \"/tmp\"");
}
