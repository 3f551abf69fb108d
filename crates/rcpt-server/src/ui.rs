/// Single-page web UI, compiled into the binary.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");
