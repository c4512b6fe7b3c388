mod common;
mod http_flow;
