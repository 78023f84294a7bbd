pub mod consts;
pub mod proxy;
pub mod tls;
