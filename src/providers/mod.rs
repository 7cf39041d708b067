pub mod http;
pub mod swop;

pub use http::HttpTransport;
pub use swop::SwopRateProvider;
