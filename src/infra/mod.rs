pub mod csv_output;
pub mod http_client;

pub use http_client::ReqwestFetcher;
