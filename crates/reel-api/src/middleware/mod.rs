pub mod cross_origin;
pub mod request_id;

pub use cross_origin::cross_origin_middleware;
pub use request_id::request_id_middleware;
