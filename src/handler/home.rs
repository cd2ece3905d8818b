use crate::http::build_text_response;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};

/// `/` - fixed greeting
pub async fn home<B>(_req: Request<B>) -> Response<Full<Bytes>> {
    build_text_response(StatusCode::OK, "Home Page")
}
