//! Form body decoding
//!
//! Turns an `application/x-www-form-urlencoded` request body into a
//! [`PostForm`]. Nothing is rejected for its content: undecodable bytes are
//! replaced, unknown keys ignored, and other content types yield an empty
//! form so every field falls back to its default.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::{Request, Response, StatusCode};
use url::form_urlencoded;

use crate::http;
use crate::logger;
use crate::store::PostForm;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Read and decode the request body, answering 413 or 400 on failure
pub async fn read_post_form<B>(
    req: Request<B>,
    max_body_size: u64,
) -> Result<PostForm, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Err(resp);
    }

    let is_form = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        });

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Request body too large (max: {max_body_size} bytes)"
            ));
            return Err(http::build_413_response());
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Err(http::build_text_response(
                StatusCode::BAD_REQUEST,
                "400 Bad Request",
            ));
        }
    };

    if !is_form {
        logger::log_debug("Request body is not a urlencoded form; using defaults");
        return Ok(PostForm::default());
    }
    Ok(parse_post_form(&body))
}

/// Decode urlencoded pairs; the first occurrence of a key wins
pub fn parse_post_form(body: &[u8]) -> PostForm {
    let mut form = PostForm::default();
    for (key, value) in form_urlencoded::parse(body) {
        let slot = match key.as_ref() {
            "author" => &mut form.author,
            "title" => &mut form.title,
            "content" => &mut form.content,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }
    form
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    let size = content_length.to_str().ok()?.parse::<u64>().ok()?;
    if size > max_body_size {
        logger::log_error(&format!(
            "Request body too large: {size} bytes (max: {max_body_size})"
        ));
        return Some(http::build_413_response());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_request(body: &'static str) -> Request<Full<Bytes>> {
        Request::builder()
            .method("POST")
            .uri("/add")
            .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
            .body(Full::new(Bytes::from_static(body.as_bytes())))
            .unwrap()
    }

    #[test]
    fn test_parse_fields() {
        let form = parse_post_form(b"author=Ann+Lee&title=Hello%2C%20world&content=a%26b");
        assert_eq!(form.author.as_deref(), Some("Ann Lee"));
        assert_eq!(form.title.as_deref(), Some("Hello, world"));
        assert_eq!(form.content.as_deref(), Some("a&b"));
    }

    #[test]
    fn test_parse_missing_and_blank() {
        let form = parse_post_form(b"title=&other=1");
        assert_eq!(form.author, None);
        assert_eq!(form.title.as_deref(), Some(""));
        assert_eq!(form.content, None);
    }

    #[test]
    fn test_first_value_wins() {
        let form = parse_post_form(b"title=one&title=two");
        assert_eq!(form.title.as_deref(), Some("one"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let form = parse_post_form(b"author=%FF");
        assert_eq!(form.author.as_deref(), Some("\u{FFFD}"));
    }

    #[tokio::test]
    async fn test_read_form_body() {
        let form = read_post_form(form_request("title=T&content=C"), 1024)
            .await
            .unwrap();
        assert_eq!(form.title.as_deref(), Some("T"));
        assert_eq!(form.content.as_deref(), Some("C"));
        assert_eq!(form.author, None);
    }

    #[tokio::test]
    async fn test_other_content_type_uses_defaults() {
        let req = Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Full::new(Bytes::from_static(b"{\"title\":\"x\"}")))
            .unwrap();
        let form = read_post_form(req, 1024).await.unwrap();
        assert_eq!(form, PostForm::default());
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let resp = read_post_form(form_request("title=0123456789"), 8)
            .await
            .unwrap_err();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_oversized_content_length_header() {
        let req = Request::builder()
            .method("POST")
            .header("content-length", "4096")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = read_post_form(req, 1024).await.unwrap_err();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
