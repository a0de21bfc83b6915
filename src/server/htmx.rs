use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");
pub const HX_RETARGET: HeaderName = HeaderName::from_static("hx-retarget");
pub const HX_RESWAP: HeaderName = HeaderName::from_static("hx-reswap");

pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "true")
}

/// Full page navigation: htmx follows `HX-Redirect`, plain requests get a 303.
pub fn navigate(htmx: bool, location: &str) -> Response {
    if htmx {
        (StatusCode::OK, [(HX_REDIRECT, location.to_owned())]).into_response()
    } else {
        Redirect::to(location).into_response()
    }
}

/// Headers that send a fragment into `target` instead of the element that asked for it.
pub fn retarget(target: &'static str) -> [(HeaderName, &'static str); 2] {
    [(HX_RETARGET, target), (HX_RESWAP, "innerHTML")]
}
