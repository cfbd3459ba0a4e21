use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::forms::FormErrors;
use crate::utils::flash::{Flash, FlashMessage};

/// View model handed to the front end. `body` is flattened next to the page
/// name and the drained one-shot messages.
#[derive(Serialize)]
struct PageView<'a, T: Serialize> {
    page: &'a str,
    messages: Vec<FlashMessage>,
    #[serde(flatten)]
    body: T,
}

pub fn render<T: Serialize>(flash: Flash, page: &str, body: T) -> HttpResponse {
    render_with_status(StatusCode::OK, flash, page, body)
}

pub fn render_with_status<T: Serialize>(
    status: StatusCode,
    flash: Flash,
    page: &str,
    body: T,
) -> HttpResponse {
    let (messages, removal) = flash.drain();

    let mut resp = HttpResponse::build(status);
    if let Some(cookie) = removal {
        resp.cookie(cookie);
    }
    resp.json(PageView {
        page,
        messages,
        body,
    })
}

#[derive(Serialize)]
struct InvalidForm<'a, T: Serialize> {
    #[serde(flatten)]
    body: T,
    errors: &'a FormErrors,
}

/// Re-renders a form page after a validation failure. Nothing was written.
pub fn render_invalid<T: Serialize>(
    flash: Flash,
    page: &str,
    body: T,
    errors: &FormErrors,
) -> HttpResponse {
    tracing::debug!(page, errors = ?errors, "Form rejected");
    render_with_status(
        StatusCode::UNPROCESSABLE_ENTITY,
        flash,
        page,
        InvalidForm { body, errors },
    )
}
