use std::collections::BTreeMap;

use actix_web::{http::{header, StatusCode}, web, HttpRequest, HttpResponse};
use minijinja::context;
use serde::{Deserialize, Serialize};

use crate::{
    api::{state::AppState, views::{self, FORM_FIELDS}},
    domain::animal::{
        model::{AnimalForm, PageRequest},
        service::{self, Envelope, DELETED_MESSAGE, REGISTERED_MESSAGE, UPDATED_MESSAGE},
    },
    utils::{errors::{ApiError, ServiceError}, flash::{removal_cookie, FlashMessage}},
};

pub const HOME_PER_PAGE: i64 = 4;
pub const LIST_PER_PAGE: i64 = 9;

#[derive(Deserialize, Debug, Default)]
pub struct ListParams {
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    pub query: Option<String>,
}

/// Lenient integer query parameter: anything unparseable falls back to `default`.
fn int_param(value: Option<&str>, default: i64) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Maps a failed operation onto the error slots of a form page.
fn form_errors(error: &ServiceError) -> BTreeMap<&'static str, String> {
    match Envelope::<()>::error(error).fields {
        Some(fields) => fields.iter().map(|(field, message)| (field, message.to_string())).collect(),
        None => BTreeMap::from([("global", error.to_string())]),
    }
}

fn error_status(error: &ServiceError) -> StatusCode {
    match error {
        ServiceError::Validation(_) | ServiceError::DuplicateEmail => StatusCode::OK,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Renders a page, showing and consuming any pending flash message.
fn render_page<S: Serialize>(
    state: &AppState,
    req: &HttpRequest,
    status: StatusCode,
    template: &str,
    ctx: S,
) -> Result<HttpResponse, ApiError> {
    let flash = FlashMessage::from_request(req, &state.flash_key);
    let consumed = flash.is_some();
    let html = state.views.render(template, context! { flash => flash, ..minijinja::Value::from_serialize(&ctx) })?;

    let mut response = HttpResponse::build(status);
    response.content_type(header::ContentType::html());
    if consumed {
        response.cookie(removal_cookie());
    }
    Ok(response.body(html))
}

fn redirect_with_flash(state: &AppState, location: &str, flash: FlashMessage) -> HttpResponse {
    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, location));
    if let Some(cookie) = flash.to_cookie(&state.flash_key) {
        response.cookie(cookie);
    }
    response.finish()
}

fn render_form(
    state: &AppState,
    req: &HttpRequest,
    status: StatusCode,
    template: &str,
    action: &str,
    form: Option<&AnimalForm>,
    errors: BTreeMap<&'static str, String>,
) -> Result<HttpResponse, ApiError> {
    let submit = if template == views::UPDATE { "Save" } else { "Register" };
    render_page(state, req, status, template, context! {
        form => form,
        errors => errors,
        fields => FORM_FIELDS,
        action => action,
        submit => submit,
    })
}

pub async fn home(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let request = PageRequest::new(
        int_param(params.page.as_deref(), 1),
        int_param(params.per_page.as_deref(), HOME_PER_PAGE),
    );

    match state.run(move |repo| service::page(repo, None, request)).await {
        Ok(page) => render_page(&state, &req, StatusCode::OK, views::INDEX, context! {
            animals => page.items.clone(),
            page => page,
        }),
        Err(error) => render_page(&state, &req, error_status(&error), views::INDEX, context! {
            animals => Vec::<()>::new(),
            errors => form_errors(&error),
        }),
    }
}

pub async fn register_form(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    render_form(&state, &req, StatusCode::OK, views::REGISTER, "/animals/register", None, BTreeMap::new())
}

pub async fn register_animal(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<AnimalForm>,
) -> Result<HttpResponse, ApiError> {
    let form = form.into_inner();
    let submitted = form.clone();

    match state.run(move |repo| service::register(repo, &submitted)).await {
        Ok(_) => Ok(redirect_with_flash(&state, "/animals/list", FlashMessage::success(REGISTERED_MESSAGE))),
        Err(error) => render_form(
            &state,
            &req,
            error_status(&error),
            views::REGISTER,
            "/animals/register",
            Some(&form),
            form_errors(&error),
        ),
    }
}

pub async fn list_animals(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, ApiError> {
    let request = PageRequest::new(int_param(params.page.as_deref(), 1), LIST_PER_PAGE);
    let query = params.query.clone().unwrap_or_default();
    let term = query.clone();

    match state.run(move |repo| service::page(repo, Some(&term), request)).await {
        Ok(page) => render_page(&state, &req, StatusCode::OK, views::LIST, context! {
            animals => page.items.clone(),
            page => page,
            query => query,
        }),
        Err(error) => render_page(&state, &req, error_status(&error), views::LIST, context! {
            query => query,
            errors => form_errors(&error),
        }),
    }
}

pub async fn admin(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    match state.run(|repo| service::list_all(repo)).await {
        Ok(animals) => render_page(&state, &req, StatusCode::OK, views::ADMIN, context! { animals => animals }),
        Err(error) => render_page(&state, &req, error_status(&error), views::ADMIN, context! {
            animals => Vec::<()>::new(),
            errors => form_errors(&error),
        }),
    }
}

pub async fn delete_animal(
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();

    state.run(move |repo| service::delete(repo, id)).await?;
    Ok(HttpResponse::Ok().json(Envelope::<()>::success(DELETED_MESSAGE, None)))
}

pub async fn update_form(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let action = format!("/animals/update/{id}");

    match state.run(move |repo| service::get_by_id(repo, id)).await {
        Ok(animal) => {
            let form = AnimalForm::from(&animal);
            render_form(&state, &req, StatusCode::OK, views::UPDATE, &action, Some(&form), BTreeMap::new())
        }
        Err(error) => render_form(
            &state,
            &req,
            error_status(&error),
            views::UPDATE,
            &action,
            None,
            form_errors(&error),
        ),
    }
}

pub async fn update_animal(
    state: web::Data<AppState>,
    req: HttpRequest,
    id: web::Path<i64>,
    form: web::Form<AnimalForm>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    let form = form.into_inner();
    let submitted = form.clone();

    match state.run(move |repo| service::update(repo, id, &submitted)).await {
        Ok(()) => Ok(redirect_with_flash(&state, "/animals/admin", FlashMessage::success(UPDATED_MESSAGE))),
        Err(error) => render_form(
            &state,
            &req,
            error_status(&error),
            views::UPDATE,
            &format!("/animals/update/{id}"),
            Some(&form),
            form_errors(&error),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_param() {
        assert_eq!(int_param(None, 4), 4);
        assert_eq!(int_param(Some("2"), 4), 2);
        assert_eq!(int_param(Some(" 3 "), 4), 3);
        assert_eq!(int_param(Some("abc"), 4), 4);
        assert_eq!(int_param(Some("-2"), 4), -2);
    }

    #[test]
    fn test_form_errors() {
        let duplicate = form_errors(&ServiceError::DuplicateEmail);
        assert_eq!(duplicate.get("email").map(String::as_str), Some("An animal with this email already exists."));
        assert!(!duplicate.contains_key("global"));

        let internal = form_errors(&ServiceError::Internal);
        assert_eq!(
            internal.get("global").map(String::as_str),
            Some("An internal error occurred. Please try again later.")
        );
    }

    #[test]
    fn test_error_status() {
        assert_eq!(error_status(&ServiceError::DuplicateEmail), StatusCode::OK);
        assert_eq!(error_status(&ServiceError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(error_status(&ServiceError::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
