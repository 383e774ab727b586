use axum::extract::{Form, Json, Path, Query, State};
use axum::http::{HeaderName, Uri};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::de::DeserializeOwned;

use crate::api::MaybeBearer;
use crate::db::User;
use crate::error::AppError;
use crate::AppState;

type CookieHeader = AppendHeaders<Option<(HeaderName, &'static str)>>;

/// Maps a page handler outcome to a response: success keeps any cookie
/// header, a missing session redirects to the sign-in page preserving the
/// original URL, and other errors render the error template.
fn page_response<R: IntoResponse>(
    user: &Option<User>,
    headers: CookieHeader,
    uri: Option<&Uri>,
    result: Result<R, AppError>,
) -> Response {
    match result {
        Ok(resp) => (headers, resp).into_response(),
        Err(AppError::NotLoggedIn) => {
            let mut login_redirect =
                url::Url::parse("https://example.com/sign-in/").expect("valid url"); // the url crate cannot handle relative urls
            if let Some(path_and_query) = uri.and_then(|uri| uri.path_and_query()) {
                login_redirect
                    .query_pairs_mut()
                    .append_pair("redirect", &path_and_query.to_string());
            }
            Redirect::to(&format!(
                "{}?{}",
                login_redirect.path(),
                login_redirect.query().unwrap_or("")
            ))
            .into_response()
        }
        Err(e) => (headers, crate::templates::render_error(user, &e)).into_response(),
    }
}

/// Object that can be received as a request.
///
/// The default methods adapt one `request` implementation to the different
/// ways a request arrives: query string or form on the page side (session
/// cookie auth), JSON on the API side (bearer auth).
pub trait RequestBody {
    type Response;

    async fn request(self, state: AppState, user: Option<User>)
        -> Result<Self::Response, AppError>;

    /// GET page handler; input from the query string.
    async fn as_handler_query(
        State(state): State<AppState>,
        uri: Uri,
        jar: CookieJar,
        Query(item): Query<Self>,
    ) -> Response
    where
        Self: Sized + DeserializeOwned,
        Self::Response: IntoResponse,
    {
        let (user, headers) = match crate::cookies::process_cookies(&state, &jar).await {
            Ok(ok) => ok,
            Err(e) => return crate::templates::render_error(&None, &e),
        };
        let result = item.request(state, user.clone()).await;
        page_response(&user, headers, Some(&uri), result)
    }

    /// GET page handler; input from one path parameter.
    async fn as_handler_path<P>(
        State(state): State<AppState>,
        uri: Uri,
        jar: CookieJar,
        Path(param): Path<P>,
    ) -> Response
    where
        Self: Sized + From<P>,
        Self::Response: IntoResponse,
        P: DeserializeOwned + Send,
    {
        let (user, headers) = match crate::cookies::process_cookies(&state, &jar).await {
            Ok(ok) => ok,
            Err(e) => return crate::templates::render_error(&None, &e),
        };
        let result = Self::from(param).request(state, user.clone()).await;
        page_response(&user, headers, Some(&uri), result)
    }

    /// POST page handler; input from an urlencoded form.
    async fn as_form_handler(
        State(state): State<AppState>,
        jar: CookieJar,
        Form(item): Form<Self>,
    ) -> Response
    where
        Self: Sized + DeserializeOwned,
        Self::Response: IntoResponse,
    {
        let (user, headers) = match crate::cookies::process_cookies(&state, &jar).await {
            Ok(ok) => ok,
            Err(e) => return crate::templates::render_error(&None, &e),
        };
        let result = item.request(state, user.clone()).await;
        page_response(&user, headers, None, result)
    }

    /// POST page handler; input from one path parameter plus a form.
    async fn as_form_handler_path<P, F>(
        State(state): State<AppState>,
        jar: CookieJar,
        Path(param): Path<P>,
        Form(form): Form<F>,
    ) -> Response
    where
        Self: Sized + From<(P, F)>,
        Self::Response: IntoResponse,
        P: DeserializeOwned + Send,
        F: DeserializeOwned + Send,
    {
        let (user, headers) = match crate::cookies::process_cookies(&state, &jar).await {
            Ok(ok) => ok,
            Err(e) => return crate::templates::render_error(&None, &e),
        };
        let result = Self::from((param, form)).request(state, user.clone()).await;
        page_response(&user, headers, None, result)
    }

    /// API handler; input from a JSON body.
    async fn as_json_handler(
        State(state): State<AppState>,
        MaybeBearer(user): MaybeBearer,
        Json(item): Json<Self>,
    ) -> Result<Response, AppError>
    where
        Self: Sized + DeserializeOwned,
        Self::Response: IntoResponse,
    {
        Ok(item.request(state, user).await?.into_response())
    }

    /// API handler with no input beyond the bearer token.
    async fn as_json_handler_get(
        State(state): State<AppState>,
        MaybeBearer(user): MaybeBearer,
    ) -> Result<Response, AppError>
    where
        Self: Sized + Default,
        Self::Response: IntoResponse,
    {
        Ok(Self::default().request(state, user).await?.into_response())
    }

    /// API handler; input from one path parameter.
    async fn as_json_handler_path<P>(
        State(state): State<AppState>,
        MaybeBearer(user): MaybeBearer,
        Path(param): Path<P>,
    ) -> Result<Response, AppError>
    where
        Self: Sized + From<P>,
        Self::Response: IntoResponse,
        P: DeserializeOwned + Send,
    {
        Ok(Self::from(param).request(state, user).await?.into_response())
    }

    /// API handler; input from one path parameter plus a JSON body.
    async fn as_json_handler_path_body<P, B>(
        State(state): State<AppState>,
        MaybeBearer(user): MaybeBearer,
        Path(param): Path<P>,
        Json(body): Json<B>,
    ) -> Result<Response, AppError>
    where
        Self: Sized + From<(P, B)>,
        Self::Response: IntoResponse,
        P: DeserializeOwned + Send,
        B: DeserializeOwned + Send,
    {
        Ok(Self::from((param, body))
            .request(state, user)
            .await?
            .into_response())
    }
}
