use crate::breakpoint::{BREAKPOINT_STORAGE_KEY, BREAKPOINTS, BreakpointSelection};
use crate::essay::{Essay, EssayError};
use crate::glossary::Glossary;
use crate::lookup::{ClickEvent, LookupState};
use crate::paragraph::{Paragraph, ParagraphView};
use crate::segment::Segment;
use crate::sessions::{SessionStore, generate_session_id};
use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use cookie::{Cookie, SameSite};
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, warn};

type SharedState = Arc<AppState>;
const SESSION_COOKIE: &str = "session";
/// Seconds between two revealed characters.
const REVEAL_STEP_SECS: f64 = 0.02;
/// Seconds between two paragraphs fading in.
const PARAGRAPH_STEP_SECS: f64 = 0.2;
const PARAGRAPH_BASE_DELAY_SECS: f64 = 0.7;

pub struct AppState {
    pub essay: Arc<Essay>,
    pub sessions: SessionStore,
    pub theme: WebTheme,
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum WebTheme {
    #[default]
    Tailwind,
    Bootstrap,
}

impl fmt::Display for WebTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebTheme::Tailwind => write!(f, "tailwind"),
            WebTheme::Bootstrap => write!(f, "bootstrap"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Chrome {
    use_tailwind: bool,
    use_bootstrap: bool,
    body_class: &'static str,
    main_class: &'static str,
    headline_class: &'static str,
    date_class: &'static str,
    paragraph_class: &'static str,
    picker_class: &'static str,
}

impl Chrome {
    fn new(theme: WebTheme) -> Self {
        match theme {
            WebTheme::Tailwind => Self {
                use_tailwind: true,
                use_bootstrap: false,
                body_class: "bg-neutral-950 text-neutral-200",
                main_class: "mx-auto w-full p-6 pt-12",
                headline_class: "text-2xl font-semibold tracking-tight",
                date_class: "text-sm text-neutral-500",
                paragraph_class: "relative my-6 leading-7",
                picker_class: "fixed top-0 inset-x-0 h-6 flex justify-center gap-1 text-xs bg-neutral-900 border-b border-neutral-800 z-10",
            },
            WebTheme::Bootstrap => Self {
                use_tailwind: false,
                use_bootstrap: true,
                body_class: "bg-dark text-light",
                main_class: "container py-5",
                headline_class: "h3 fw-semibold",
                date_class: "small text-secondary",
                paragraph_class: "position-relative my-4 lh-lg",
                picker_class: "fixed-top d-flex justify-content-center gap-1 small bg-black border-bottom border-secondary",
            },
        }
    }
}

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub theme: WebTheme,
    pub base_url: String,
    pub essay: Essay,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            theme: WebTheme::default(),
            base_url: "http://127.0.0.1:8080".to_string(),
            essay: Essay::default_essay().clone(),
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

pub async fn serve(config: WebConfig) -> Result<(), WebError> {
    info!(
        %config.addr,
        theme = %config.theme,
        base = %config.base_url,
        title = %config.essay.title,
        paragraphs = config.essay.paragraphs.len(),
        terms = config.essay.glossary.len(),
        "Binding HTTP listener"
    );
    let state = Arc::new(AppState {
        essay: Arc::new(config.essay),
        sessions: SessionStore::new(),
        theme: config.theme,
        base_url: config.base_url,
    });
    let router = build_router(state);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl From<EssayError> for ApiError {
    fn from(value: EssayError) -> Self {
        match value {
            EssayError::ParagraphOutOfRange { .. } => ApiError::not_found(value.to_string()),
            other => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.message });
        (self.status, Json(payload)).into_response()
    }
}

fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/paragraphs/:index/click", get(click_term))
        .route("/paragraphs/:index/outside", get(click_outside))
        .route("/breakpoint", get(choose_breakpoint))
        .route("/api/essay", get(api_essay))
        .route("/api/paragraphs/:index", get(api_paragraph))
        .route("/api/segments", post(api_segments))
        .route("/healthz", get(health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok", "service": "inline-gloss-web" }))
}

async fn home(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let (session_id, new_session) = session_from_headers(&headers);
    let selection = BreakpointSelection::from_stored(
        read_cookie(&headers, BREAKPOINT_STORAGE_KEY).as_deref(),
    );
    let reader = state.sessions.reader(&session_id, &state.essay);
    let html = match reader.views(&state.essay) {
        Ok(views) => render_essay_page(&state, views, selection),
        Err(err) => render_error_page(state.theme, err.to_string()),
    };
    let cookies = new_session.map(|id| session_cookie(&id)).into_iter().collect();
    with_cookies(Html(html), cookies)
}

#[derive(Debug, Deserialize)]
struct ClickParams {
    word: Option<String>,
}

async fn click_term(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Query(params): Query<ClickParams>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    apply_click(&state, &headers, index, ClickEvent::Term { word: params.word })
}

async fn click_outside(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    apply_click(&state, &headers, index, ClickEvent::Outside)
}

fn apply_click(
    state: &AppState,
    headers: &HeaderMap,
    index: usize,
    event: ClickEvent,
) -> Result<Response, ApiError> {
    let (session_id, new_session) = session_from_headers(headers);
    let transition = state
        .sessions
        .click(&session_id, &state.essay, index, event)?;
    debug!(index, ?transition, "paragraph click");
    let cookies = new_session.map(|id| session_cookie(&id)).into_iter().collect();
    Ok(with_cookies(
        Redirect::to(&format!("/#p-{index}")),
        cookies,
    ))
}

#[derive(Debug, Deserialize)]
struct BreakpointParams {
    width: Option<String>,
}

async fn choose_breakpoint(Query(params): Query<BreakpointParams>) -> Response {
    let selection = BreakpointSelection::from_stored(params.width.as_deref());
    let cookie = Cookie::build((BREAKPOINT_STORAGE_KEY, selection.to_stored()))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build();
    with_cookies(Redirect::to("/"), vec![cookie.to_string()])
}

async fn api_essay(State(state): State<SharedState>) -> Json<Essay> {
    Json(state.essay.as_ref().clone())
}

#[derive(Debug, Deserialize)]
struct ParagraphParams {
    active: Option<String>,
}

async fn api_paragraph(
    State(state): State<SharedState>,
    Path(index): Path<usize>,
    Query(params): Query<ParagraphParams>,
) -> Result<Json<ParagraphView>, ApiError> {
    let paragraph = state.essay.paragraph(index)?;
    Ok(Json(paragraph.view(&state_for(params.active))))
}

#[derive(Debug, Deserialize)]
struct SegmentsRequest {
    text: String,
    #[serde(default)]
    glossary: Glossary,
    active: Option<String>,
}

async fn api_segments(Json(request): Json<SegmentsRequest>) -> Json<ParagraphView> {
    let paragraph = Paragraph::new(&request.text, &request.glossary);
    Json(paragraph.view(&state_for(request.active)))
}

fn state_for(active: Option<String>) -> LookupState {
    active
        .filter(|term| !term.trim().is_empty())
        .map(LookupState::active)
        .unwrap_or_default()
}

fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Returns the session id and, when a new one had to be minted, that id.
fn session_from_headers(headers: &HeaderMap) -> (String, Option<String>) {
    match read_cookie(headers, SESSION_COOKIE).filter(|id| !id.is_empty()) {
        Some(id) => (id, None),
        None => {
            let id = generate_session_id();
            (id.clone(), Some(id))
        }
    }
}

fn session_cookie(id: &str) -> String {
    Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
        .to_string()
}

fn with_cookies(body: impl IntoResponse, cookies: Vec<String>) -> Response {
    let mut response = body.into_response();
    for cookie in cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(err) => warn!(error = %err, "dropping unencodable cookie"),
        }
    }
    response
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn click_href(index: usize, term: &str) -> String {
    format!("/paragraphs/{index}/click?word={}", encode_component(term))
}

fn reveal_delay(delay_index: usize) -> String {
    format!("{:.2}s", (delay_index + 1) as f64 * REVEAL_STEP_SECS)
}

struct SegmentBlock {
    is_term: bool,
    is_reveal: bool,
    is_active: bool,
    text: String,
    href: String,
    delay: String,
}

impl SegmentBlock {
    fn from_segment(index: usize, segment: &Segment) -> Self {
        match segment {
            Segment::Plain { content } => Self {
                is_term: false,
                is_reveal: false,
                is_active: false,
                text: content.clone(),
                href: format!("/paragraphs/{index}/outside"),
                delay: String::new(),
            },
            Segment::Term {
                term,
                text,
                is_active,
            } => Self {
                is_term: true,
                is_reveal: false,
                is_active: *is_active,
                text: text.clone(),
                href: click_href(index, term),
                delay: String::new(),
            },
            Segment::RevealChar { ch, delay_index } => Self {
                is_term: false,
                is_reveal: true,
                is_active: false,
                text: ch.to_string(),
                href: String::new(),
                delay: reveal_delay(*delay_index),
            },
        }
    }
}

struct ParagraphBlock {
    index: usize,
    delay: String,
    lookup_open: bool,
    readable: Vec<SegmentBlock>,
    lookup: Vec<SegmentBlock>,
}

impl ParagraphBlock {
    fn from_view(index: usize, view: &ParagraphView) -> Self {
        let blocks = |segments: &[Segment]| {
            segments
                .iter()
                .map(|segment| SegmentBlock::from_segment(index, segment))
                .collect::<Vec<_>>()
        };
        Self {
            index,
            delay: format!(
                "{:.1}s",
                index as f64 * PARAGRAPH_STEP_SECS + PARAGRAPH_BASE_DELAY_SECS
            ),
            lookup_open: view.lookup.is_some(),
            readable: blocks(&view.readable),
            lookup: view.lookup.as_deref().map(blocks).unwrap_or_default(),
        }
    }
}

struct BreakpointLink {
    label: String,
    href: String,
    selected: bool,
}

fn render_essay_page(
    state: &AppState,
    views: Vec<ParagraphView>,
    selection: BreakpointSelection,
) -> String {
    let paragraphs = views
        .iter()
        .enumerate()
        .map(|(index, view)| ParagraphBlock::from_view(index, view))
        .collect();
    let breakpoints = BREAKPOINTS
        .iter()
        .map(|bp| BreakpointLink {
            label: bp.label(),
            href: format!("/breakpoint?width={}", bp.width),
            selected: bp.width == selection.width(),
        })
        .collect();
    let template = EssayTemplate {
        chrome: Chrome::new(state.theme),
        title: &state.essay.title,
        date: state.essay.date.as_deref(),
        canonical_url: &state.base_url,
        width: selection.width(),
        paragraphs,
        breakpoints,
    };
    template
        .render()
        .unwrap_or_else(|err| render_error_page(state.theme, err.to_string()))
}

fn render_error_page(theme: WebTheme, message: impl Into<String>) -> String {
    let chrome = Chrome::new(theme);
    let template = ErrorTemplate {
        chrome,
        message: message.into(),
    };
    template
        .render()
        .unwrap_or_else(|_| "<h1>Something went wrong</h1>".to_string())
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ title }}</title>
    {% if chrome.use_tailwind %}
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    {% endif %}
    {% if chrome.use_bootstrap %}
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.8/dist/css/bootstrap.min.css" rel="stylesheet" integrity="sha384-sRIl4kxILFvY47J16cr9ZwB07vP4J8+LH7qKQnuqkuIAvNWLzeN8tE5YBujZqJLB" crossorigin="anonymous">
    {% endif %}
    <link rel="canonical" href="{{ canonical_url }}">
    <style>
      .post-paragraph { opacity: 0; animation: fade-in 0.6s ease forwards; }
      .post-paragraph.look-up .readable-child { opacity: 0.2; transition: opacity 0.3s; }
      .glossary-word { color: inherit; text-decoration: underline dotted; text-underline-offset: 4px; }
      .glossary-word.active { font-weight: 600; text-decoration-style: solid; }
      .glossary-lookup { position: absolute; inset: 0; display: block; }
      .filler-text { color: transparent; text-decoration: none; }
      .lookup-content__letter { opacity: 0; animation: fade-in 0.2s ease forwards; }
      @keyframes fade-in { to { opacity: 1; } }
    </style>
  </head>
  <body class="{{ chrome.body_class }}">
    <nav class="{{ chrome.picker_class }}" aria-label="Preview width">
      {% for bp in breakpoints %}
      <a href="{{ bp.href|safe }}" title="{{ bp.label }}" class="px-2 {% if bp.selected %}fw-bold font-semibold underline{% endif %}">{{ bp.label }}</a>
      {% endfor %}
    </nav>
    <main class="{{ chrome.main_class }}" style="max-width: {{ width }}px">
      <header>
        <h1 class="{{ chrome.headline_class }}">{{ title }}</h1>
        {% if let Some(date) = date %}
        <span class="{{ chrome.date_class }}">{{ date }}</span>
        {% endif %}
      </header>
      {% for paragraph in paragraphs %}
      <div id="p-{{ paragraph.index }}" class="post-paragraph {{ chrome.paragraph_class }}{% if paragraph.lookup_open %} look-up{% endif %}" style="animation-delay: {{ paragraph.delay }}">
        <div class="readable-content">
          {%- for segment in paragraph.readable -%}
          {%- if segment.is_term -%}
          <a class="glossary-word{% if segment.is_active %} active{% else %} readable-child{% endif %}" href="{{ segment.href|safe }}">{{ segment.text }}</a>
          {%- else -%}
          <span class="readable-child">{{ segment.text }}</span>
          {%- endif -%}
          {%- endfor -%}
        </div>
        {% if paragraph.lookup_open %}
        <div class="glossary-lookup" id="glossary-lookup-{{ paragraph.index }}">
          {%- for segment in paragraph.lookup -%}
          {%- if segment.is_term -%}
          <a class="glossary-word active look-up-button" href="{{ segment.href|safe }}">{{ segment.text }}</a>
          {%- else if segment.is_reveal -%}
          <span class="lookup-content__letter" style="animation-delay: {{ segment.delay }}">{{ segment.text }}</span>
          {%- else -%}
          <a class="filler-text" href="{{ segment.href|safe }}">{{ segment.text }}</a>
          {%- endif -%}
          {%- endfor -%}
        </div>
        {% endif %}
      </div>
      {% endfor %}
    </main>
  </body>
</html>"#,
    ext = "html"
)]
struct EssayTemplate<'a> {
    chrome: Chrome,
    title: &'a str,
    date: Option<&'a str>,
    canonical_url: &'a str,
    width: u32,
    paragraphs: Vec<ParagraphBlock>,
    breakpoints: Vec<BreakpointLink>,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Error</title>
  </head>
  <body class="{{ chrome.body_class }}">
    <main class="{{ chrome.main_class }}">
      <h1 class="{{ chrome.headline_class }}">Something went wrong</h1>
      <p>{{ message }}</p>
      <a href="/">Back to the essay</a>
    </main>
  </body>
</html>"#,
    ext = "html"
)]
struct ErrorTemplate {
    chrome: Chrome,
    message: String,
}

#[cfg(all(test, feature = "web"))]
mod tests {
    use super::*;
    use axum::{body, body::Body, http::Request};
    use tower::ServiceExt;

    fn test_router() -> Router {
        let state = Arc::new(AppState {
            essay: Arc::new(Essay::default_essay().clone()),
            sessions: SessionStore::new(),
            theme: WebTheme::Tailwind,
            base_url: "http://127.0.0.1:8080".to_string(),
        });
        build_router(state)
    }

    async fn body_text(response: Response) -> String {
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn set_cookies(response: &Response) -> Vec<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn home_renders_terms_and_mints_session() {
        let router = test_router();
        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert!(
            set_cookies(&response)
                .iter()
                .any(|cookie| cookie.starts_with("session="))
        );
        let html = body_text(response).await;
        assert!(html.contains("Contrasting Aesthetics"));
        assert!(html.contains("/paragraphs/0/click?word=kitschy"));
        assert!(html.contains("max-width: 768px"));
        assert!(!html.contains("glossary-lookup-0"));
    }

    #[tokio::test]
    async fn click_opens_and_closes_lookup() {
        let router = test_router();
        let cookie = "session=reader1";

        let response = router
            .clone()
            .oneshot(
                Request::get("/paragraphs/0/click?word=Kitschy")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(set_cookies(&response).is_empty());

        let html = body_text(
            router
                .clone()
                .oneshot(
                    Request::get("/")
                        .header(header::COOKIE, cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("glossary-lookup-0"));
        assert!(!html.contains("glossary-lookup-1"));
        assert!(html.contains("lookup-content__letter"));
        assert!(html.contains("animation-delay: 0.02s"));

        router
            .clone()
            .oneshot(
                Request::get("/paragraphs/0/outside")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = body_text(
            router
                .oneshot(
                    Request::get("/")
                        .header(header::COOKIE, cookie)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap(),
        )
        .await;
        assert!(!html.contains("glossary-lookup-0"));
    }

    #[tokio::test]
    async fn click_on_missing_paragraph_is_not_found() {
        let router = test_router();
        let response = router
            .oneshot(
                Request::get("/paragraphs/7/click?word=art")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn breakpoint_is_persisted_in_cookie() {
        let router = test_router();
        let response = router
            .clone()
            .oneshot(
                Request::get("/breakpoint?width=1024")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            set_cookies(&response)
                .iter()
                .any(|cookie| cookie.starts_with("breakpoint=1024"))
        );

        let html = body_text(
            router
                .oneshot(
                    Request::get("/")
                        .header(header::COOKIE, "session=abc; breakpoint=1024")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("max-width: 1024px"));
    }

    #[tokio::test]
    async fn api_segments_builds_readable_and_lookup_views() {
        let router = test_router();
        let request = json!({
            "text": "I believe there's something fascinating in art and design.",
            "glossary": { "art": "a skill" },
            "active": "art",
        });
        let response = router
            .oneshot(
                Request::post("/api/segments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(request.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_success());
        let payload: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(payload["mode"], "look_up");
        assert_eq!(payload["readable"][1]["kind"], "term");
        assert_eq!(payload["readable"][1]["is_active"], true);
        assert_eq!(payload["lookup"][2]["kind"], "reveal_char");
        assert_eq!(payload["lookup"][2]["ch"], "-");
        assert_eq!(payload["lookup"][2]["delay_index"], 0);
    }

    #[tokio::test]
    async fn api_paragraph_out_of_range() {
        let router = test_router();
        let response = router
            .oneshot(Request::get("/api/paragraphs/5").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn reveal_delays_are_staggered() {
        assert_eq!(reveal_delay(0), "0.02s");
        assert_eq!(reveal_delay(4), "0.10s");
    }
}
