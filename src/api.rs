use actix_web::{http::header, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::conversation::Message;
use crate::dashboard;
use crate::error::AppResult;
use crate::grades::{self, CourseGrade, CourseInput};
use crate::render;
use crate::report;
use crate::responder::{self, QUICK_SUGGESTIONS};
use crate::session::ChatStatus;
use crate::store::SessionStore;
use crate::view::{ViewAction, ViewState};

#[derive(Deserialize)]
struct HomeQuery {
    session: Option<Uuid>,
}

#[derive(Deserialize)]
struct ClassifyRequest {
    query: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    text: String,
}

#[derive(Deserialize)]
struct SgpaRequest {
    courses: Vec<CourseInput>,
}

#[derive(Serialize)]
struct SessionCreated {
    id: Uuid,
    view: ViewState,
}

#[derive(Serialize)]
struct SessionInfo {
    id: Uuid,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    view: ViewState,
    status: ChatStatus,
}

#[derive(Serialize)]
struct MessagesResponse {
    messages: Vec<Message>,
    status: ChatStatus,
}

#[derive(Serialize)]
struct QueuedResponse {
    queued: usize,
}

// Homepage endpoint
async fn serve_homepage(
    store: web::Data<SessionStore>,
    query: web::Query<HomeQuery>,
) -> HttpResponse {
    let session = query.session.and_then(|id| store.get(id).ok());
    let html = match session {
        Some(session) => {
            let view = session.view().await;
            let messages = session.chat.snapshot().await;
            render::render_dashboard(&view, &messages, Some(session.id.to_string().as_str()))
        }
        None => render::render_dashboard(&ViewState::default(), &[], None),
    };
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html)
}

// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().body("Result Analyzer is running!")
}

async fn get_dashboard() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::dashboard())
}

async fn get_kpis() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::kpis())
}

async fn get_charts() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::charts())
}

async fn get_insights() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::insights())
}

async fn get_subjects() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::subjects())
}

async fn get_filters() -> HttpResponse {
    HttpResponse::Ok().json(dashboard::filters())
}

async fn classify_query(req: web::Json<ClassifyRequest>) -> HttpResponse {
    HttpResponse::Ok().json(responder::classify(&req.query))
}

async fn get_suggestions() -> HttpResponse {
    HttpResponse::Ok().json(QUICK_SUGGESTIONS)
}

async fn create_session(store: web::Data<SessionStore>) -> HttpResponse {
    let session = store.create();
    HttpResponse::Created().json(SessionCreated {
        id: session.id,
        view: session.view().await,
    })
}

async fn get_session(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let session = store.get(*id)?;
    Ok(HttpResponse::Ok().json(SessionInfo {
        id: session.id,
        created_at: session.created_at,
        last_active: session.last_active(),
        view: session.view().await,
        status: session.chat.status(),
    }))
}

async fn delete_session(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    store.remove(*id).await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn update_view(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
    action: web::Json<ViewAction>,
) -> AppResult<HttpResponse> {
    let session = store.get(*id)?;
    let view = session.apply(action.into_inner()).await?;
    tracing::debug!(session_id = %session.id, ?view, "view updated");
    Ok(HttpResponse::Ok().json(view))
}

async fn get_messages(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let session = store.get(*id)?;
    Ok(HttpResponse::Ok().json(MessagesResponse {
        messages: session.chat.snapshot().await,
        status: session.chat.status(),
    }))
}

async fn post_message(
    store: web::Data<SessionStore>,
    id: web::Path<Uuid>,
    req: web::Json<ChatRequest>,
) -> AppResult<HttpResponse> {
    let session = store.get(*id)?;
    let queued = session.chat.submit(&req.text)?;
    tracing::info!(session_id = %session.id, queued, "message queued");
    Ok(HttpResponse::Accepted().json(QueuedResponse { queued }))
}

async fn calculate_sgpa(req: web::Json<SgpaRequest>) -> AppResult<HttpResponse> {
    let courses = req
        .courses
        .iter()
        .map(CourseGrade::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(HttpResponse::Ok().json(grades::summarize(&courses)?))
}

fn csv_attachment(filename: &str, body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(body)
}

async fn export_subjects() -> AppResult<HttpResponse> {
    Ok(csv_attachment("subjects.csv", report::subjects_csv()?))
}

async fn export_summary() -> AppResult<HttpResponse> {
    Ok(csv_attachment("summary.csv", report::summary_csv()?))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_homepage))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .route("/dashboard", web::get().to(get_dashboard))
                .route("/kpis", web::get().to(get_kpis))
                .route("/charts", web::get().to(get_charts))
                .route("/insights", web::get().to(get_insights))
                .route("/subjects", web::get().to(get_subjects))
                .route("/filters", web::get().to(get_filters))
                .route("/classify", web::post().to(classify_query))
                .route("/chat/suggestions", web::get().to(get_suggestions))
                .route("/sessions", web::post().to(create_session))
                .route("/sessions/{id}", web::get().to(get_session))
                .route("/sessions/{id}", web::delete().to(delete_session))
                .route("/sessions/{id}/view", web::post().to(update_view))
                .route("/sessions/{id}/messages", web::get().to(get_messages))
                .route("/sessions/{id}/messages", web::post().to(post_message))
                .route("/sgpa", web::post().to(calculate_sgpa))
                .route("/reports/subjects.csv", web::get().to(export_subjects))
                .route("/reports/summary.csv", web::get().to(export_summary)),
        );
}
