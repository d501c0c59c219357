#![allow(dead_code)]

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, MethodRouter};
use axum::{Json, Router};
use councilhub::CmsClient;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Serve `router` on an ephemeral local port and return its origin
pub async fn serve_origin(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Serve `router` and return a client pointed at it
pub async fn serve(router: Router) -> CmsClient {
    CmsClient::new(&serve_origin(router).await).unwrap()
}

/// An origin nothing is listening on
pub async fn closed_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn failing() -> MethodRouter {
    get(|| async { StatusCode::INTERNAL_SERVER_ERROR })
}

pub fn councillors() -> Value {
    json!([
        {
            "id": 1,
            "name": "Ann Smith",
            "intro": "Chair of the planning committee",
            "tags": [{"id": 1, "name": "Planning", "color": "#ff0000"}]
        },
        {
            "id": 2,
            "name": "Bob Jones",
            "bio": "Long-serving member for the north ward",
            "tags": [{"id": 2, "name": "Finance"}],
            "created_at": "not a date"
        }
    ])
}

pub fn councillor_tags() -> Value {
    json!([
        {"id": 1, "name": "Planning", "color": "#ff0000", "councillor_count": 1},
        {"id": 2, "name": "Finance", "councillor_count": 1}
    ])
}

pub fn events() -> Value {
    json!([
        {
            "id": 1,
            "title": "Community Clean-Up Day",
            "date": "2025-07-15",
            "time": "10:00",
            "location": "Kesgrave Recreation Ground",
            "categories": [{"id": 1, "name": "Community"}]
        },
        {
            "id": 2,
            "title": "Summer Fair",
            "date": "2025-07-20T14:00:00",
            "short_description": "Stalls, music and a dog show",
            "categories": [{"id": 2, "name": "Seasonal"}, {"id": 1, "name": "Community"}],
            "price": 2.5
        },
        {
            "id": 3,
            "title": "Carol Service",
            "start_date": "2025-12-14T18:30:00",
            "categories": []
        }
    ])
}

pub fn event_categories() -> Value {
    json!([
        {"id": 1, "name": "Community", "color": "#2ecc71"},
        {"id": 2, "name": "Seasonal"}
    ])
}

pub fn meeting_types() -> Value {
    json!([
        {"name": "Full Council Meetings", "meeting_count": 3},
        {"name": "Staffing", "meeting_count": 1},
        {"name": "Planning and Development", "color": "#123456"}
    ])
}

pub fn meetings_of(name: &str) -> Value {
    json!({
        "meeting_type": {"name": name, "description": "Meetings of the whole council"},
        "meetings": [
            {"id": 1, "title": name, "date": "01/01/2024", "time": "19:30", "location": "Council Chamber",
             "minutes": {"file_url": "/uploads/minutes-2024.pdf"}},
            {"id": 2, "title": name, "date": "01/01/2030", "time": "19:30", "location": "Council Chamber"},
            {"id": 3, "title": name, "date": "15/06/2025", "time": "19:30", "location": "Council Chamber",
             "agenda": {"file_url": "/uploads/agenda-2025.pdf"}}
        ]
    })
}

pub fn content_categories() -> Value {
    json!([
        {"id": 1, "name": "Planning", "description": "Planning matters",
         "subcategories": [{"id": 11, "name": "Applications"}, {"id": 12, "name": "Appeals"}]},
        {"id": 2, "name": "News"},
        {"id": 3, "name": "Finance", "color": "#000000", "last_updated": "2025-02-01T09:00:00"}
    ])
}

pub fn content_pages() -> Value {
    json!([
        {"id": 1, "title": "Planning Policy", "slug": "planning-policy",
         "category": {"id": 1, "name": "Planning"}},
        {"id": 2, "title": "Current Applications", "slug": "current-applications",
         "category": {"id": 1, "name": "Planning"}, "subcategory": {"id": 11, "name": "Applications"}},
        {"id": 3, "title": "Press Release", "slug": "press-release",
         "category": {"id": 2, "name": "News"}}
    ])
}

pub fn content_page_detail() -> Value {
    json!({
        "id": 1,
        "title": "Planning Policy",
        "slug": "planning-policy",
        "category": {"id": 1, "name": "Planning"},
        "long_description": "<p>How we respond to applications.</p>",
        "next_review_date": "2026-01-01",
        "downloads": [{"title": "Policy", "file_url": "/uploads/content/policy.pdf"}],
        "gallery_images": [{"image_url": "/uploads/content/hall.jpg"}]
    })
}

pub fn slides() -> Value {
    json!([{"id": 1, "title": "Welcome", "is_featured": true}])
}

pub fn homepage_meetings() -> Value {
    json!([{"id": 7, "type": "Full Council", "date": "2025-07-10", "time": "19:30", "location": "Council Chambers"}])
}

pub fn quick_links() -> Value {
    json!([{"id": 1, "title": "Report an Issue", "url": "/contact", "button_text": "Report Now"}])
}

async fn content_page(Path(slug): Path<String>) -> Response {
    if slug == "planning-policy" {
        Json(content_page_detail()).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response()
    }
}

async fn contact(Json(body): Json<Value>) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    Json(json!({"success": true, "message": format!("Thanks {}", name)}))
}

fn routes() -> Vec<(&'static str, MethodRouter)> {
    vec![
        ("/api/councillors", get(|| async { Json(councillors()) })),
        ("/api/councillor-tags", get(|| async { Json(councillor_tags()) })),
        ("/api/events", get(|| async { Json(events()) })),
        ("/api/homepage/events", get(|| async { Json(events()) })),
        ("/api/event-categories", get(|| async { Json(event_categories()) })),
        ("/api/meeting-types", get(|| async { Json(meeting_types()) })),
        (
            "/api/meetings/type/:name",
            get(|Path(name): Path<String>| async move { Json(meetings_of(&name)) }),
        ),
        ("/api/content/categories", get(|| async { Json(content_categories()) })),
        ("/api/content/pages", get(|| async { Json(content_pages()) })),
        ("/api/content/page/:slug", get(content_page)),
        ("/api/homepage/slides", get(|| async { Json(slides()) })),
        ("/api/homepage/meetings", get(|| async { Json(homepage_meetings()) })),
        ("/api/homepage/quick-links", get(|| async { Json(quick_links()) })),
        ("/api/contact", post(contact)),
    ]
}

/// A fake CMS serving every endpoint from the fixtures above
pub fn fake_cms() -> Router {
    fake_cms_failing(&[])
}

/// The fake CMS with the listed paths answering 500
pub fn fake_cms_failing(paths: &[&str]) -> Router {
    fake_cms_with(paths.iter().map(|path| (*path, failing())).collect())
}

/// The fake CMS with some routes replaced
pub fn fake_cms_with(overrides: Vec<(&str, MethodRouter)>) -> Router {
    let mut overrides = overrides;
    routes()
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            match overrides.iter().position(|(p, _)| *p == path) {
                Some(idx) => router.route(path, overrides.swap_remove(idx).1),
                None => router.route(path, handler),
            }
        })
}
