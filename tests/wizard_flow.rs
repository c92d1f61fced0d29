//! End-to-end wizard run through the public router: select a type, upload a
//! DOCX, analyze, enhance, share, and open the share link.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::tempdir;
use tower::ServiceExt;

use docwizard::analysis::{AnalysisError, DocumentAnalyzer};
use docwizard::config::Settings;
use docwizard::models::{Analysis, ElementReport, ElementStatus, KnowledgeType};
use docwizard::server::{create_router, AppState};

/// Marks every other required element missing.
struct AlternatingAnalyzer;

#[async_trait]
impl DocumentAnalyzer for AlternatingAnalyzer {
    fn is_available(&self) -> bool {
        true
    }

    async fn analyze(
        &self,
        _content: &str,
        doc_type: &KnowledgeType,
    ) -> Result<Analysis, AnalysisError> {
        let elements = doc_type
            .elements
            .iter()
            .enumerate()
            .map(|(i, name)| ElementReport {
                name: name.to_string(),
                status: if i % 2 == 0 {
                    ElementStatus::Exists
                } else {
                    ElementStatus::Missing
                },
                description: format!("{} review", name),
                action: (i % 2 == 1).then(|| format!("Write the {} section", name)),
            })
            .collect();
        Ok(Analysis::new(elements, 55, vec!["Add references".to_string()]))
    }
}

fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    writer
        .start_file("[Content_Types].xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(b"<Types/>").unwrap();
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer
        .write_all(format!("<w:document><w:body>{}</w:body></w:document>", body).as_bytes())
        .unwrap();
    writer.finish().unwrap().into_inner()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, body.to_vec())
}

async fn post(app: &axum::Router, uri: &str, cookie: &str) -> Value {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

async fn get_page(app: &axum::Router, uri: &str, cookie: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app, request).await;
    (status, headers, String::from_utf8(body).unwrap())
}

#[tokio::test]
async fn full_wizard_run() {
    let dir = tempdir().unwrap();
    let mut settings = Settings::with_data_dir(dir.path().to_path_buf());
    settings.public_url = Some("https://docs.example.org/".to_string());
    let app = create_router(AppState::with_analyzer(&settings, Arc::new(AlternatingAnalyzer)));

    // Step 1: landing page issues the session cookie.
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, headers, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let set_cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/select-type")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("type=lessonsLearned"))
        .unwrap();
    let (_, headers, body) = send(&app, request).await;
    assert!(headers.get(header::SET_COOKIE).is_none());
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["type_info"]["title"], "Lessons Learned");
    assert_eq!(json["next_step"], 2);

    // Step 2: upload.
    let (status, _, html) = get_page(&app, "/step/2", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("uploadZone"));

    let content = docx(&[
        "Project Background",
        "The migration finished two weeks late because the data export was underestimated.",
    ]);
    let boundary = "flow-boundary";
    let mut body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"retro.docx\"\r\n\r\n",
        boundary
    )
    .into_bytes();
    body.extend_from_slice(&content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    let request = Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(header::COOKIE, &cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();
    let (_, _, body) = send(&app, request).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true, "{}", json);
    assert!(json["extracted_text"]
        .as_str()
        .unwrap()
        .contains("data export was underestimated"));

    let json = post(&app, "/api/next-step", &cookie).await;
    // No current_step and no Referer: treated as step 1.
    assert_eq!(json["next_step"], 2);

    // Step 3: the enhancement page stays locked until analysis runs.
    let (status, headers, _) = get_page(&app, "/step/4", &cookie).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/step/3");
    let (_, _, html) = get_page(&app, "/step/3", &cookie).await;
    assert!(html.contains("Please complete the analysis first"));

    let json = post(&app, "/api/analyze", &cookie).await;
    assert_eq!(json["success"], true, "{}", json);
    assert_eq!(json["analysis"]["summary"]["exists"], 5);
    assert_eq!(json["analysis"]["summary"]["missing"], 4);
    assert_eq!(json["analysis"]["elements"][1]["status"], "MISSING");

    // Step 4: enhancement collects the missing elements' actions.
    let json = post(&app, "/api/enhance", &cookie).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["next_step"], 5);
    let improvements = json["enhanced_content"]["improvements"].as_array().unwrap();
    assert_eq!(improvements.len(), 4);
    assert_eq!(
        improvements[0],
        "Project Background: Write the Project Background section"
    );

    // Step 5: share and open the link.
    let (status, _, html) = get_page(&app, "/step/5", &cookie).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("retro.docx"));

    let json = post(&app, "/api/share", &cookie).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["share_info"]["expiry"], "24 hours");
    let share_url = json["share_info"]["share_url"].as_str().unwrap();
    assert!(share_url.starts_with("https://docs.example.org/shared/"));

    let path = share_url.trim_start_matches("https://docs.example.org");
    let (status, _, html) = get_page(&app, path, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Lessons Learned: retro.docx"));
    assert!(html.contains("55%"));

    let (status, _, _) = get_page(&app, "/shared/unknown", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Back to the start clears the run.
    get_page(&app, "/", &cookie).await;
    let json = post(&app, "/api/enhance", &cookie).await;
    assert_eq!(json["error"], "Document not analyzed");
}

#[tokio::test]
async fn changing_type_discards_analysis() {
    let dir = tempdir().unwrap();
    let settings = Settings::with_data_dir(dir.path().to_path_buf());
    let app = create_router(AppState::with_analyzer(&settings, Arc::new(AlternatingAnalyzer)));

    let request = Request::builder()
        .method("POST")
        .uri("/api/select-type")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("type=bestPractices"))
        .unwrap();
    let (_, headers, _) = send(&app, request).await;
    let cookie = headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/save-editor-content")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"content": "", "text": "A best practice for code review: keep changes small and focused."})
                .to_string(),
        ))
        .unwrap();
    let (_, _, body) = send(&app, request).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["file_info"]["source"], "editor");
    assert_eq!(json["file_info"]["word_count"], 11);

    let json = post(&app, "/api/analyze", &cookie).await;
    assert_eq!(json["success"], true);

    let request = Request::builder()
        .method("POST")
        .uri("/api/select-type")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("type=engineeringReport"))
        .unwrap();
    send(&app, request).await;

    let json = post(&app, "/api/enhance", &cookie).await;
    assert_eq!(json["error"], "Document not analyzed");
}
