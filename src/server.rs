use crate::{
    config::Config,
    error::{RelayError, Result},
    magicstudio::MagicStudioClient,
    models::{ErrorBody, GenerateBody, GenerateQuery, GenerationResult},
    orchestrator::Orchestrator,
};
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use chrono::Utc;
use serde_json::json;

const DEFAULT_PORT: u16 = 10000;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/generate", web::get().to(generate_get))
        .route("/api/generate", web::post().to(generate_post))
        .route("/", web::get().to(home))
        .route("/health", web::get().to(health))
        .route("/test", web::get().to(test_stub));
}

async fn generate_get(
    orchestrator: web::Data<Orchestrator>,
    query: web::Query<GenerateQuery>,
) -> HttpResponse {
    if query.prompt.is_none() {
        return HttpResponse::BadRequest().json(
            ErrorBody::new("Missing 'prompt' parameter")
                .with_details("/api/generate?prompt=a blue cat"),
        );
    }
    generate(&orchestrator, query.prompt.as_deref()).await
}

async fn generate_post(
    orchestrator: web::Data<Orchestrator>,
    body: web::Json<GenerateBody>,
) -> HttpResponse {
    generate(&orchestrator, body.prompt.as_deref()).await
}

/// Validates the prompt, runs the orchestrator and maps the result onto an
/// HTTP response. Empty or whitespace prompts never reach the core.
async fn generate(orchestrator: &Orchestrator, prompt: Option<&str>) -> HttpResponse {
    let prompt = prompt.unwrap_or("").trim();
    if prompt.is_empty() {
        return HttpResponse::BadRequest().json(ErrorBody::new("Prompt cannot be empty"));
    }

    let _timer = crate::logger::timer("generate");
    match orchestrator.generate(prompt).await {
        GenerationResult::Image {
            bytes,
            content_type,
        } => HttpResponse::Ok().content_type(content_type).body(bytes),
        GenerationResult::Failure {
            status,
            error,
            details,
        } => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let mut body = ErrorBody::new(error);
            if let Some(details) = details {
                body = body.with_details(details);
            }
            HttpResponse::build(status).json(body)
        }
    }
}

async fn home() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "name": "ArtRelay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "description": "Relay server for the Magic Studio AI art generator",
        "endpoints": {
            "generate": "/api/generate",
            "methods": ["GET", "POST"],
            "examples": {
                "get": "curl 'http://localhost:10000/api/generate?prompt=a+beautiful+sunset'",
                "post": "curl -X POST http://localhost:10000/api/generate -H 'Content-Type: application/json' -d '{\"prompt\":\"a beautiful sunset\"}'"
            }
        }
    }))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn test_stub() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "API is running!",
        "test_endpoint": "/api/generate?prompt=test",
        "timestamp": Utc::now().timestamp(),
    }))
}

/// Malformed POST bodies get the same JSON failure shape as everything else,
/// never the default HTML error page.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let body = ErrorBody::new("Invalid JSON").with_details(err.to_string());
    actix_web::error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(body),
    )
    .into()
}

pub async fn run(config: Config) -> Result<()> {
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let client = MagicStudioClient::new(config.upstream)?;
    let orchestrator = web::Data::new(Orchestrator::new(client));

    crate::logger::log_startup_info("ArtRelay", env!("CARGO_PKG_VERSION"), port);

    HttpServer::new(move || {
        App::new()
            .app_data(orchestrator.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(routes)
    })
    .bind(("0.0.0.0", port))
    .map_err(|e| RelayError::ServerError(format!("Failed to bind port {}: {}", port, e)))?
    .run()
    .await
    .map_err(|e| RelayError::ServerError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpstreamConfig;
    use actix_web::{body::to_bytes, test};
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator_data(api_url: String) -> web::Data<Orchestrator> {
        let config = UpstreamConfig::new()
            .with_api_url(api_url)
            .with_request_timeout(Duration::from_millis(250))
            .with_retry_pauses(Duration::from_millis(5), Duration::from_millis(5));
        let client = MagicStudioClient::new(config).expect("client should build");
        web::Data::new(Orchestrator::new(client))
    }

    macro_rules! test_app {
        ($api_url:expr) => {
            test::init_service(
                App::new()
                    .app_data(orchestrator_data($api_url))
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_get_without_prompt_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = test_app!(server.uri());
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/generate").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Missing 'prompt' parameter");
    }

    #[actix_web::test]
    async fn test_whitespace_prompt_never_reaches_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let app = test_app!(server.uri());
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/generate?prompt=%20%20%20")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "Prompt cannot be empty");
    }

    #[actix_web::test]
    async fn test_post_with_empty_prompt_is_rejected() {
        let server = MockServer::start().await;
        let app = test_app!(server.uri());

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/generate")
                .set_json(json!({"prompt": ""}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_successful_generation_relays_image_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let app = test_app!(format!("{}/api/ai-art-generator", server.uri()));
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/generate?prompt=a+blue+cat")
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "image/jpeg"
        );
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(bytes.as_ref(), &[0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[actix_web::test]
    async fn test_upstream_failure_maps_to_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
            .expect(1)
            .mount(&server)
            .await;

        let app = test_app!(format!("{}/api/ai-art-generator", server.uri()));
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/generate")
                .set_json(json!({"prompt": "a blue cat"}))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body: ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "API Error: 503");
        assert_eq!(body.details.as_deref(), Some("down for maintenance"));
    }

    #[actix_web::test]
    async fn test_info_endpoints_respond() {
        let server = MockServer::start().await;
        let app = test_app!(server.uri());

        for uri in ["/", "/health", "/test"] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK, "endpoint {} should be up", uri);
        }
    }
}
