use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use fitx_analyzer::source::{normalize_firebase_url, validate_image_url};
use fitx_analyzer::{
    prefetch, AnalyzerConfig, FetchMode, GarmentClassifier, ImageSource, OutfitAnalyzer,
    VisionLanguageModel,
};
use fitx_core::{outfit_combinations, Category, GarmentPool, GarmentRecord, Occasion, Recommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared by every worker: the model, where images come from, and the analyzer settings.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn VisionLanguageModel>,
    pub images: Arc<dyn ImageSource>,
    pub config: AnalyzerConfig,
}

impl AppState {
    pub fn new(
        model: Arc<dyn VisionLanguageModel>,
        images: Arc<dyn ImageSource>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            model,
            images,
            config,
        }
    }
}

#[derive(Deserialize)]
struct RecommendationsRequest {
    items: Vec<GarmentRecord>,
    occasion: Option<String>,
}

#[derive(Serialize)]
struct ProcessImagesResponse {
    classification: Vec<GarmentRecord>,
    outfit_combinations: BTreeMap<String, Vec<String>>,
    errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
    success: bool,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        let state = web::Data::new(state);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(RestApi::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.route("/health", web::get().to(health))
            .route("/process_images", web::post().to(process_images))
            .route("/recommendations", web::post().to(recommendations));
    }
}

fn bad_request(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "error": message.into(),
        "success": false
    }))
}

fn internal_error(message: impl std::fmt::Display) -> HttpResponse {
    error!("request failed: {message}");
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error",
        "details": message.to_string(),
        "success": false
    }))
}

async fn health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}

/// Pull the URL list out of a `process_images` body, normalized and validated.
fn parse_image_urls(body: &serde_json::Value) -> Result<Vec<String>, String> {
    let images = body.get("images").ok_or("Missing images data")?;
    let images = images.as_array().ok_or("Images should be a list of URLs")?;
    if images.is_empty() {
        return Err("No images provided".into());
    }

    let mut urls = Vec::with_capacity(images.len());
    let mut invalid = Vec::new();
    for value in images {
        match value.as_str().map(normalize_firebase_url) {
            Some(url) if validate_image_url(&url) => urls.push(url),
            Some(url) => invalid.push(url),
            None => invalid.push(value.to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(format!("Invalid image URLs: {invalid:?}"));
    }
    Ok(urls)
}

async fn process_images(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let urls = match parse_image_urls(&body) {
        Ok(urls) => urls,
        Err(message) => {
            warn!("rejected process_images request: {message}");
            return Ok(bad_request(message));
        }
    };
    info!(images = urls.len(), "processing images");

    // In concurrent mode every image is fetched once up front and reused for scoring.
    let images: Arc<dyn ImageSource> = match state.config.fetch.mode {
        FetchMode::Sync => state.images.clone(),
        FetchMode::Concurrent => Arc::new(
            prefetch(state.images.clone(), urls.clone(), state.config.fetch.timeout()).await,
        ),
    };

    let model = state.model.clone();
    let config = state.config.clone();
    let outcome = web::block(move || -> fitx_core::Result<_> {
        let classifier = GarmentClassifier::new(model.clone(), images.clone());
        let mut records = Vec::with_capacity(urls.len());
        let mut errors = Vec::new();
        for url in &urls {
            match classifier.classify(url) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(url, "classification failed: {e}");
                    errors.push(format!("Failed to process {url}: {e}"));
                }
            }
        }
        if records.is_empty() {
            return Ok((records, errors, None));
        }

        let analyzer = OutfitAnalyzer::new(
            GarmentPool::new(records.clone()),
            model,
            images,
            config,
        )?;
        let recommendations = analyzer.recommend_across_occasions();
        Ok((records, errors, Some(recommendations)))
    })
    .await;

    let (classification, errors, recommendations) = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => return Ok(internal_error(e)),
        Err(e) => return Ok(internal_error(e)),
    };

    let Some(recommendations) = recommendations else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "All images failed processing",
            "details": errors,
            "success": false
        })));
    };

    let warning = (!classification
        .iter()
        .any(|g| matches!(g.category, Category::Top | Category::Bottom | Category::Dress)))
    .then(|| "No tops, bottoms, or dresses found".to_string());

    Ok(HttpResponse::Ok().json(ProcessImagesResponse {
        outfit_combinations: outfit_combinations(&recommendations),
        classification,
        errors: (!errors.is_empty()).then_some(errors),
        warning,
        success: true,
    }))
}

async fn recommendations(
    state: web::Data<AppState>,
    req: web::Json<RecommendationsRequest>,
) -> ActixResult<HttpResponse> {
    let RecommendationsRequest { items, occasion } = req.into_inner();
    let occasion = match occasion.as_deref().map(str::parse::<Occasion>).transpose() {
        Ok(occasion) => occasion,
        Err(e) => return Ok(bad_request(e.to_string())),
    };

    let analyzer = match OutfitAnalyzer::new(
        GarmentPool::new(items),
        state.model.clone(),
        state.images.clone(),
        state.config.clone(),
    ) {
        Ok(analyzer) => analyzer,
        Err(e) => return Ok(internal_error(e)),
    };

    let outcome: Result<Vec<Recommendation>, _> = match state.config.fetch.mode {
        FetchMode::Sync => web::block(move || analyzer.find_best_matches(occasion)).await,
        FetchMode::Concurrent => {
            let images = analyzer.prefetch_images(occasion).await;
            web::block(move || analyzer.find_best_matches_from(occasion, &images)).await
        }
    };

    match outcome {
        Ok(recommendations) => Ok(HttpResponse::Ok().json(recommendations)),
        Err(e) => Ok(internal_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use fitx_analyzer::{HashingModel, PrefetchedImages};
    use image::{Rgb, RgbImage};

    const SHIRT: &str = "https://cdn.example.com/shirt.png";
    const JEANS: &str = "https://cdn.example.com/jeans.jpg";
    const MISSING: &str = "https://cdn.example.com/missing.png";

    fn state(mode: FetchMode) -> AppState {
        let mut images = PrefetchedImages::default();
        images.insert(SHIRT.into(), Ok(RgbImage::from_pixel(64, 64, Rgb([220, 40, 40]))));
        images.insert(JEANS.into(), Ok(RgbImage::from_pixel(64, 64, Rgb([30, 40, 140]))));
        let mut config = AnalyzerConfig {
            seed: Some(1),
            ..AnalyzerConfig::default()
        };
        config.fetch.mode = mode;
        AppState::new(Arc::new(HashingModel::default()), Arc::new(images), config)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state))
                    .configure(RestApi::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_health() {
        let app = app!(state(FetchMode::Sync));
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_process_images_rejects_bad_input() {
        let app = app!(state(FetchMode::Sync));
        for body in [
            serde_json::json!({}),
            serde_json::json!({ "images": [] }),
            serde_json::json!({ "images": SHIRT }),
            serde_json::json!({ "images": [SHIRT, "https://cdn.example.com/notes.txt"] }),
        ] {
            let req = test::TestRequest::post()
                .uri("/process_images")
                .set_json(&body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        }
    }

    #[actix_web::test]
    async fn test_process_images_collects_failures() {
        for mode in [FetchMode::Sync, FetchMode::Concurrent] {
            let app = app!(state(mode));
            let req = test::TestRequest::post()
                .uri("/process_images")
                .set_json(serde_json::json!({ "images": [SHIRT, JEANS, MISSING] }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["success"], true);
            assert_eq!(body["classification"].as_array().unwrap().len(), 2);
            let errors = body["errors"].as_array().unwrap();
            assert_eq!(errors.len(), 1);
            assert!(errors[0].as_str().unwrap().contains(MISSING));
            assert!(body["outfit_combinations"].is_object());
        }
    }

    #[actix_web::test]
    async fn test_process_images_all_failed() {
        let app = app!(state(FetchMode::Sync));
        let req = test::TestRequest::post()
            .uri("/process_images")
            .set_json(serde_json::json!({ "images": [MISSING] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "All images failed processing");
        assert_eq!(body["details"].as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_recommendations_standalone_dress() {
        let app = app!(state(FetchMode::Sync));
        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({
                "items": [
                    { "image_path": "dress.png", "Clothing_Type": "Dress", "Occasion": "Partywear" },
                    { "image_path": "shirt.png", "Clothing_Type": "Shirt", "Occasion": "Casual" }
                ],
                "occasion": "partywear"
            }))
            .to_request();
        let recs: Vec<Recommendation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].anchor.image_reference, "dress.png");
        assert!(recs[0].matches.is_none());
    }

    #[actix_web::test]
    async fn test_recommendations_unknown_occasion() {
        let app = app!(state(FetchMode::Sync));
        let req = test::TestRequest::post()
            .uri("/recommendations")
            .set_json(serde_json::json!({ "items": [], "occasion": "Gala" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
