use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Recommendation, RecommendError};
use crate::models::{ErrorResponse, RecommendRequest, RecommendResponse, UncertainResponse};
use crate::routes::AppState;

/// Configure chatbot routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chatbot/recommend", web::post().to(recommend_service));
}

/// Recommend a service for a free-text query
///
/// POST /api/v1/chatbot/recommend
///
/// Request body:
/// ```json
/// { "query": "I need a birth certificate" }
/// ```
async fn recommend_service(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Rejected chatbot query: {}", errors);
        state.metrics.record_failure();
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Query is required",
            "Please describe the service you are looking for",
            400,
        ));
    }

    let query = req.query.trim();

    match state.recommender.recommend(query).await {
        Ok(Recommendation::Matched { service, method }) => {
            state
                .metrics
                .record_outcome(query, Some((service.service_name.as_str(), method)));

            HttpResponse::Ok().json(RecommendResponse {
                success: true,
                query: query.to_string(),
                recommendation: service.summary(),
            })
        }
        Ok(Recommendation::Uncertain) => {
            state.metrics.record_outcome(query, None);
            HttpResponse::Ok().json(UncertainResponse::for_query(query))
        }
        Err(RecommendError::EmptyQuery) => {
            state.metrics.record_failure();
            HttpResponse::BadRequest().json(ErrorResponse::new(
                "Query is required",
                "Please describe the service you are looking for",
                400,
            ))
        }
        Err(RecommendError::CatalogEmpty) => {
            state.metrics.record_failure();
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "No services available",
                "The service catalog is empty",
                500,
            ))
        }
        Err(e) => {
            tracing::error!("Recommendation failed for query {:?}: {}", query, e);
            state.metrics.record_failure();
            HttpResponse::InternalServerError().json(
                ErrorResponse::new("Internal server error", "Failed to process your query", 500)
                    .with_details(e.to_string()),
            )
        }
    }
}
