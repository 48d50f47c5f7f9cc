use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, ServiceListResponse};
use crate::routes::AppState;

/// Configure catalog routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/services", web::get().to(list_services))
        .route("/services/{id}", web::get().to(get_service));
}

/// List every service
///
/// GET /api/v1/services
///
/// This is where uncertain chatbot answers send the citizen.
async fn list_services(state: web::Data<AppState>) -> impl Responder {
    match state.catalog.list_services().await {
        Ok(services) => HttpResponse::Ok().json(ServiceListResponse {
            success: true,
            count: services.len(),
            services,
        }),
        Err(e) => {
            tracing::error!("Failed to list services: {}", e);
            HttpResponse::InternalServerError().json(
                ErrorResponse::new("Failed to fetch services", "Could not read the service catalog", 500)
                    .with_details(e.to_string()),
            )
        }
    }
}

/// Fetch one service
///
/// GET /api/v1/services/{id}
async fn get_service(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.catalog.get_service(&id).await {
        Ok(Some(service)) => HttpResponse::Ok().json(service),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse::new(
            "Service not found",
            format!("No service with id {}", id),
            404,
        )),
        Err(e) => {
            tracing::error!("Failed to fetch service {}: {}", id, e);
            HttpResponse::InternalServerError().json(
                ErrorResponse::new("Failed to fetch service", "Could not read the service catalog", 500)
                    .with_details(e.to_string()),
            )
        }
    }
}
