use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::auth::{AuthError, AuthGate, Caller};
use crate::core::MentorMatcher;
use crate::models::{CandidateQuery, ErrorResponse, HealthResponse, RankMentorsRequest, Role, StudentProfile};
use crate::services::{DirectoryError, UserDirectory};
use std::sync::Arc;
use tracing::Instrument;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub auth: Arc<AuthGate>,
    pub matcher: MentorMatcher,
    pub max_candidates: usize,
}

/// Configure all mentor-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/ai/mentor-match", web::get().to(mentor_match))
        .route("/mentors/rank", web::post().to(rank_mentors));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_ranking_enabled: state.matcher.ai_enabled(),
        timestamp: chrono::Utc::now(),
    })
}

fn unauthorized(err: AuthError) -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse::new(
        "Unauthorized",
        err.to_string(),
        401,
    ))
}

fn authenticate(auth: &AuthGate, req: &HttpRequest) -> Result<Caller, HttpResponse> {
    auth.authorize_request(req).map_err(|e| {
        tracing::info!("Rejected request to {}: {}", req.path(), e);
        unauthorized(e)
    })
}

/// Mentor recommendations for the calling student
///
/// GET /api/v1/ai/mentor-match
///
/// Requires `Authorization: Bearer <token>` for a Student. The candidate pool
/// is the verified, mentoring alumni of the student's institution.
async fn mentor_match(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let caller = match authenticate(&state.auth, &req) {
        Ok(caller) => caller,
        Err(response) => return response,
    };

    if caller.role != Role::Student {
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            "Forbidden",
            "Only students can request mentor matches",
            403,
        ));
    }

    let student = match state.directory.get_user(&caller.user_id).await {
        Ok(user) => user,
        Err(DirectoryError::NotFound(_)) => {
            return unauthorized(AuthError::InvalidToken);
        }
        Err(e) => {
            tracing::error!("Failed to fetch student {}: {}", caller.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch user profile",
                e.to_string(),
                500,
            ));
        }
    };

    if student.role != Role::Student {
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            "Forbidden",
            "Only students can request mentor matches",
            403,
        ));
    }

    let Some(institution_id) = student.institution_id.clone().or(caller.institution_id) else {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Missing institution",
            "Student is not associated with an institution",
            400,
        ));
    };

    let query = CandidateQuery {
        institution_id,
        exclude_user_id: Some(student.id.clone()),
        limit: state.max_candidates,
    };

    let candidates = match state.directory.find_candidates(&query).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Failed to query mentors for institution {}: {}", query.institution_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to query mentors",
                e.to_string(),
                500,
            ));
        }
    };

    let pool_size = candidates.len();
    let profile = StudentProfile::from(&student);

    let span = tracing::info_span!("mentor_match", request_id = %uuid::Uuid::new_v4(), student = %student.id);

    match state.matcher.match_mentors(&profile, candidates).instrument(span).await {
        Ok(result) => {
            tracing::info!(
                "Returning {} mentor matches for student {} (pool: {}, ai_powered: {})",
                result.matches.len(),
                student.id,
                pool_size,
                result.ai_powered
            );
            HttpResponse::Ok().json(result)
        }
        Err(e) => {
            tracing::error!("Mentor matching failed for {}: {}", student.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Mentor matching failed",
                e.to_string(),
                500,
            ))
        }
    }
}

/// Rank a caller-supplied candidate pool
///
/// POST /api/v1/mentors/rank
///
/// Request body:
/// ```json
/// {
///   "student": { "major": "CS", "graduation_year": 2026, "location": "NY", "industry": "Tech" },
///   "candidates": [{ "id": "m1", "name": "Ada Lovelace", "major": "CS" }]
/// }
/// ```
async fn rank_mentors(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Result<web::Json<RankMentorsRequest>, actix_web::Error>,
) -> impl Responder {
    if let Err(response) = authenticate(&state.auth, &req) {
        return response;
    }

    let body = match body {
        Ok(body) => body,
        Err(e) => return e.error_response(),
    };

    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "Validation failed",
            errors.to_string(),
            400,
        ));
    }

    let RankMentorsRequest { student, candidates } = body.into_inner();

    match state.matcher.match_mentors(&student, candidates).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            tracing::error!("Ranking supplied pool failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Mentor matching failed",
                e.to_string(),
                500,
            ))
        }
    }
}
