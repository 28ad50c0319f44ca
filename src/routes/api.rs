use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::{DieselRepository, PromotionReader};
use crate::services::ServiceError;
use crate::services::promotions::{PromotionsQuery, load_promotions_page};

#[get("/v1/promotions")]
/// Return a JSON list of promotions with optional search and pagination.
///
/// Users without the role stored in `crate::SERVICE_ACCESS_ROLE` receive a `401 Unauthorized` response.
pub async fn api_v1_promotions(
    params: web::Query<PromotionsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    promotions_json(repo.get_ref(), &user, params.into_inner())
}

fn promotions_json<R>(repo: &R, user: &AuthenticatedUser, query: PromotionsQuery) -> HttpResponse
where
    R: PromotionReader + ?Sized,
{
    match load_promotions_page(repo, user, query) {
        Ok(data) => HttpResponse::Ok().json(data.promotions),
        Err(ServiceError::Unauthorized) => HttpResponse::Unauthorized().finish(),
        Err(err) => {
            log::error!("Failed to list promotions: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
