use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::promotions::AddPromotionForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::promotions::{
    PromotionsQuery, create_promotion, load_promotions_page, remove_promotion,
};

#[get("/promotions")]
pub async fn show_promotions(
    params: web::Query<PromotionsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_promotions_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "promotions",
                &server_config.auth_service_url,
            );
            context.insert("promotions", &data.promotions);
            context.insert("search", &data.search);
            context.insert("search_action", "/promotions");
            render_template(&tera, "promotions/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list promotions: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/promotions/add")]
pub async fn add_promotion(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddPromotionForm>,
) -> impl Responder {
    match create_promotion(repo.get_ref(), &user, form.into_inner()) {
        Ok(promotion) => {
            FlashMessage::success(format!("Акция «{}» добавлена.", promotion.description)).send();
            redirect("/promotions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/promotions")
        }
        Err(err) => {
            log::error!("Failed to create promotion: {err}");
            FlashMessage::error("Не удалось создать акцию.").send();
            redirect("/promotions")
        }
    }
}

#[post("/promotions/{promotion_id}/delete")]
pub async fn delete_promotion(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let promotion_id = path.into_inner();

    match remove_promotion(repo.get_ref(), &user, promotion_id) {
        Ok(()) => {
            FlashMessage::success("Акция удалена.").send();
            redirect("/promotions")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Акция не найдена или уже удалена.").send();
            redirect("/promotions")
        }
        Err(err) => {
            log::error!("Failed to delete promotion {promotion_id}: {err}");
            FlashMessage::error("Не удалось удалить акцию.").send();
            redirect("/promotions")
        }
    }
}
