use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::collections::AddCollectionForm;
use crate::repository::DieselRepository;
use crate::services::ServiceError;
use crate::services::collections::{CollectionsQuery, create_collection, load_collections};

#[get("/collections")]
pub async fn show_collections(
    params: web::Query<CollectionsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match load_collections(repo.get_ref(), &user, params.into_inner()) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "collections",
                &server_config.auth_service_url,
            );
            context.insert("collections", &data.collections);
            if let Some(search) = data.search {
                context.insert("search", &search);
            }
            render_template(&tera, "collections/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list collections: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/collections/add")]
pub async fn add_collection(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Form<AddCollectionForm>,
) -> impl Responder {
    match create_collection(repo.get_ref(), &user, form.into_inner()) {
        Ok(collection) => {
            FlashMessage::success(format!("Коллекция «{}» добавлена.", collection.name)).send();
            redirect("/collections")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/collections")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Коллекция с таким названием уже существует.").send();
            redirect("/collections")
        }
        Err(err) => {
            log::error!("Failed to create collection: {err}");
            FlashMessage::error("Не удалось создать коллекцию.").send();
            redirect("/collections")
        }
    }
}
