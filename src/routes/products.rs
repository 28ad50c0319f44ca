use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::models::config::CommonServerConfig;
use pushkind_common::routes::{base_context, redirect, render_template};
use tera::Tera;

use crate::forms::products::{AddProductForm, ProductSelectionForm, UpdatePriceForm};
use crate::forms::promotions::ApplyPromotionForm;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, products, promotions};

#[get("/products")]
pub async fn show_products(
    params: web::Query<products::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            let has_active_filters = data.inventory.is_some()
                || data.collection_id.is_some()
                || data
                    .search
                    .as_ref()
                    .map(|value| !value.trim().is_empty())
                    .unwrap_or(false);
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            context.insert("inventory", &data.inventory);
            context.insert("collection_id", &data.collection_id);
            context.insert("collections", &data.collections);
            context.insert("promotions", &data.promotions);
            context.insert("has_active_filters", &has_active_filters);
            render_template(&tera, "products/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Товар «{}» добавлен.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Товар с таким артикулом уже существует.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            FlashMessage::error("Не удалось создать товар.").send();
            redirect("/products")
        }
    }
}

#[post("/products/{product_id}/price")]
pub async fn update_price(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdatePriceForm>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products::update_product_price(repo.get_ref(), &user, product_id, form) {
        Ok(product) => {
            FlashMessage::success(format!("Цена товара «{}» обновлена.", product.name)).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Товар не найден.").send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to update price of product {product_id}: {err}");
            FlashMessage::error("Не удалось обновить цену.").send();
            redirect("/products")
        }
    }
}

#[post("/products/clear-inventory")]
pub async fn clear_inventory(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: ProductSelectionForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Failed to decode product selection: {err}");
            FlashMessage::error("Некорректный выбор товаров.").send();
            return redirect("/products");
        }
    };

    match products::clear_inventory(repo.get_ref(), &user, form) {
        Ok(cleared) => {
            FlashMessage::success(format!("Остатки обнулены у {cleared} товаров.")).send();
            redirect("/products")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to clear inventory: {err}");
            FlashMessage::error("Не удалось обнулить остатки.").send();
            redirect("/products")
        }
    }
}

/// Bulk action "Add products to a promotion".
///
/// Without the `apply` field the promotion picker is rendered for the
/// submitted selection; with it the promotion is applied.
#[post("/products/promotion")]
pub async fn select_promotion(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<CommonServerConfig>,
    tera: web::Data<Tera>,
    body: web::Bytes,
) -> impl Responder {
    let form: ApplyPromotionForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Failed to decode promotion form: {err}");
            FlashMessage::error("Некорректный выбор товаров.").send();
            return redirect("/products");
        }
    };

    if form.wants_apply() {
        return match promotions::apply_promotion(repo.get_ref(), &user, form) {
            Ok(outcome) => {
                let mut message = format!(
                    "Акция применена к товарам: {}.",
                    outcome.linked_count
                );
                if outcome.skipped_count > 0 {
                    message.push_str(&format!(
                        " Уже участвовали в акции: {}.",
                        outcome.skipped_count
                    ));
                }
                FlashMessage::success(message).send();
                redirect("/products")
            }
            Err(ServiceError::Unauthorized) => {
                FlashMessage::error("Недостаточно прав.").send();
                redirect("/na")
            }
            Err(ServiceError::Form(message)) => {
                FlashMessage::error(message).send();
                redirect("/products")
            }
            Err(ServiceError::NotFound) => {
                FlashMessage::error("Акция не найдена. Цены не изменены.").send();
                redirect("/products")
            }
            Err(err) => {
                log::error!("Failed to apply promotion: {err}");
                FlashMessage::error("Не удалось применить акцию. Цены не изменены.").send();
                redirect("/products")
            }
        };
    }

    match promotions::load_promotion_selection(repo.get_ref(), &user, &form) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "products",
                &server_config.auth_service_url,
            );
            context.insert("product_ids", &data.product_ids);
            context.insert("products", &data.products);
            context.insert("promotions", &data.promotions);
            context.insert("selected_promotion_id", &data.selected_promotion_id);
            render_template(&tera, "products/select_promotion.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Недостаточно прав.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products")
        }
        Err(err) => {
            log::error!("Failed to load promotion picker: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
