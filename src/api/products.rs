// Catalog CRUD API
//
// Reads are public; mutations require an admin session. Product fields
// arrive as a multipart form (the admin UI submits text fields plus an
// optional `image` file), so every field goes through the documented
// parse-with-default policy in `forms`.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::auth::AdminUser;
use super::error::ApiError;
use super::forms;
use crate::store::{Collection, Product};
use crate::uploads;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Text fields and the optional image file of a product form submission.
#[derive(Debug, Default)]
struct ProductForm {
    id: Option<String>,
    name: Option<String>,
    short_description: Option<String>,
    long_description: Option<String>,
    ingredients: Option<String>,
    price: Option<String>,
    discount: Option<String>,
    featured: Option<String>,
    quiz_score: Option<String>,
    image: Option<UploadedImage>,
}

#[derive(Debug)]
struct UploadedImage {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Drain the multipart body into a `ProductForm`. Upload validation runs
/// here, before any collection is touched, so a rejected file never leaves
/// a half-applied mutation behind.
async fn read_form(mut multipart: Multipart) -> Result<ProductForm, ApiError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::validation("Malformed multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            if file_name.is_empty() {
                // an empty file input still submits the field
                continue;
            }
            let content_type = field.content_type().map(|ct| ct.to_string());
            uploads::validate_image(&file_name, content_type.as_deref())?;
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::validation("Failed to read uploaded file"))?;
            if data.len() > uploads::MAX_IMAGE_BYTES {
                return Err(uploads::UploadError::TooLarge.into());
            }
            form.image = Some(UploadedImage {
                file_name,
                content_type,
                data,
            });
        } else {
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::validation("Malformed multipart body"))?;
            match name.as_str() {
                "id" => form.id = Some(text),
                "name" => form.name = Some(text),
                "short_description" => form.short_description = Some(text),
                "long_description" => form.long_description = Some(text),
                "ingredients" => form.ingredients = Some(text),
                "price" => form.price = Some(text),
                "discount" => form.discount = Some(text),
                "featured" => form.featured = Some(text),
                "quiz_score" => form.quiz_score = Some(text),
                _ => {}
            }
        }
    }

    Ok(form)
}

/// Overwrite every content field from the form. Used identically by create
/// and update: an update is a full replacement, not a partial merge. The
/// image reference is handled separately by the callers.
fn apply_fields(product: &mut Product, form: &ProductForm) -> Result<(), ApiError> {
    product.name = form.name.clone().unwrap_or_default();
    product.short_description = form.short_description.clone().unwrap_or_default();
    product.long_description = form.long_description.clone().unwrap_or_default();
    product.ingredients = forms::parse_json_list("ingredients", form.ingredients.as_deref())?;
    product.price = forms::parse_price(form.price.as_deref());
    product.discount = forms::parse_discount(form.discount.as_deref());
    product.featured = forms::parse_featured(form.featured.as_deref());
    product.quiz_score = forms::parse_json_list("quiz_score", form.quiz_score.as_deref())?;
    Ok(())
}

/// List all products
///
/// GET /api/products
pub async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    let products: Vec<Product> = state.store.load(Collection::Products).await;
    Json(products)
}

/// Get a product by identifier
///
/// GET /api/products/:id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let products: Vec<Product> = state.store.load(Collection::Products).await;
    products
        .into_iter()
        .find(|p| p.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

/// Create a product
///
/// POST /api/admin/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<Product>, ApiError> {
    let form = read_form(multipart).await?;

    let _guard = state.store.lock(Collection::Products).await;
    let mut products: Vec<Product> = state.store.load(Collection::Products).await;

    let id = form
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("product-{}", Utc::now().timestamp_millis()));

    // A colliding id would make lookups by id ambiguous forever after.
    if products.iter().any(|p| p.id == id) {
        return Err(ApiError::conflict(format!(
            "A product with id '{id}' already exists"
        )));
    }

    let mut product = Product {
        id,
        name: String::new(),
        short_description: String::new(),
        long_description: String::new(),
        ingredients: Vec::new(),
        price: 0.0,
        discount: 0,
        featured: false,
        img_url: uploads::PLACEHOLDER_IMG.to_string(),
        quiz_score: Vec::new(),
    };
    apply_fields(&mut product, &form)?;

    if let Some(image) = &form.image {
        product.img_url = uploads::store_product_image(
            &state.config.storage.upload_dir,
            &image.file_name,
            image.content_type.as_deref(),
            &image.data,
        )
        .await?;
    }

    products.push(product.clone());
    state.store.save(Collection::Products, &products).await?;

    info!(id = %product.id, by = %admin.username, "Product created");
    Ok(Json(product))
}

/// Update a product
///
/// PUT /api/admin/products/:id
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<Product>, ApiError> {
    let form = read_form(multipart).await?;

    let _guard = state.store.lock(Collection::Products).await;
    let mut products: Vec<Product> = state.store.load(Collection::Products).await;

    let index = products
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| ApiError::not_found("Product not found"))?;

    apply_fields(&mut products[index], &form)?;

    // The image reference survives unless a new file was uploaded.
    if let Some(image) = &form.image {
        products[index].img_url = uploads::store_product_image(
            &state.config.storage.upload_dir,
            &image.file_name,
            image.content_type.as_deref(),
            &image.data,
        )
        .await?;
    }

    let product = products[index].clone();
    state.store.save(Collection::Products, &products).await?;

    info!(id = %product.id, by = %admin.username, "Product updated");
    Ok(Json(product))
}

/// Delete a product
///
/// DELETE /api/admin/products/:id
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    admin: AdminUser,
) -> Result<Json<DeleteResponse>, ApiError> {
    let _guard = state.store.lock(Collection::Products).await;
    let products: Vec<Product> = state.store.load(Collection::Products).await;

    // length compare before/after the filter detects the miss
    let before = products.len();
    let remaining: Vec<Product> = products.into_iter().filter(|p| p.id != id).collect();
    if remaining.len() == before {
        return Err(ApiError::not_found("Product not found"));
    }

    state.store.save(Collection::Products, &remaining).await?;

    info!(id = %id, by = %admin.username, "Product deleted");
    Ok(Json(DeleteResponse { success: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_product() -> Product {
        Product {
            id: "p".into(),
            name: String::new(),
            short_description: String::new(),
            long_description: String::new(),
            ingredients: Vec::new(),
            price: 0.0,
            discount: 0,
            featured: false,
            img_url: uploads::PLACEHOLDER_IMG.to_string(),
            quiz_score: Vec::new(),
        }
    }

    #[test]
    fn apply_fields_is_a_full_overwrite() {
        let mut product = empty_product();
        product.name = "old".into();
        product.discount = 50;

        let form = ProductForm {
            name: Some("Pan de Campo".into()),
            price: Some("2500".into()),
            ingredients: Some(r#"["Harina","Agua"]"#.into()),
            featured: Some("true".into()),
            ..Default::default()
        };
        apply_fields(&mut product, &form).unwrap();

        assert_eq!(product.name, "Pan de Campo");
        assert_eq!(product.price, 2500.0);
        assert_eq!(product.ingredients, vec!["Harina", "Agua"]);
        assert!(product.featured);
        // absent fields reset to their defaults, not preserved
        assert_eq!(product.discount, 0);
        assert_eq!(product.short_description, "");
    }

    #[test]
    fn malformed_ingredients_fail_instead_of_defaulting() {
        let mut product = empty_product();
        let form = ProductForm {
            ingredients: Some("[broken".into()),
            ..Default::default()
        };
        assert!(apply_fields(&mut product, &form).is_err());
    }

    #[test]
    fn apply_fields_never_touches_id_or_image() {
        let mut product = empty_product();
        product.id = "pan-campo".into();
        product.img_url = "/uploads/products/123.png".into();

        let form = ProductForm {
            price: Some("2000".into()),
            discount: Some("10".into()),
            ..Default::default()
        };
        apply_fields(&mut product, &form).unwrap();

        assert_eq!(product.id, "pan-campo");
        assert_eq!(product.img_url, "/uploads/products/123.png");
        assert_eq!(product.price, 2000.0);
        assert_eq!(product.discount, 10);
    }
}
