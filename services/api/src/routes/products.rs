//! `/admin/products`
//!
//! Create and update take a multipart form; image files go to the image store
//! before the database write and are removed again if that write fails.

use axum::extract::State;
use common::{
    error::FieldErrors,
    extract::{PathParam, QueryParams},
    response::Reply,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{Product, ProductInput},
    multipart::FormData,
    query::{ListParams, Page},
    storage::{Folder, ImageStore, Upload},
};

const IMAGES_FIELD: &str = "images";

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Reply<Page<Product>>> {
    let page = state.product_repository.list(&params).await?;
    Ok(Reply::ok(
        "List products",
        page.map(|p| with_urls(&state.images, p)),
    ))
}

pub async fn create(State(state): State<AppState>, form: FormData) -> ApiResult<Reply<Product>> {
    let (input, uploads) = read_form(&state.images, &form)?;

    let stored = state.images.store_all(Folder::Products, &uploads).await?;
    let product = match state.product_repository.create(&input, &stored).await {
        Ok(product) => product,
        Err(e) => {
            state.images.discard(Folder::Products, &stored).await;
            return Err(ApiError::entity(e, "Product"));
        }
    };

    Ok(Reply::created(
        "Product created",
        with_urls(&state.images, product),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<Product>> {
    let product = state
        .product_repository
        .get(id)
        .await
        .map_err(|e| ApiError::entity(e, "Product"))?;
    Ok(Reply::ok("Product detail", with_urls(&state.images, product)))
}

pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    form: FormData,
) -> ApiResult<Reply<Product>> {
    let (input, uploads) = read_form(&state.images, &form)?;

    let stored = state.images.store_all(Folder::Products, &uploads).await?;
    let product = match state.product_repository.update(id, &input, &stored).await {
        Ok(product) => product,
        Err(e) => {
            state.images.discard(Folder::Products, &stored).await;
            return Err(ApiError::entity(e, "Product"));
        }
    };

    Ok(Reply::ok("Product updated", with_urls(&state.images, product)))
}

pub async fn delete(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<()>> {
    let images = state
        .product_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::entity(e, "Product"))?;

    state.images.discard(Folder::Products, &images).await;
    Ok(Reply::done("Product deleted"))
}

/// Validate the scalar fields and every image together
fn read_form<'a>(
    images: &ImageStore,
    form: &'a FormData,
) -> ApiResult<(ProductInput, Vec<&'a Upload>)> {
    let uploads = form.files(IMAGES_FIELD);
    let input = ProductInput::from_form(form);

    let mut errors: FieldErrors = input.as_ref().err().cloned().unwrap_or_default();
    for upload in &uploads {
        if let Err(msg) = images.validate(upload) {
            errors.add(IMAGES_FIELD, format!("{}: {}", upload.file_name, msg));
        }
    }
    errors.into_result().map_err(ApiError::Validation)?;

    let input = input.map_err(ApiError::Validation)?;
    Ok((input, uploads))
}

fn with_urls(images: &ImageStore, mut product: Product) -> Product {
    for image in &mut product.images {
        image.url = images.public_url(Folder::Products, &image.filename);
    }
    product
}
