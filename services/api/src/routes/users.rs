//! `/admin/userslist`

use axum::{Extension, extract::State};
use common::{
    extract::{PathParam, QueryParams},
    password::hash_password,
    response::Reply,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{AdminUser, UserInput},
    multipart::FormData,
    query::{ListParams, Page},
    storage::{Folder, ImageStore, Upload},
};

const IMAGE_FIELD: &str = "image";

pub async fn list(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListParams>,
) -> ApiResult<Reply<Page<AdminUser>>> {
    let page = state.user_repository.list(&params).await?;
    Ok(Reply::ok(
        "List users",
        page.map(|u| with_url(&state.images, u)),
    ))
}

pub async fn create(State(state): State<AppState>, form: FormData) -> ApiResult<Reply<AdminUser>> {
    let (input, upload) = read_form(&state.images, &form, true)?;

    let password = input.password.as_deref().unwrap_or_default();
    let password_hash = hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?;

    let image = store_image(&state.images, upload).await?;
    let user = match state
        .user_repository
        .create(&input, &password_hash, image.as_deref())
        .await
    {
        Ok(user) => user,
        Err(e) => {
            discard(&state.images, image).await;
            return Err(e.into());
        }
    };

    Ok(Reply::created("User created", with_url(&state.images, user)))
}

pub async fn get(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<AdminUser>> {
    let user = state
        .user_repository
        .get(id)
        .await
        .map_err(|e| ApiError::entity(e, "User"))?;
    Ok(Reply::ok("User detail", with_url(&state.images, user)))
}

pub async fn update(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    form: FormData,
) -> ApiResult<Reply<AdminUser>> {
    let (input, upload) = read_form(&state.images, &form, false)?;

    let password_hash = match input.password.as_deref() {
        Some(password) => {
            Some(hash_password(password).map_err(|e| ApiError::Internal(e.to_string()))?)
        }
        None => None,
    };

    let image = store_image(&state.images, upload).await?;
    let (user, replaced) = match state
        .user_repository
        .update(id, &input, password_hash.as_deref(), image.as_deref())
        .await
    {
        Ok(result) => result,
        Err(e) => {
            discard(&state.images, image).await;
            return Err(ApiError::entity(e, "User"));
        }
    };
    discard(&state.images, replaced).await;

    Ok(Reply::ok("User updated", with_url(&state.images, user)))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(current): Extension<AuthUser>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Reply<()>> {
    if current.id == id {
        return Err(ApiError::Conflict(
            "You cannot delete your own account".into(),
        ));
    }

    let image = state
        .user_repository
        .delete(id)
        .await
        .map_err(|e| ApiError::entity(e, "User"))?;
    info!("User {} deleted by {}", id, current.email);

    discard(&state.images, image).await;
    Ok(Reply::done("User deleted"))
}

fn read_form<'a>(
    images: &ImageStore,
    form: &'a FormData,
    password_required: bool,
) -> ApiResult<(UserInput, Option<&'a Upload>)> {
    let uploads = form.files(IMAGE_FIELD);
    let input = UserInput::from_form(form, password_required);

    let mut errors = input.as_ref().err().cloned().unwrap_or_default();
    if uploads.len() > 1 {
        errors.add(IMAGE_FIELD, "Only one image is allowed");
    }
    if let Some(upload) = uploads.first() {
        if let Err(msg) = images.validate(upload) {
            errors.add(IMAGE_FIELD, msg);
        }
    }
    errors.into_result().map_err(ApiError::Validation)?;

    let input = input.map_err(ApiError::Validation)?;
    Ok((input, uploads.first().copied()))
}

async fn store_image(images: &ImageStore, upload: Option<&Upload>) -> ApiResult<Option<String>> {
    match upload {
        Some(upload) => Ok(Some(images.store(Folder::Users, upload).await?)),
        None => Ok(None),
    }
}

async fn discard(images: &ImageStore, name: Option<String>) {
    if let Some(name) = name {
        images.discard(Folder::Users, &[name]).await;
    }
}

fn with_url(images: &ImageStore, mut user: AdminUser) -> AdminUser {
    user.image_url = user
        .image
        .as_deref()
        .map(|name| images.public_url(Folder::Users, name));
    user
}
