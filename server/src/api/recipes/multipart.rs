use crate::error::AppError;
use crate::recipes::RecipeForm;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

const IMAGE_FIELD: &str = "image";

/// Collect a multipart recipe submission into a [`RecipeForm`].
///
/// The `image` part becomes the upload; every other part is read as text.
/// An empty file part, which browsers send when nothing was picked, is skipped.
pub async fn read_recipe_form(mut multipart: Multipart) -> Result<RecipeForm, AppError> {
    let mut form = RecipeForm::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|f| !f.is_empty());
            let data = field.bytes().await.map_err(multipart_error)?;
            if data.is_empty() && file_name.is_none() {
                continue;
            }
            form.set_image(data.to_vec(), file_name);
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.insert_field(name, value);
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> AppError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("File too large. Maximum size is 5MB")
    } else {
        AppError::validation(format!("Failed to read form data: {}", e.body_text()))
    }
}
