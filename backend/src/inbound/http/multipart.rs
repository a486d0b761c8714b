//! `multipart/form-data` decoding for product uploads.
//!
//! A product form carries text fields plus at most one `image` file. Images
//! must be JPEG or PNG and no larger than [`MAX_IMAGE_BYTES`].

use std::collections::HashMap;

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::TryStreamExt;
use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::ImageUpload;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 3 * 1024 * 1024;
/// Largest accepted text field, in bytes.
const MAX_TEXT_BYTES: usize = 16 * 1024;
/// Form field carrying the image file.
pub const IMAGE_FIELD: &str = "image";
const ACCEPTED_IMAGE_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// Decoded product form.
#[derive(Debug, Default)]
pub struct ProductForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl ProductForm {
    /// Remove and return a text field.
    pub fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    /// Remove and return the uploaded image.
    pub fn take_image(&mut self) -> Option<ImageUpload> {
        self.image.take()
    }

    /// Remove and return the uploaded image, failing when none was sent.
    pub fn require_image(&mut self) -> Result<ImageUpload, Error> {
        self.take_image()
            .ok_or_else(|| missing_field_error(FieldName::new(IMAGE_FIELD)))
    }
}

fn multipart_error(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

fn image_error(message: &str, code: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": IMAGE_FIELD, "code": code }))
}

/// Read the whole form into memory, enforcing the size and type limits.
pub async fn read_product_form(mut payload: Multipart) -> Result<ProductForm, Error> {
    let mut form = ProductForm::default();
    while let Some(field) = payload.try_next().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == IMAGE_FIELD {
            form.image = Some(read_image(field).await?);
        } else {
            let bytes = read_limited(field, MAX_TEXT_BYTES).await?.ok_or_else(|| {
                Error::invalid_request(format!("field {name} is too large"))
            })?;
            let text = String::from_utf8(bytes)
                .map_err(|_| Error::invalid_request(format!("field {name} must be UTF-8 text")))?;
            form.fields.insert(name, text);
        }
    }
    Ok(form)
}

async fn read_image(field: Field) -> Result<ImageUpload, Error> {
    let content_type = field
        .content_type()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default();
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
        return Err(image_error(
            "image must be a JPEG or PNG file",
            "unsupported_image_type",
        ));
    }
    let name = field
        .content_disposition()
        .and_then(|disposition| disposition.get_filename())
        .unwrap_or(IMAGE_FIELD)
        .to_owned();
    let bytes = read_limited(field, MAX_IMAGE_BYTES)
        .await?
        .ok_or_else(|| image_error("image must be at most 3 MB", "image_too_large"))?;
    if bytes.is_empty() {
        return Err(missing_field_error(FieldName::new(IMAGE_FIELD)));
    }
    Ok(ImageUpload {
        name,
        bytes,
        content_type,
    })
}

/// Collect a field's bytes; `None` once `limit` is exceeded.
async fn read_limited(mut field: Field, limit: usize) -> Result<Option<Vec<u8>>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limit {
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}
