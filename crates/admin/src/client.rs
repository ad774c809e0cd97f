//! Admin endpoints on top of the storefront's [`BackendClient`].

use std::path::Path;

use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use swiftthrift_core::{Order, Payment, UserId};
use swiftthrift_storefront::BackendClient;
use swiftthrift_storefront::api::ApiError;
use swiftthrift_storefront::api::types::{
    AdminLoginRequest, CreateCategoryRequest, CreateProductPayload,
};
use tracing::instrument;

/// An image attached to a new product.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Read an image from disk, guessing the content type from the
    /// extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self {
            content_type: content_type_for(path).map(String::from),
            file_name,
            bytes,
        })
    }

    fn into_part(self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        Ok(match self.content_type {
            Some(mime) => part.mime_str(&mime)?,
            None => part,
        })
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Admin-only calls. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: BackendClient,
}

impl AdminClient {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// The wrapped storefront client.
    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.client
    }

    /// `POST admins/login`. Success is the status alone; the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), ApiError> {
        let body = AdminLoginRequest {
            username,
            password: password.expose_secret(),
        };
        self.client.post_json_discard("admins/login", &body).await
    }

    /// Create a product: a JSON part named `product` followed by one `files`
    /// part per image.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the backend
    /// rejects it.
    #[instrument(skip(self, payload, images), fields(name = %payload.name, images = images.len()))]
    pub async fn create_product(
        &self,
        payload: &CreateProductPayload,
        images: Vec<ImageUpload>,
    ) -> Result<(), ApiError> {
        let json = serde_json::to_string(payload)?;
        let mut form = Form::new().part("product", Part::text(json).mime_str("application/json")?);
        for image in images {
            form = form.part("files", image.into_part()?);
        }
        self.client.post_multipart("products/create", form).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the backend rejects the category.
    #[instrument(skip(self))]
    pub async fn create_category(&self, category_name: &str) -> Result<(), ApiError> {
        let body = CreateCategoryRequest {
            category_name: category_name.to_string(),
        };
        self.client.post_json_discard("categories/create", &body).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.client.all_orders().await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn payments_by_user(&self, user_id: UserId) -> Result<Vec<Payment>, ApiError> {
        self.client.payments_by_user(user_id).await
    }
}
