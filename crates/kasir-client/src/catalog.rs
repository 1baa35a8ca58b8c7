//! Product and category endpoints.

use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use kasir_core::catalog::{Category, CategoryInput, NewProduct, Product, ProductUpdate};
use kasir_core::ids::{CategoryId, ProductId};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;
use tracing::debug;

/// An image upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ProductImage {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image file, guessing its type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let mime = mime_for(path).ok_or_else(|| {
            ClientError::InvalidConfig(format!("unsupported image type: {}", path.display()))
        })?;
        Ok(Self::new(file_name, mime, bytes))
    }

    fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl ApiClient {
    /// `GET /api/products`.
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        let req = self.request(Method::GET, "/api/products", true)?;
        let products: Vec<Product> = self.send(req).await?.data()?;
        debug!(count = products.len(), "listed products");
        Ok(products)
    }

    /// Find a product in the listing by uuid or barcode.
    pub async fn find_product(&self, key: &str) -> Result<Option<Product>> {
        let products = self.list_products().await?;
        Ok(products
            .into_iter()
            .find(|p| p.uuid.as_str() == key || p.barcode.as_deref() == Some(key)))
    }

    /// `GET /api/products/images/{uuid}`: raw image bytes.
    pub async fn product_image(&self, uuid: &ProductId) -> Result<Vec<u8>> {
        let path = format!("/api/products/images/{}", uuid);
        let req = self.request(Method::GET, &path, true)?;
        self.send(req).await?.bytes()
    }

    /// `POST /api/products` as a multipart form.
    pub async fn create_product(
        &self,
        product: &NewProduct,
        image: Option<ProductImage>,
    ) -> Result<String> {
        let mut form = Form::new();
        for (name, value) in product.form_fields() {
            form = form.text(name, value);
        }
        if let Some(image) = image {
            form = form.part("image", image.into_part()?);
        }
        let req = self.request(Method::POST, "/api/products", true)?.multipart(form);
        self.send(req).await?.ack()
    }

    /// `PUT /api/products/{uuid}`.
    pub async fn update_product(&self, uuid: &ProductId, update: &ProductUpdate) -> Result<String> {
        let path = format!("/api/products/{}", uuid);
        let req = self.request(Method::PUT, &path, true)?.json(update);
        self.send(req).await?.ack()
    }

    /// `DELETE /api/products/{uuid}`.
    pub async fn delete_product(&self, uuid: &ProductId) -> Result<String> {
        let path = format!("/api/products/{}", uuid);
        let req = self.request(Method::DELETE, &path, true)?;
        self.send(req).await?.ack()
    }

    /// Replace a product image. The backend only reads multipart bodies on
    /// POST, so the update is sent as POST with `_method=PUT`.
    pub async fn update_product_image(&self, uuid: &ProductId, image: ProductImage) -> Result<String> {
        let form = Form::new()
            .text("_method", "PUT")
            .part("image", image.into_part()?);
        let path = format!("/api/products/{}/image", uuid);
        let req = self.request(Method::POST, &path, true)?.multipart(form);
        self.send(req).await?.ack()
    }

    /// `GET /api/category`.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let req = self.request(Method::GET, "/api/category", true)?;
        self.send(req).await?.data()
    }

    /// `POST /api/category`.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<String> {
        let req = self.request(Method::POST, "/api/category", true)?.json(input);
        self.send(req).await?.ack()
    }

    /// `PUT /api/category/{uuid}`.
    pub async fn update_category(&self, uuid: &CategoryId, input: &CategoryInput) -> Result<String> {
        let path = format!("/api/category/{}", uuid);
        let req = self.request(Method::PUT, &path, true)?.json(input);
        self.send(req).await?.ack()
    }

    /// `DELETE /api/category/{uuid}`.
    pub async fn delete_category(&self, uuid: &CategoryId) -> Result<String> {
        let path = format!("/api/category/{}", uuid);
        let req = self.request(Method::DELETE, &path, true)?;
        self.send(req).await?.ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for(Path::new("teh.PNG")), Some("image/png"));
        assert_eq!(mime_for(Path::new("a/b/kopi.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("noext")), None);
    }

    #[tokio::test]
    async fn test_image_from_path() {
        let dir = std::env::temp_dir().join(format!("kasir-img-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("teh.png");
        tokio::fs::write(&path, [0x89, b'P', b'N', b'G']).await.unwrap();

        let image = ProductImage::from_path(&path).await.unwrap();
        assert_eq!(image.file_name, "teh.png");
        assert_eq!(image.mime, "image/png");
        assert_eq!(image.bytes.len(), 4);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
