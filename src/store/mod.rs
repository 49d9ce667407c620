use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Product, UpdateProduct};

/// Owner of the on-disk catalog file. All reads and writes of the persisted
/// product list go through here; nothing else touches the file.
///
/// Every operation that mutates the catalog holds `write_lock` across its
/// full load-mutate-save cycle, so concurrent requests cannot clobber each
/// other's writes with a stale snapshot.
pub struct Store {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Store {
    /// Open the store at `path`, creating the parent directory and seeding
    /// the file with an empty catalog (`[]`) when it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        match fs::metadata(&path).await {
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::write(&path, b"[]").await?;
                info!(path = %path.display(), "Seeded empty catalog file");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the persisted catalog. A missing file is an empty
    /// catalog. An unreadable or corrupt file is also treated as empty, but
    /// logged, since that case masks real data loss.
    pub async fn load_all(&self) -> Vec<Product> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(path = %self.path.display(), %err, "catalog unreadable, treating as empty");
                }
                return Vec::new();
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(products) => products,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "catalog corrupt, treating as empty");
                Vec::new()
            }
        }
    }

    /// Serialize the full catalog and replace the file. Writes go to a
    /// sibling temp file first and are renamed into place, so a crash
    /// mid-write never leaves a half-written catalog behind.
    pub async fn save_all(&self, products: &[Product]) -> AppResult<()> {
        let raw = serde_json::to_vec_pretty(products)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &raw).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Next id to assign: 1 for an empty catalog, otherwise max id + 1.
    pub fn next_id(products: &[Product]) -> u64 {
        products.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    // ── Catalog operations ────────────────────────────────────────────────────

    pub async fn list(&self) -> Vec<Product> {
        let _guard = self.write_lock.lock().await;
        self.load_all().await
    }

    pub async fn create(
        &self,
        name: String,
        price: f64,
        image_base64: Option<String>,
    ) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load_all().await;

        let product = Product {
            id: Self::next_id(&products),
            name,
            price,
            image_base64,
        };
        products.push(product.clone());
        self.save_all(&products).await?;

        Ok(product)
    }

    /// Locate by id and overwrite only the supplied fields. Empty name and
    /// zero price are treated as "not supplied" and leave the existing value
    /// alone; a provided `imageBase64` always wins, even when empty or null.
    pub async fn update(&self, id: u64, changes: &UpdateProduct) -> AppResult<Product> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load_all().await;

        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))?;

        if let Some(name) = changes.name.as_deref() {
            if !name.is_empty() {
                product.name = name.to_string();
            }
        }
        if let Some(price) = changes.price {
            if price != 0.0 {
                product.price = price;
            }
        }
        if let Some(image) = &changes.image_base64 {
            product.image_base64 = image.clone();
        }

        let updated = product.clone();
        self.save_all(&products).await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: u64) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut products = self.load_all().await;

        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(AppError::NotFound(format!("Product {id} not found")));
        }

        self.save_all(&products).await
    }
}
