use std::path::{Path, PathBuf};

use anyhow::Context;
use uuid::Uuid;

use crate::domain::RecipeImage;

const RECIPE_IMAGES_DIR: &str = "recipes";

/// Stores uploaded images below `root` and turns their relative paths into
/// public URLs under `{base_url}/media/`.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image under a fresh name and returns its relative path.
    #[tracing::instrument(name = "Saving recipe image", skip(self, image))]
    pub async fn save_recipe_image(
        &self,
        image: &RecipeImage,
    ) -> Result<String, anyhow::Error> {
        let directory = self.root.join(RECIPE_IMAGES_DIR);
        tokio::fs::create_dir_all(&directory)
            .await
            .with_context(|| format!("Failed to create {}", directory.display()))?;
        let file_name = format!("{}.{}", Uuid::now_v7(), image.extension());
        tokio::fs::write(directory.join(&file_name), image.bytes())
            .await
            .context("Failed to write recipe image.")?;
        Ok(format!("{RECIPE_IMAGES_DIR}/{file_name}"))
    }

    /// Best effort: a missing file is only logged.
    pub async fn remove(&self, relative_path: &str) {
        if let Err(error) = tokio::fs::remove_file(self.root.join(relative_path)).await {
            tracing::warn!(
                error.cause_chain = ?error,
                path = relative_path,
                "Could not remove stored image."
            );
        }
    }

    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}/media/{}", self.base_url, relative_path)
    }
}
