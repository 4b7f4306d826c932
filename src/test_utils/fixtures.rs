use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use crate::catalog::{Catalog, Difficulty, Project};
use crate::storage::{KeyValueStore, MemoryStore};

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a project-level `config.toml` in the fixture root.
    #[must_use]
    pub fn create_config(&self, content: &str) -> PathBuf {
        self.create_file("config.toml", content)
    }

    #[must_use]
    pub fn memory_store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryStore::new())
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}

/// Small catalog with one project per derived category.
///
/// | slug           | effective difficulty | category           |
/// |----------------|----------------------|--------------------|
/// | portfolio      | beginner (tagged)    | Vanilla Web        |
/// | react-todo     | intermediate         | Frontend Framework |
/// | rest-api       | intermediate         | Backend/API        |
/// | fullstack-shop | advanced             | Frontend Framework |
/// | python-cli     | beginner             | Full Stack         |
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::from_projects(vec![
        Project::new("portfolio", "Personal Portfolio")
            .with_tagline("Static site to show your work")
            .with_stack(["HTML", "CSS", "JavaScript"])
            .with_difficulty(Difficulty::Beginner),
        Project::new("react-todo", "React Todo App")
            .with_tagline("Classic todo list with hooks")
            .with_stack(["React", "TypeScript", "CSS"]),
        Project::new("rest-api", "REST API")
            .with_tagline("CRUD service with validation")
            .with_stack(["Node.js", "Express"]),
        Project::new("fullstack-shop", "Fullstack Shop")
            .with_tagline("Storefront with cart and checkout")
            .with_stack(["React", "Node.js", "MongoDB"]),
        Project::new("python-cli", "Python CLI")
            .with_tagline("Command line utility")
            .with_stack(["Python"]),
    ])
    .expect("sample catalog is valid")
}
