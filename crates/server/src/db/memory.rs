//! In-memory store for tests and local demos.
//!
//! Collections are `BTreeMap`s keyed by id behind a single `tokio` lock, so
//! listing order matches insertion order and ids are never reused.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use recipe_box_core::{AdminId, Email, RecipeId, UserId};

use super::{AdminStore, RecipeStore, RepositoryError, Store, UserStore};
use crate::models::{Admin, NewAdmin, NewRecipe, NewUser, Recipe, User};

#[derive(Debug, Default)]
struct Collections {
    users: BTreeMap<UserId, (User, String)>,
    recipes: BTreeMap<RecipeId, Recipe>,
    admins: BTreeMap<AdminId, (Admin, String)>,
    last_user_id: i32,
    last_recipe_id: i32,
    last_admin_id: i32,
}

/// Store that keeps everything in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Advance an id counter, failing instead of wrapping.
fn next_id(counter: &mut i32) -> Result<i32, RepositoryError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| RepositoryError::DataCorruption("id sequence exhausted".to_owned()))?;
    Ok(*counter)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data.users.values().map(|(user, _)| user.clone()).collect())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut data = self.inner.write().await;
        let id = UserId::new(next_id(&mut data.last_user_id)?);
        let record = User {
            id,
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        data.users.insert(id, (record.clone(), user.password_hash));
        Ok(record)
    }

    async fn get_user_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data
            .users
            .values()
            .find(|(user, _)| &user.email == email)
            .cloned())
    }

    async fn delete_user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut data = self.inner.write().await;
        Ok(data.users.remove(&id).map(|(user, _)| user))
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_recipes(&self) -> Result<Vec<Recipe>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data.recipes.values().cloned().collect())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<Recipe, RepositoryError> {
        let mut data = self.inner.write().await;
        let id = RecipeId::new(next_id(&mut data.last_recipe_id)?);
        let record = Recipe {
            id,
            title: recipe.title,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            image: recipe.image,
            created_at: Utc::now(),
        };
        data.recipes.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_recipe(&self, id: RecipeId) -> Result<Option<Recipe>, RepositoryError> {
        let mut data = self.inner.write().await;
        Ok(data.recipes.remove(&id))
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn list_admins(&self) -> Result<Vec<Admin>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data.admins.values().map(|(admin, _)| admin.clone()).collect())
    }

    async fn get_admin_by_email(&self, email: &Email) -> Result<Option<Admin>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data
            .admins
            .values()
            .find(|(admin, _)| &admin.email == email)
            .map(|(admin, _)| admin.clone()))
    }

    async fn any_admin(&self) -> Result<bool, RepositoryError> {
        Ok(!self.inner.read().await.admins.is_empty())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let mut data = self.inner.write().await;
        // Checked under the write lock, standing in for the unique index.
        if data.admins.values().any(|(a, _)| a.email == admin.email) {
            return Err(RepositoryError::Conflict("admin email already exists".to_owned()));
        }
        let id = AdminId::new(next_id(&mut data.last_admin_id)?);
        let record = Admin {
            id,
            name: admin.name,
            email: admin.email,
            created_at: Utc::now(),
        };
        data.admins.insert(id, (record.clone(), admin.password_hash));
        Ok(record)
    }

    async fn get_admin_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let data = self.inner.read().await;
        Ok(data
            .admins
            .values()
            .find(|(admin, _)| &admin.email == email)
            .cloned())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    fn soup() -> NewRecipe {
        NewRecipe {
            title: "Soup".to_owned(),
            ingredients: vec!["water".to_owned()],
            instructions: vec!["boil".to_owned()],
            image: None,
        }
    }

    #[tokio::test]
    async fn test_recipe_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.create_recipe(soup()).await.unwrap();
        store.delete_recipe(first.id).await.unwrap();
        let second = store.create_recipe(soup()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.list_recipes().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_delete_missing_returns_none() {
        let store = MemoryStore::new();
        assert!(store.delete_user(UserId::new(5)).await.unwrap().is_none());
        assert!(store.delete_recipe(RecipeId::new(5)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_lookup_returns_oldest_match() {
        let store = MemoryStore::new();
        for (name, hash) in [("first", "h1"), ("second", "h2")] {
            store
                .create_user(NewUser {
                    username: name.to_owned(),
                    email: email("shared@example.com"),
                    password_hash: hash.to_owned(),
                })
                .await
                .unwrap();
        }

        let (user, hash) = store
            .get_user_password_hash(&email("shared@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.username, "first");
        assert_eq!(hash, "h1");
    }

    #[tokio::test]
    async fn test_duplicate_admin_email_conflicts() {
        let store = MemoryStore::new();
        let new_admin = || NewAdmin {
            name: "Root".to_owned(),
            email: email("root@example.com"),
            password_hash: "hash".to_owned(),
        };

        assert!(!store.any_admin().await.unwrap());
        store.create_admin(new_admin()).await.unwrap();
        assert!(store.any_admin().await.unwrap());
        let err = store.create_admin(new_admin()).await.unwrap_err();

        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.list_admins().await.unwrap().len(), 1);
    }
}
