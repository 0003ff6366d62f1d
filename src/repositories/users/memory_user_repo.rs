//! 프로세스 메모리 사용자 저장소
//!
//! MongoDB 구현과 같은 규칙(이메일 유일성, 순차 ID)을 따릅니다.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::user_repo::{StoreError, UserStore};
use crate::domain::entities::users::{Email, User, UserId};
use crate::domain::models::oauth::Provider;

#[derive(Default)]
struct Inner {
    next_id: UserId,
    users: HashMap<UserId, User>,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<Inner>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().map(|inner| inner.users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("in-memory store lock poisoned".to_string()))
    }

    fn find_where(&self, pred: impl Fn(&User) -> bool) -> Result<User, StoreError> {
        self.read()?
            .users
            .values()
            .find(|u| pred(u))
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl UserStore for InMemoryUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), StoreError> {
        let mut inner = self.write()?;

        let taken = inner
            .users
            .values()
            .any(|u| u.id() != user.id() && u.email() == user.email());
        if taken {
            return Err(StoreError::Conflict(format!(
                "이미 사용 중인 이메일입니다: {}",
                user.email()
            )));
        }

        if !user.is_persisted() {
            inner.next_id += 1;
            user.assign_id(inner.next_id);
        }
        inner.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError> {
        self.read()?.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, StoreError> {
        self.find_where(|u| u.email() == email)
    }

    async fn find_by_name(&self, name: &str) -> Result<User, StoreError> {
        self.find_where(|u| u.name() == name)
    }

    async fn find_by_bound_id(&self, provider: Provider, external_id: &str) -> Result<User, StoreError> {
        self.find_where(|u| u.bound_id(provider) == Some(external_id))
    }

    async fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.read()?.users.contains_key(&id))
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.write()?
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::Permission;

    fn new_user(name: &str, email: &str) -> User {
        User::new(name, Email::new(email).unwrap(), "", Permission::Reader).unwrap()
    }

    #[actix_web::test]
    async fn test_save_assigns_sequential_ids() {
        let store = InMemoryUserRepository::new();
        let mut a = new_user("alice", "a@example.com");
        let mut b = new_user("bob", "b@example.com");

        store.save(&mut a).await.unwrap();
        store.save(&mut b).await.unwrap();

        assert_eq!(a.id(), 1);
        assert_eq!(b.id(), 2);
        assert_eq!(store.len(), 2);
    }

    #[actix_web::test]
    async fn test_save_is_upsert() {
        let store = InMemoryUserRepository::new();
        let mut user = new_user("alice", "a@example.com");
        store.save(&mut user).await.unwrap();

        user.update_name("alice_2").unwrap();
        store.save(&mut user).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_id(user.id()).await.unwrap().name(), "alice_2");
    }

    #[actix_web::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryUserRepository::new();
        let mut first = new_user("alice", "a@example.com");
        let mut second = new_user("alice2", "a@example.com");

        store.save(&mut first).await.unwrap();
        let result = store.save(&mut second).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
        assert!(!second.is_persisted());
    }

    #[actix_web::test]
    async fn test_lookups_distinguish_not_found() {
        let store = InMemoryUserRepository::new();
        let mut user = new_user("alice", "a@example.com");
        user.bind(Provider::Github, "gh-1").unwrap();
        store.save(&mut user).await.unwrap();

        let email = Email::new("a@example.com").unwrap();
        assert_eq!(store.find_by_email(&email).await.unwrap().id(), user.id());
        assert_eq!(store.find_by_name("alice").await.unwrap().id(), user.id());
        assert_eq!(
            store.find_by_bound_id(Provider::Github, "gh-1").await.unwrap().id(),
            user.id()
        );

        let missing = Email::new("z@example.com").unwrap();
        assert_eq!(store.find_by_email(&missing).await, Err(StoreError::NotFound));
        assert_eq!(store.find_by_name("nobody").await, Err(StoreError::NotFound));
        assert_eq!(
            store.find_by_bound_id(Provider::Google, "gh-1").await,
            Err(StoreError::NotFound)
        );
        assert_eq!(store.find_by_id(99).await, Err(StoreError::NotFound));
    }

    #[actix_web::test]
    async fn test_exists_and_delete() {
        let store = InMemoryUserRepository::new();
        let mut user = new_user("alice", "a@example.com");
        store.save(&mut user).await.unwrap();

        assert!(store.exists(user.id()).await.unwrap());
        store.delete(user.id()).await.unwrap();
        assert!(!store.exists(user.id()).await.unwrap());
        assert_eq!(store.delete(user.id()).await, Err(StoreError::NotFound));
        assert!(store.is_empty());
    }
}
