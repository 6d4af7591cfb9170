//! In-process [`SchoolStore`] for tests and local demos.
//!
//! Besides the data itself it counts relationship lookups and can be switched
//! into a failing mode, so callers can assert how often and how robustly the
//! store is consulted.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use scholaris_core::{AccountStatus, Role};
use scholaris_models::{Account, Credentials, ParentProfile, StudentProfile, TeacherProfile};

use crate::error::StoreError;
use crate::store::SchoolStore;

#[derive(Default)]
struct Tables {
    accounts: HashMap<Uuid, Credentials>,
    students: HashMap<Uuid, StudentProfile>,
    teachers: HashMap<Uuid, TeacherProfile>,
    parents: HashMap<Uuid, ParentProfile>,
    /// (teacher record id, class id)
    assignments: HashSet<(Uuid, Uuid)>,
    /// (parent record id, student record id) -> active
    parent_links: HashMap<(Uuid, Uuid), bool>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    relationship_queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("relationship_queries", &self.relationship_queries())
            .finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn relationship<F>(&self, check: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&Tables) -> bool,
    {
        self.relationship_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.read()?;
        Ok(check(&tables))
    }

    /// Number of relationship lookups served so far.
    pub fn relationship_queries(&self) -> usize {
        self.relationship_queries.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn insert_account(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        status: AccountStatus,
    ) -> Result<Account, StoreError> {
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            status,
            last_login: None,
        };
        self.write()?.accounts.insert(
            account.id,
            Credentials {
                account: account.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(account)
    }

    pub fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        if let Some(credentials) = self.write()?.accounts.get_mut(&id) {
            credentials.account.status = status;
        }
        Ok(())
    }

    pub fn insert_student(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
        current_class_id: Option<Uuid>,
    ) -> Result<StudentProfile, StoreError> {
        let student = StudentProfile {
            id: Uuid::new_v4(),
            user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            current_class_id,
        };
        self.write()?.students.insert(student.id, student.clone());
        Ok(student)
    }

    pub fn insert_teacher(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<TeacherProfile, StoreError> {
        let teacher = TeacherProfile {
            id: Uuid::new_v4(),
            user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.write()?.teachers.insert(teacher.id, teacher.clone());
        Ok(teacher)
    }

    pub fn insert_parent(
        &self,
        user_id: Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<ParentProfile, StoreError> {
        let parent = ParentProfile {
            id: Uuid::new_v4(),
            user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        };
        self.write()?.parents.insert(parent.id, parent.clone());
        Ok(parent)
    }

    pub fn assign_teacher(&self, teacher_id: Uuid, class_id: Uuid) -> Result<(), StoreError> {
        self.write()?.assignments.insert((teacher_id, class_id));
        Ok(())
    }

    pub fn link_parent(
        &self,
        parent_id: Uuid,
        student_id: Uuid,
        active: bool,
    ) -> Result<(), StoreError> {
        self.write()?
            .parent_links
            .insert((parent_id, student_id), active);
        Ok(())
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, StoreError> {
        Ok(self
            .read()?
            .accounts
            .values()
            .find(|c| c.account.email == email)
            .cloned())
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).map(|c| c.account.clone()))
    }

    async fn record_login(&self, id: Uuid) -> Result<(), StoreError> {
        if let Some(credentials) = self.write()?.accounts.get_mut(&id) {
            credentials.account.last_login = Some(Utc::now());
        }
        Ok(())
    }

    async fn student_belongs_to(
        &self,
        student_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.relationship(|t| {
            t.students
                .get(&student_id)
                .is_some_and(|s| s.user_id == user_id)
        })
    }

    async fn parent_linked_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.relationship(|t| {
            t.parents
                .values()
                .filter(|p| p.user_id == user_id)
                .any(|p| t.parent_links.get(&(p.id, student_id)) == Some(&true))
        })
    }

    async fn teacher_assigned_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.relationship(|t| {
            let Some(class_id) = t.students.get(&student_id).and_then(|s| s.current_class_id)
            else {
                return false;
            };
            t.teachers
                .values()
                .filter(|teacher| teacher.user_id == user_id)
                .any(|teacher| t.assignments.contains(&(teacher.id, class_id)))
        })
    }

    async fn teacher_belongs_to(
        &self,
        teacher_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.relationship(|t| {
            t.teachers
                .get(&teacher_id)
                .is_some_and(|teacher| teacher.user_id == user_id)
        })
    }

    async fn parent_belongs_to(&self, parent_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        self.relationship(|t| {
            t.parents
                .get(&parent_id)
                .is_some_and(|p| p.user_id == user_id)
        })
    }

    async fn find_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.read()?.students.get(&id).cloned())
    }

    async fn find_teacher(&self, id: Uuid) -> Result<Option<TeacherProfile>, StoreError> {
        Ok(self.read()?.teachers.get(&id).cloned())
    }

    async fn find_parent(&self, id: Uuid) -> Result<Option<ParentProfile>, StoreError> {
        Ok(self.read()?.parents.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_family() -> (MemoryStore, Uuid, StudentProfile, ParentProfile) {
        let store = MemoryStore::new();
        let parent_account = store
            .insert_account("parent@school.com", "hash", Role::Parent, AccountStatus::Active)
            .unwrap();
        let student_account = store
            .insert_account("student@school.com", "hash", Role::Student, AccountStatus::Active)
            .unwrap();
        let student = store
            .insert_student(student_account.id, "Ada", "Obi", None)
            .unwrap();
        let parent = store
            .insert_parent(parent_account.id, "Ngozi", "Obi")
            .unwrap();
        (store, parent_account.id, student, parent)
    }

    #[tokio::test]
    async fn test_parent_link_must_be_active() {
        let (store, parent_user, student, parent) = store_with_family();

        assert!(
            !store
                .parent_linked_to_student(parent_user, student.id)
                .await
                .unwrap()
        );

        store.link_parent(parent.id, student.id, false).unwrap();
        assert!(
            !store
                .parent_linked_to_student(parent_user, student.id)
                .await
                .unwrap()
        );

        store.link_parent(parent.id, student.id, true).unwrap();
        assert!(
            store
                .parent_linked_to_student(parent_user, student.id)
                .await
                .unwrap()
        );
        assert_eq!(store.relationship_queries(), 3);
    }

    #[tokio::test]
    async fn test_teacher_assignment_follows_current_class() {
        let store = MemoryStore::new();
        let class_id = Uuid::new_v4();
        let teacher_account = store
            .insert_account("t@school.com", "hash", Role::Teacher, AccountStatus::Active)
            .unwrap();
        let teacher = store
            .insert_teacher(teacher_account.id, "Musa", "Bello")
            .unwrap();
        let in_class = store
            .insert_student(Uuid::new_v4(), "A", "B", Some(class_id))
            .unwrap();
        let elsewhere = store
            .insert_student(Uuid::new_v4(), "C", "D", Some(Uuid::new_v4()))
            .unwrap();
        store.assign_teacher(teacher.id, class_id).unwrap();

        assert!(
            store
                .teacher_assigned_to_student(teacher_account.id, in_class.id)
                .await
                .unwrap()
        );
        assert!(
            !store
                .teacher_assigned_to_student(teacher_account.id, elsewhere.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_record_login_and_lookup() {
        let (store, parent_user, _, _) = store_with_family();
        store.record_login(parent_user).await.unwrap();

        let account = store.find_account(parent_user).await.unwrap().unwrap();
        assert!(account.last_login.is_some());

        let credentials = store
            .find_credentials_by_email("parent@school.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(credentials.account.id, parent_user);
        assert!(
            store
                .find_credentials_by_email("nobody@school.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let (store, parent_user, _, _) = store_with_family();
        store.set_unavailable(true);
        assert!(matches!(
            store.find_account(parent_user).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
