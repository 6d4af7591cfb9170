//! The data store contract used by the authentication core.
//!
//! Every method is a single lookup. Relationship checks return `true` when
//! at least one matching row exists.

use async_trait::async_trait;
use uuid::Uuid;

use scholaris_models::{Account, Credentials, ParentProfile, StudentProfile, TeacherProfile};

use crate::error::StoreError;

#[async_trait]
pub trait SchoolStore: Send + Sync {
    /// Account and password hash by email, regardless of status.
    async fn find_credentials_by_email(&self, email: &str)
    -> Result<Option<Credentials>, StoreError>;

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Stamps `last_login` with the current time.
    async fn record_login(&self, id: Uuid) -> Result<(), StoreError>;

    /// The student record `student_id` belongs to account `user_id`.
    async fn student_belongs_to(&self, student_id: Uuid, user_id: Uuid)
    -> Result<bool, StoreError>;

    /// Parent account `user_id` has an active relationship with `student_id`.
    async fn parent_linked_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError>;

    /// Teacher account `user_id` is assigned to the current class of `student_id`.
    async fn teacher_assigned_to_student(
        &self,
        user_id: Uuid,
        student_id: Uuid,
    ) -> Result<bool, StoreError>;

    async fn teacher_belongs_to(&self, teacher_id: Uuid, user_id: Uuid)
    -> Result<bool, StoreError>;

    async fn parent_belongs_to(&self, parent_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;

    async fn find_student(&self, id: Uuid) -> Result<Option<StudentProfile>, StoreError>;

    async fn find_teacher(&self, id: Uuid) -> Result<Option<TeacherProfile>, StoreError>;

    async fn find_parent(&self, id: Uuid) -> Result<Option<ParentProfile>, StoreError>;
}
