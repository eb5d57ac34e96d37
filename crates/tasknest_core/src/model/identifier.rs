//! Stable string keys for persisted entities.
//!
//! The key doubles as the alarm facility request id, so it must be stable
//! for one entity and distinct across entities of any kind.

use uuid::Uuid;

/// Entity with a storage-assigned opaque reference.
pub trait Identifiable {
    /// Entity kind segment used in identifiers.
    const ENTITY_NAME: &'static str;

    fn uuid(&self) -> Uuid;

    /// Returns `/<EntityName>/<uuid>`.
    fn identifier(&self) -> String {
        format!("/{}/{}", Self::ENTITY_NAME, self.uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::Identifiable;
    use crate::model::category::Category;
    use crate::model::task::Task;

    #[test]
    fn identifier_is_stable_and_kind_scoped() {
        let category = Category::new("Personal", "", "").unwrap();
        let task = Task::new(&category, "Get started").unwrap();

        assert_eq!(category.identifier(), category.identifier());
        assert_eq!(category.identifier(), format!("/Category/{}", category.id()));
        assert_eq!(task.identifier(), format!("/Task/{}", task.id()));
        assert_ne!(category.identifier(), task.identifier());
    }
}
