//! The authorization rules, in one place.
//!
//! Both the page handlers and the JSON API call these same predicates, so the
//! rules cannot drift between the two surfaces.

use crate::db::{Article, Category, User};

/// Whether a user is exempt from ownership checks.
pub fn is_elevated(user: &User) -> bool {
    user.is_staff || user.is_superuser
}

/// Authorization for editing an entry in the database.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditAuthorization {
    /// Staff or superuser who can edit anything.
    Elevated,
    /// Normal user who can only edit their own articles.
    IsOwner,
}

/// Whether a user may create an article in the given category. Ordinary
/// authenticated users may only post under [`Category::Works`].
pub fn can_create(user: Option<&User>, category: Category) -> bool {
    let Some(user) = user else { return false };
    if is_elevated(user) {
        return true;
    }
    category == Category::Works
}

/// How a user is authorized to edit or delete an article, if at all.
pub fn edit_authorization(article: &Article, user: Option<&User>) -> Option<EditAuthorization> {
    let user = user?;
    if is_elevated(user) {
        Some(EditAuthorization::Elevated)
    } else if article.author_id == user.id {
        Some(EditAuthorization::IsOwner)
    } else {
        None
    }
}

/// Whether a user may edit or delete an article.
pub fn can_modify(article: &Article, user: Option<&User>) -> bool {
    edit_authorization(article, user).is_some()
}

/// Whether an update may leave the article in the given category. Moving an
/// article counts as creating under the new category, so an ordinary owner
/// cannot edit their way from [`Category::Works`] into the others.
pub fn can_assign_category(article: &Article, user: Option<&User>, category: Category) -> bool {
    category == article.category || can_create(user, category)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::{ArticleId, UserId};

    fn user(id: i64, is_staff: bool, is_superuser: bool) -> User {
        User {
            id: UserId(id),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            is_staff,
            is_superuser,
            created: Utc::now(),
        }
    }

    fn article(author: &User, category: Category) -> Article {
        Article {
            id: ArticleId(1),
            title: "title".to_string(),
            text: "text".to_string(),
            category,
            created: Utc::now(),
            author_id: author.id,
        }
    }

    #[test]
    fn unauthenticated_can_create_nothing() {
        for category in [Category::News, Category::Works, Category::Review] {
            assert!(!can_create(None, category));
        }
    }

    #[test]
    fn ordinary_users_only_create_works() {
        let u = user(1, false, false);
        assert!(!can_create(Some(&u), Category::News));
        assert!(!can_create(Some(&u), Category::Review));
        assert!(can_create(Some(&u), Category::Works));
    }

    #[test]
    fn elevated_users_create_anywhere() {
        let staff = user(1, true, false);
        let superuser = user(2, false, true);
        for category in [Category::News, Category::Works, Category::Review] {
            assert!(can_create(Some(&staff), category));
            assert!(can_create(Some(&superuser), category));
        }
    }

    #[test]
    fn modify_requires_ownership_or_elevation() {
        let owner = user(1, false, false);
        let stranger = user(2, false, false);
        let staff = user(3, true, false);
        let a = article(&owner, Category::Works);

        assert!(!can_modify(&a, None));
        assert!(!can_modify(&a, Some(&stranger)));
        assert!(can_modify(&a, Some(&owner)));
        assert!(can_modify(&a, Some(&staff)));

        assert_eq!(
            edit_authorization(&a, Some(&owner)),
            Some(EditAuthorization::IsOwner)
        );
        assert_eq!(
            edit_authorization(&a, Some(&staff)),
            Some(EditAuthorization::Elevated)
        );
    }

    #[test]
    fn recategorizing_needs_creation_rights() {
        let owner = user(1, false, false);
        let staff = user(2, true, false);
        let a = article(&owner, Category::Works);

        assert!(can_assign_category(&a, Some(&owner), Category::Works));
        assert!(!can_assign_category(&a, Some(&owner), Category::News));
        assert!(!can_assign_category(&a, Some(&owner), Category::Review));
        assert!(can_assign_category(&a, Some(&staff), Category::News));

        let news = article(&staff, Category::News);
        // keeping the current category is always fine for someone who may edit
        assert!(can_assign_category(&news, Some(&staff), Category::News));
    }
}
